use crate::{
    binding::{Binding, CompileError, CompiledInterface, MethodBinding, ParamBinding},
    error::Error,
    model::{InterfaceModel, MethodModel, ParamModel, short_name_of},
    store::EnvironmentStore,
    types::{TypeElement, TypeInfo},
};
use convert_case::{Case, Casing};
use std::collections::BTreeMap;
use tracing::debug;

///
/// CONSTANTS
///

const GETTER_PREFIX: &str = "get";
const IDENTITY_SUFFIX: &str = "Id";

/// Classify and bind every abstract method of `model`.
pub(crate) fn compile(
    store: &EnvironmentStore,
    model: &'static InterfaceModel,
) -> Result<CompiledInterface, Error> {
    let mut methods = BTreeMap::new();

    for method in model.methods {
        let binding = Compiler { store, model, method }.bind()?;
        methods.insert(method.name, binding);
    }

    debug!(interface = model.path, methods = methods.len(), "compiled interface");

    Ok(CompiledInterface {
        path: model.path,
        constructor_arity: model.constructor_arity(),
        methods,
    })
}

///
/// Compiler
/// Per-method compile context.
///

struct Compiler<'a> {
    store: &'a EnvironmentStore,
    model: &'static InterfaceModel,
    method: &'static MethodModel,
}

impl Compiler<'_> {
    fn bind(&self) -> Result<MethodBinding, Error> {
        let operation = self.model.operation_name(self.method.name);

        let (backend, binding) = if self.method.name.starts_with(GETTER_PREFIX) {
            self.getter(&operation)?
        } else if self.method.returns.is_some() {
            self.finder(&operation)?
        } else {
            self.setter(&operation)?
        };

        Ok(MethodBinding {
            name: self.method.name,
            operation,
            backend,
            arity: self.method.params.len(),
            binding,
        })
    }

    // Checks run in order: parameter count, return array-ness, target
    // identity, method name.
    fn getter(&self, operation: &str) -> Result<(String, Binding), Error> {
        let [param] = self.method.params else {
            return Err(CompileError::WrongParamCount {
                method: operation.to_string(),
                expected: 1,
                found: self.method.params.len(),
            }
            .into());
        };

        let field_type = self.parse(self.method.returns)?;
        if field_type.is_array {
            return Err(CompileError::ArrayReturnNotAllowed {
                method: operation.to_string(),
            }
            .into());
        }

        let identity_class = self.identity_param(operation, param)?;
        let entity = entity_name(&identity_class).unwrap_or_default();
        let field = getter_field(self.method.name, entity).ok_or_else(|| {
            CompileError::NameMismatch {
                method: operation.to_string(),
                expected_prefix: format!("{GETTER_PREFIX}{}", upper_first(entity)),
            }
        })?;

        let backend = self
            .store
            .backend_name(operation, Some(&identity_class), Some(&field))?
            .to_string();

        Ok((
            backend,
            Binding::Getter {
                identity_class,
                field,
                field_type,
            },
        ))
    }

    fn finder(&self, operation: &str) -> Result<(String, Binding), Error> {
        let result = self.parse(self.method.returns)?;
        let filters = self.params(self.method.params)?;

        let backend = self
            .store
            .backend_name(operation, result.element_class(), None)?
            .to_string();

        Ok((backend, Binding::Finder { result, filters }))
    }

    fn setter(&self, operation: &str) -> Result<(String, Binding), Error> {
        let [id, values @ ..] = self.method.params else {
            return Err(too_few(operation, 0));
        };
        if values.is_empty() {
            return Err(too_few(operation, 1));
        }

        let identity_class = self.identity_param(operation, id)?;
        let fields = self.params(values)?;

        let backend = self
            .store
            .backend_name(
                operation,
                Some(&identity_class),
                fields.first().map(|field| field.name),
            )?
            .to_string();

        Ok((
            backend,
            Binding::Setter {
                identity_class,
                fields,
            },
        ))
    }

    fn parse(&self, annotation: Option<&str>) -> Result<TypeInfo, Error> {
        Ok(TypeInfo::parse(annotation, self.model.path, self.store.catalog())?)
    }

    fn params(&self, params: &'static [ParamModel]) -> Result<Vec<ParamBinding>, Error> {
        let mut bound = Vec::with_capacity(params.len());
        for param in params {
            bound.push(ParamBinding {
                name: param.name,
                ty: self.parse(param.annotation)?,
            });
        }

        Ok(bound)
    }

    /// Class of a parameter that must name a registered `<Entity>Id` class.
    fn identity_param(&self, operation: &str, param: &ParamModel) -> Result<String, Error> {
        let ty = self.parse(param.annotation)?;

        match ty.element {
            TypeElement::Class(class)
                if !ty.is_array
                    && self.store.is_identity_class(&class)
                    && entity_name(&class).is_some() =>
            {
                Ok(class)
            }
            _ => Err(CompileError::TargetNotIdentity {
                method: operation.to_string(),
                found: param.annotation.unwrap_or("none").to_string(),
            }
            .into()),
        }
    }
}

fn too_few(operation: &str, found: usize) -> Error {
    CompileError::TooFewParams {
        method: operation.to_string(),
        found,
    }
    .into()
}

/// Entity name of an identity class: `app::FooId` is `Foo`.
fn entity_name(class: &str) -> Option<&str> {
    short_name_of(class)
        .strip_suffix(IDENTITY_SUFFIX)
        .filter(|entity| !entity.is_empty())
}

/// Field named by a getter, from either `get<Entity><Field>` or
/// `get_<entity>_<field>`.
fn getter_field(method: &str, entity: &str) -> Option<String> {
    let camel = format!("{GETTER_PREFIX}{}", upper_first(entity));
    if let Some(rest) = method.strip_prefix(&camel)
        && rest.starts_with(|c: char| c.is_ascii_uppercase())
    {
        return Some(lower_first(rest));
    }

    let snake = format!("{GETTER_PREFIX}_{}_", entity.to_case(Case::Snake));
    method
        .strip_prefix(&snake)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

///
/// TESTS
///
