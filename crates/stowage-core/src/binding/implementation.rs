use crate::{
    backend::QuerySpecMap,
    binding::{Binding, CallError, CompiledInterface, MethodBinding, ParamBinding},
    datum::{Datum, FromDatum},
    error::Error,
    model::InterfaceModel,
    store::EnvironmentStore,
    traits::IdentityClass,
    value::ExternalId,
};
use std::{collections::BTreeMap, fmt, rc::Rc};

/// Bind `model` against `store`, passing `args` through as constructor
/// arguments.
pub fn implement(
    store: &Rc<EnvironmentStore>,
    model: &'static InterfaceModel,
    args: Vec<Datum>,
) -> Result<Implementation, Error> {
    let compiled = store.compiled(model)?;
    compiled.check_constructor_args(args.len())?;

    Ok(Implementation {
        store: Rc::clone(store),
        compiled,
        args: args.into(),
    })
}

///
/// Implementation
///
/// Generic proxy behind every bound interface. Calls are looked up in the
/// compiled method table and forwarded to the store; clones share the same
/// table and constructor arguments.
///

#[derive(Clone)]
pub struct Implementation {
    store: Rc<EnvironmentStore>,
    compiled: Rc<CompiledInterface>,
    args: Rc<[Datum]>,
}

impl Implementation {
    /// Invoke a bound method. Setters answer `Datum::Null`.
    pub fn call(&self, method: &str, args: &[Datum]) -> Result<Datum, Error> {
        let binding = self.binding(method)?;
        if args.len() != binding.arity {
            return Err(CallError::WrongArgCount {
                method: binding.operation.clone(),
                expected: binding.arity,
                found: args.len(),
            }
            .into());
        }

        match &binding.binding {
            Binding::Getter {
                identity_class,
                field,
                field_type,
            } => self.store.get(
                &binding.backend,
                &binding.operation,
                identity_class,
                &args[0],
                field_type,
                field,
            ),

            Binding::Setter {
                identity_class,
                fields,
            } => {
                self.store.set(
                    &binding.backend,
                    &binding.operation,
                    identity_class,
                    &args[0],
                    &ParamBinding::typed(fields, &args[1..]),
                )?;

                Ok(Datum::Null)
            }

            Binding::Finder { result, filters } => self.store.find(
                &binding.backend,
                &binding.operation,
                result,
                &ParamBinding::typed(filters, args),
            ),
        }
    }

    /// Invoke a bound method and convert its result.
    pub fn invoke<R: FromDatum>(&self, method: &str, args: &[Datum]) -> Result<R, Error> {
        let datum = self.call(method, args)?;

        Ok(R::from_datum(datum)?)
    }

    fn binding(&self, method: &str) -> Result<&MethodBinding, CallError> {
        self.compiled
            .method(method)
            .ok_or_else(|| CallError::UnknownMethod {
                interface: self.compiled.path().to_string(),
                method: method.to_string(),
            })
    }

    #[must_use]
    pub fn constructor_args(&self) -> &[Datum] {
        &self.args
    }

    #[must_use]
    pub const fn compiled(&self) -> &Rc<CompiledInterface> {
        &self.compiled
    }

    #[must_use]
    pub const fn store(&self) -> &Rc<EnvironmentStore> {
        &self.store
    }

    // ---- helpers for hand-written methods --------------------------------

    pub fn export_using<T: IdentityClass>(&self, value: &T) -> Result<ExternalId, Error> {
        self.store.export(value.identity())
    }

    pub fn import_using<T: IdentityClass>(&self, id: ExternalId) -> Result<T, Error> {
        let identity = self.store.import(T::MODEL.path, id)?;

        Ok(T::from_identity(identity))
    }

    pub fn retrieve_using(
        &self,
        backend: &str,
        queries: &QuerySpecMap,
        params: &BTreeMap<String, Datum>,
        result_types: &BTreeMap<String, String>,
    ) -> Result<Vec<Datum>, Error> {
        self.store.retrieve(backend, queries, params, result_types)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("interface", &self.compiled.path())
            .field("methods", &self.compiled.len())
            .field("args", &self.args)
            .finish()
    }
}
