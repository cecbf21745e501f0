use crate::model::{namespace_of, short_name_of};

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility {
    Public,
    Private,
}

///
/// FieldModel
/// One declared field and its unparsed type annotation.
///

#[derive(Debug)]
pub struct FieldModel {
    pub name: &'static str,
    /// Type annotation; `None` means untyped (primitive passthrough).
    pub annotation: Option<&'static str>,
    pub visibility: Visibility,
    /// Class-level field; never part of an instance shape.
    pub is_static: bool,
}

impl FieldModel {
    #[must_use]
    pub const fn public(name: &'static str, annotation: Option<&'static str>) -> Self {
        Self {
            name,
            annotation,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    #[must_use]
    pub const fn private(name: &'static str, annotation: Option<&'static str>) -> Self {
        Self {
            name,
            annotation,
            visibility: Visibility::Private,
            is_static: false,
        }
    }

    #[must_use]
    pub const fn shared(name: &'static str, annotation: Option<&'static str>) -> Self {
        Self {
            name,
            annotation,
            visibility: Visibility::Public,
            is_static: true,
        }
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}

///
/// ClassModel
///
/// Runtime description of one class: its path, optional base class and the
/// fields it declares itself (inherited fields live on the base model).
///

#[derive(Debug)]
pub struct ClassModel {
    /// Fully-qualified path, e.g. `app::FooId`.
    pub path: &'static str,
    pub base: Option<&'static Self>,
    pub fields: &'static [FieldModel],
}

impl ClassModel {
    #[must_use]
    pub const fn new(path: &'static str, fields: &'static [FieldModel]) -> Self {
        Self {
            path,
            base: None,
            fields,
        }
    }

    #[must_use]
    pub const fn extending(
        path: &'static str,
        base: &'static Self,
        fields: &'static [FieldModel],
    ) -> Self {
        Self {
            path,
            base: Some(base),
            fields,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &'static str {
        namespace_of(self.path)
    }

    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_name_of(self.path)
    }

    /// Non-static fields in declaration order, base class first.
    #[must_use]
    pub fn instance_fields(&'static self) -> Vec<DeclaredField> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(model) = current {
            chain.push(model);
            current = model.base;
        }

        chain
            .into_iter()
            .rev()
            .flat_map(|model| {
                model
                    .fields
                    .iter()
                    .filter(|field| !field.is_static)
                    .map(move |field| DeclaredField {
                        field,
                        declared_in: model,
                    })
            })
            .collect()
    }
}

///
/// DeclaredField
/// Instance field paired with the class that declares it.
///

#[derive(Clone, Copy, Debug)]
pub struct DeclaredField {
    pub field: &'static FieldModel,
    /// Annotations resolve relative to this class's namespace.
    pub declared_in: &'static ClassModel,
}

impl DeclaredField {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.field.name
    }
}
