use crate::{
    binding::Implementation,
    datum::{Identity, Object},
    model::{ClassModel, InterfaceModel},
    serialize::SerializationError,
};

///
/// Class
///

pub trait Class {
    const MODEL: &'static ClassModel;

    #[must_use]
    fn path() -> &'static str {
        Self::MODEL.path
    }
}

///
/// IdentityClass
///
/// Typed wrapper around an [`Identity`] handle. Equality of two wrappers
/// must follow handle equality.
///

pub trait IdentityClass: Class + Sized {
    fn from_identity(identity: Identity) -> Self;

    fn identity(&self) -> &Identity;

    /// Fresh, not yet persisted instance; the backend row is created on
    /// first export.
    #[must_use]
    fn create() -> Self {
        Self::from_identity(Identity::new(Self::MODEL.path))
    }
}

///
/// ValueClass
///

pub trait ValueClass: Class + Sized {
    fn to_object(&self) -> Object;

    /// Load-path constructor: builds the value from stored fields without
    /// running domain validation.
    fn materialize(object: Object) -> Result<Self, SerializationError>;
}

///
/// Interface
///
/// Storage interface whose abstract methods are bound by the compiler.
/// Implementors are thin typed wrappers around an [`Implementation`].
///

pub trait Interface: Sized {
    const MODEL: &'static InterfaceModel;

    fn bind(implementation: Implementation) -> Self;
}
