//! Core runtime for Stowage: backend values, domain datums, class models,
//! the serializer set, the environment store and the binding compiler.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod backend;
pub mod binding;
pub mod catalog;
pub mod datum;
pub mod error;
pub mod model;
pub mod serialize;
pub mod store;
pub mod traits;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// CONSTANTS
///

/// Built-in date-time class path; always serializable, never catalogued.
pub const DATE_TIME_PATH: &str = "DateTime";

/// Built-in open-structure class path used for ad hoc row projections.
pub const OPEN_OBJECT_PATH: &str = "object";

/// Path separator for class, interface and operation names.
pub const PATH_SEPARATOR: &str = "::";

///
/// Prelude
///
/// Domain vocabulary only; errors, serializers and the store stay one
/// module level down.
///

pub mod prelude {
    pub use crate::{
        binding::Implementation,
        datum::{Datum, FromDatum, Identity, IntoDatum, Object},
        model::{ClassModel, FieldModel, InterfaceModel, MethodModel, ParamModel},
        traits::{Class, IdentityClass, Interface, ValueClass},
        value::{BackendType, ExternalId, Value},
    };
}
