//! Serializer set.
//!
//! Each serializer converts one domain shape to its backend-neutral form and
//! back, and describes that form to backends through a [`BackendType`].
//! `Null` crosses every serializer unchanged except [`ArraySerializer`].

mod array;
mod identity;
mod passthrough;
mod row;
mod value;


use crate::{
    datum::Datum,
    error::{Error, ErrorClass},
    value::{BackendType, Value},
};
use std::fmt;
use thiserror::Error as ThisError;

// re-exports
pub use array::ArraySerializer;
pub use identity::IdentitySerializer;
pub use passthrough::PassthroughSerializer;
pub use row::DataRowSerializer;
pub use value::ValueSerializer;

///
/// Serializer
///

pub trait Serializer: fmt::Debug {
    /// Domain datum to backend value.
    fn externalize(&self, datum: &Datum) -> Result<Value, Error>;

    /// Backend value to domain datum.
    fn internalize(&self, value: Value) -> Result<Datum, Error>;

    /// Shape of this serializer's backend form.
    fn backend_type(&self) -> Result<BackendType, SerializationError>;

    /// Shape a backend should produce when this serializer reads a query result.
    fn result_shape(&self) -> Result<BackendType, SerializationError> {
        self.backend_type()
    }
}

///
/// SerializationError
///

#[derive(Debug, ThisError)]
pub enum SerializationError {
    #[error("class mismatch: expected '{expected}', found '{found}'")]
    ClassMismatch { expected: String, found: String },

    #[error("unknown '{class}' instance; it was never exported or imported")]
    UnknownObject { class: String },

    #[error("row class '{class}' is a read-only projection and cannot be externalized")]
    NotExternalizable { class: String },

    #[error("missing field '{field}' while loading '{class}'")]
    MissingField { class: String, field: String },

    #[error("class '{class}' is not serializable")]
    NotSerializable { class: String },

    #[error("only identities can be exported or imported, found '{class}'")]
    NotAnIdentity { class: String },

    #[error("null identity where a '{class}' was required")]
    NullIdentity { class: String },

    #[error("array serializer cannot accept null")]
    NullArray,

    #[error("value class '{class}' declares no fields")]
    NoFields { class: String },

    #[error("row field '{class}::{field}' must be public")]
    PrivateRowField { class: String, field: String },

    #[error("row field '{class}::{field}' cannot be array-typed")]
    ArrayRowField { class: String, field: String },

    #[error("'{found}' needs a class serializer")]
    NotPrimitive { found: String },

    #[error("unexpected backend value: expected {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unexpected datum: expected {expected}, found {found}")]
    UnexpectedDatum {
        expected: &'static str,
        found: &'static str,
    },

    #[error("backend value of kind {found} is not an external id")]
    InvalidExternalId { found: &'static str },
}

impl SerializationError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotExternalizable { .. } => ErrorClass::Unsupported,
            Self::UnexpectedValue { .. } | Self::InvalidExternalId { .. } => ErrorClass::Transport,
            _ => ErrorClass::Contract,
        }
    }

    pub(crate) const fn unexpected_value(expected: &'static str, found: &Value) -> Self {
        Self::UnexpectedValue {
            expected,
            found: found.kind(),
        }
    }

    pub(crate) fn class_mismatch(expected: &str, found: &Datum) -> Self {
        Self::ClassMismatch {
            expected: expected.to_string(),
            found: found.class().unwrap_or(found.kind()).to_string(),
        }
    }
}
