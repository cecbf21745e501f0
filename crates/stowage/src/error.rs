use derive_more::Display;
use serde::{Deserialize, Serialize};
use stowage_core::{
    backend::BackendError,
    binding::{CallError, CompileError},
    catalog::ResolutionError,
    error::{Error as CoreError, ErrorClass as CoreErrorClass, ErrorOrigin as CoreErrorOrigin},
    serialize::SerializationError,
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type: a structured kind plus a stable class + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(
        kind: ErrorKind,
        class: ErrorClass,
        origin: ErrorOrigin,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        Self::new(
            ErrorKind::from(&err),
            err.class().into(),
            err.origin().into(),
            err.to_string(),
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Config,
            ErrorClass::Contract,
            ErrorOrigin::Config,
            err.to_string(),
        )
    }
}

///
/// ErrorKind
/// Structured variant of the failure, one sub-kind per core error family.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Compile(CompileErrorKind),
    Call(CallErrorKind),
    Resolution(ResolutionErrorKind),
    Serialization(SerializationErrorKind),
    Backend(BackendErrorKind),

    /// Configuration could not be parsed.
    Config,
}

impl From<&CoreError> for ErrorKind {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Compile(err) => Self::Compile(err.into()),
            CoreError::Call(err) => Self::Call(err.into()),
            CoreError::Resolution(err) => Self::Resolution(err.into()),
            CoreError::Serialization(err) => Self::Serialization(err.into()),
            CoreError::Backend(err) => Self::Backend(err.into()),
        }
    }
}

///
/// CompileErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompileErrorKind {
    WrongParamCount,
    ArrayReturnNotAllowed,
    TargetNotIdentity,
    NameMismatch,
    TooFewParams,
    ArgCountMismatch,
}

impl From<&CompileError> for CompileErrorKind {
    fn from(err: &CompileError) -> Self {
        match err {
            CompileError::WrongParamCount { .. } => Self::WrongParamCount,
            CompileError::ArrayReturnNotAllowed { .. } => Self::ArrayReturnNotAllowed,
            CompileError::TargetNotIdentity { .. } => Self::TargetNotIdentity,
            CompileError::NameMismatch { .. } => Self::NameMismatch,
            CompileError::TooFewParams { .. } => Self::TooFewParams,
            CompileError::ArgCountMismatch { .. } => Self::ArgCountMismatch,
        }
    }
}

///
/// CallErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CallErrorKind {
    UnknownMethod,
    WrongArgCount,
}

impl From<&CallError> for CallErrorKind {
    fn from(err: &CallError) -> Self {
        match err {
            CallError::UnknownMethod { .. } => Self::UnknownMethod,
            CallError::WrongArgCount { .. } => Self::WrongArgCount,
        }
    }
}

///
/// ResolutionErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ResolutionErrorKind {
    UnknownClass,
    UnknownBackend,
    BackendResolution,
    DuplicateClass,
}

impl From<&ResolutionError> for ResolutionErrorKind {
    fn from(err: &ResolutionError) -> Self {
        match err {
            ResolutionError::UnknownClass { .. } => Self::UnknownClass,
            ResolutionError::UnknownBackend { .. } => Self::UnknownBackend,
            ResolutionError::BackendResolution { .. } => Self::BackendResolution,
            ResolutionError::DuplicateClass(_) => Self::DuplicateClass,
        }
    }
}

///
/// SerializationErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SerializationErrorKind {
    ClassMismatch,
    UnknownObject,
    NotExternalizable,
    MissingField,
    NotSerializable,
    NotAnIdentity,
    NullIdentity,
    NullArray,
    NoFields,
    PrivateRowField,
    ArrayRowField,
    NotPrimitive,
    UnexpectedValue,
    UnexpectedDatum,
    InvalidExternalId,
}

impl From<&SerializationError> for SerializationErrorKind {
    fn from(err: &SerializationError) -> Self {
        match err {
            SerializationError::ClassMismatch { .. } => Self::ClassMismatch,
            SerializationError::UnknownObject { .. } => Self::UnknownObject,
            SerializationError::NotExternalizable { .. } => Self::NotExternalizable,
            SerializationError::MissingField { .. } => Self::MissingField,
            SerializationError::NotSerializable { .. } => Self::NotSerializable,
            SerializationError::NotAnIdentity { .. } => Self::NotAnIdentity,
            SerializationError::NullIdentity { .. } => Self::NullIdentity,
            SerializationError::NullArray => Self::NullArray,
            SerializationError::NoFields { .. } => Self::NoFields,
            SerializationError::PrivateRowField { .. } => Self::PrivateRowField,
            SerializationError::ArrayRowField { .. } => Self::ArrayRowField,
            SerializationError::NotPrimitive { .. } => Self::NotPrimitive,
            SerializationError::UnexpectedValue { .. } => Self::UnexpectedValue,
            SerializationError::UnexpectedDatum { .. } => Self::UnexpectedDatum,
            SerializationError::InvalidExternalId { .. } => Self::InvalidExternalId,
        }
    }
}

///
/// BackendErrorKind
/// Backend failures keep their payload so callers see them unmodified.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BackendErrorKind {
    NotFound { entity: String, id: String },
    NoQueryForDialect { dialect: String },
    InvalidEntity(String),
    Unsupported(String),
    Transport(String),
}

impl From<&BackendError> for BackendErrorKind {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::NotFound { entity, id } => Self::NotFound {
                entity: entity.clone(),
                id: id.clone(),
            },
            BackendError::NoQueryForDialect { dialect } => Self::NoQueryForDialect {
                dialect: dialect.clone(),
            },
            BackendError::InvalidEntity(entity) => Self::InvalidEntity(entity.clone()),
            BackendError::Unsupported(detail) => Self::Unsupported(detail.clone()),
            BackendError::Transport(detail) => Self::Transport(detail.clone()),
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorClass {
    Contract,
    NotFound,
    Transport,
    Unresolved,
    Unsupported,
}

impl From<CoreErrorClass> for ErrorClass {
    fn from(class: CoreErrorClass) -> Self {
        match class {
            CoreErrorClass::Contract => Self::Contract,
            CoreErrorClass::NotFound => Self::NotFound,
            CoreErrorClass::Transport => Self::Transport,
            CoreErrorClass::Unresolved => Self::Unresolved,
            CoreErrorClass::Unsupported => Self::Unsupported,
        }
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Backend,
    Binding,
    Config,
    Registry,
    Serialize,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Backend => Self::Backend,
            CoreErrorOrigin::Binding => Self::Binding,
            CoreErrorOrigin::Registry => Self::Registry,
            CoreErrorOrigin::Serialize => Self::Serialize,
        }
    }
}

///
/// TESTS
///
