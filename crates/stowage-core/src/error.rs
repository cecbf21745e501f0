use crate::{
    backend::BackendError,
    binding::{CallError, CompileError},
    catalog::ResolutionError,
    serialize::SerializationError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Runtime error raised by the binding compiler, the store and the
/// serializers. Backend failures are carried unmodified.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Compile(_) | Self::Call(_) => ErrorClass::Contract,
            Self::Resolution(_) => ErrorClass::Unresolved,
            Self::Serialization(err) => err.class(),
            Self::Backend(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Compile(_) | Self::Call(_) => ErrorOrigin::Binding,
            Self::Resolution(_) => ErrorOrigin::Registry,
            Self::Serialization(_) => ErrorOrigin::Serialize,
            Self::Backend(_) => ErrorOrigin::Backend,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Backend(BackendError::NotFound { .. }))
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Developer error: a declaration or call breaks the binding contract.
    Contract,
    NotFound,
    Transport,
    Unresolved,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Contract => "contract",
            Self::NotFound => "not_found",
            Self::Transport => "transport",
            Self::Unresolved => "unresolved",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Subsystem an error was raised in.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Backend,
    Binding,
    Registry,
    Serialize,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Backend => "backend",
            Self::Binding => "binding",
            Self::Registry => "registry",
            Self::Serialize => "serialize",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
