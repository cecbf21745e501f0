//! Backend contract.
//!
//! A backend is the only technology boundary: it receives externalized
//! values plus type descriptors and answers with raw values. Any operation
//! may be overridden inside a backend by a backend-specific query keyed by
//! the fully-qualified operation name.

mod memory;

use crate::{
    error::ErrorClass,
    value::{BackendType, ExternalId, FieldTypes, FieldValues, Value},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

// re-exports
pub use memory::{
    DIALECT as MEMORY_DIALECT, MemoryBackend, MemoryQuery, MemoryRequest, MemoryTable, MemoryTables,
};

/// Native query text keyed by dialect name.
pub type QuerySpecMap = BTreeMap<String, String>;

///
/// BackendError
///

#[derive(Debug, ThisError)]
pub enum BackendError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("no query for dialect '{dialect}'")]
    NoQueryForDialect { dialect: String },

    #[error("entity class must be an identity: '{0}'")]
    InvalidEntity(String),

    #[error("unsupported backend operation: {0}")]
    Unsupported(String),

    #[error("backend transport failure: {0}")]
    Transport(String),
}

impl BackendError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::NoQueryForDialect { .. } | Self::Unsupported(_) => ErrorClass::Unsupported,
            Self::InvalidEntity(_) => ErrorClass::Contract,
            Self::Transport(_) => ErrorClass::Transport,
        }
    }
}

///
/// Backend
///
/// `entity` is always the identity class path (for example `app::FooId`);
/// deriving a table or collection name from it is backend business.
///

pub trait Backend {
    /// Create a new, empty record and mint its id.
    fn create(&self, entity: &str) -> Result<ExternalId, BackendError>;

    /// Read one field. Fails `NotFound` unless exactly one record matches.
    fn get(
        &self,
        operation: &str,
        entity: &str,
        id: &ExternalId,
        field_type: &BackendType,
        field: &str,
    ) -> Result<Value, BackendError>;

    /// Write fields. Custom operations may touch any number of records.
    fn set(
        &self,
        operation: &str,
        entity: &str,
        id: &ExternalId,
        field_types: &FieldTypes,
        field_values: &FieldValues,
    ) -> Result<(), BackendError>;

    /// Look up ids or rows.
    ///
    /// Single results are the first match or `Null`; `multiple` results are
    /// a `List`, possibly empty. A record `result_type` asks for rows.
    fn find(
        &self,
        operation: &str,
        entity: Option<&str>,
        filter_types: &FieldTypes,
        filter_values: &FieldValues,
        result_type: &BackendType,
        multiple: bool,
    ) -> Result<Value, BackendError>;

    /// Run a native query chosen by this backend's dialect.
    fn retrieve(
        &self,
        queries: &QuerySpecMap,
        param_types: &FieldTypes,
        param_values: &FieldValues,
        result_types: &FieldTypes,
    ) -> Result<Vec<Value>, BackendError>;
}
