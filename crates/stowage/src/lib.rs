//! Stowage binds declared data-access interfaces to pluggable storage
//! backends.
//!
//! ## Crate layout
//! - `core`: datums, class models, serializers, the environment store and
//!   the binding compiler.
//! - `config`: serde-backed environment configuration.
//! - `environment`: the [`Environment`] facade.
//! - `error`: public error type with a structured kind and a stable
//!   class + origin taxonomy.
//!
//! The `prelude` module carries the vocabulary needed to declare classes and
//! interfaces and to bind them.

pub use stowage_core as core;

pub mod config;
pub mod environment;
pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use stowage_core::{identity_datum, value_datum};

pub use config::EnvironmentConfig;
pub use environment::Environment;
pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Environment, EnvironmentConfig};
    pub use stowage_core::{
        backend::{Backend, MemoryBackend, QuerySpecMap},
        catalog::ClassCatalog,
        prelude::*,
        store::BackendMap,
    };
}
