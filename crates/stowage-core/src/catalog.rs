use crate::{model::ClassModel, traits::Class};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// ResolutionError
///

#[derive(Debug, ThisError)]
pub enum ResolutionError {
    #[error("class '{name}' referenced from '{declared_in}' is not catalogued")]
    UnknownClass { name: String, declared_in: String },

    #[error("backend '{name}' is not configured")]
    UnknownBackend { name: String },

    #[error("cannot find backend for '{operation}' using {identity_class:?}")]
    BackendResolution {
        operation: String,
        identity_class: Option<String>,
    },

    #[error("class '{0}' is already catalogued")]
    DuplicateClass(String),
}

///
/// ClassCatalog
///
/// Registry of every class type annotations may name. A class exists for
/// resolution purposes iff it is catalogued here; the date-time and open
/// object built-ins are handled by the type descriptor itself.
///

#[derive(Clone, Debug, Default)]
pub struct ClassCatalog(HashMap<&'static str, &'static ClassModel>);

impl ClassCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Register a class model under its path.
    pub fn register(&mut self, model: &'static ClassModel) -> Result<(), ResolutionError> {
        if self.0.contains_key(model.path) {
            return Err(ResolutionError::DuplicateClass(model.path.to_string()));
        }
        self.0.insert(model.path, model);

        Ok(())
    }

    pub fn register_class<T: Class>(&mut self) -> Result<(), ResolutionError> {
        self.register(T::MODEL)
    }

    /// Builder form of [`Self::register_class`].
    pub fn with<T: Class>(mut self) -> Result<Self, ResolutionError> {
        self.register_class::<T>()?;

        Ok(self)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&'static ClassModel> {
        self.0.get(path).copied()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// Look up a class, failing with the referencing context when missing.
    pub fn resolve(
        &self,
        path: &str,
        declared_in: &str,
    ) -> Result<&'static ClassModel, ResolutionError> {
        self.get(path).ok_or_else(|| ResolutionError::UnknownClass {
            name: path.to_string(),
            declared_in: declared_in.to_string(),
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<&'static ClassModel> for ClassCatalog {
    /// Later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = &'static ClassModel>>(iter: I) -> Self {
        Self(iter.into_iter().map(|model| (model.path, model)).collect())
    }
}

///
/// TESTS
///
