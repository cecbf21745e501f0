use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stowage_core::store::StoreConfig;

///
/// EnvironmentConfig
///
/// Environment configuration: identity class to backend routing, the value
/// class list and per-operation backend overrides. Accepts both snake_case
/// and the camelCase keys `idClasses` / `valueClasses`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    #[serde(alias = "idClasses")]
    pub identity_classes: BTreeMap<String, String>,

    #[serde(alias = "valueClasses")]
    pub value_classes: Vec<String>,

    /// Fully-qualified operation name to backend name.
    pub methods: BTreeMap<String, String>,
}

impl EnvironmentConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn identity_class(mut self, class: impl Into<String>, backend: impl Into<String>) -> Self {
        self.identity_classes.insert(class.into(), backend.into());
        self
    }

    #[must_use]
    pub fn value_class(mut self, class: impl Into<String>) -> Self {
        self.value_classes.push(class.into());
        self
    }

    #[must_use]
    pub fn method(mut self, operation: impl Into<String>, backend: impl Into<String>) -> Self {
        self.methods.insert(operation.into(), backend.into());
        self
    }
}

impl From<EnvironmentConfig> for StoreConfig {
    fn from(config: EnvironmentConfig) -> Self {
        Self {
            identity_classes: config.identity_classes,
            value_classes: config.value_classes,
            methods: config.methods,
        }
    }
}

///
/// TESTS
///
