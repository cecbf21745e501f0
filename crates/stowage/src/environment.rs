use crate::{config::EnvironmentConfig, error::Error};
use std::{collections::BTreeMap, rc::Rc};
use stowage_core::{
    backend::QuerySpecMap,
    binding::{self, Implementation},
    catalog::ClassCatalog,
    datum::{Datum, Identity},
    model::InterfaceModel,
    store::{BackendMap, EnvironmentStore},
    traits::{IdentityClass, Interface},
    value::ExternalId,
};
use tracing::info;

///
/// Environment
///
/// Entry point for application code: owns one store and hands out bound
/// interface implementations. Every cache (identities, serializers, compiled
/// interfaces) is scoped to this environment.
///

pub struct Environment {
    store: Rc<EnvironmentStore>,
}

impl Environment {
    pub fn new(
        catalog: ClassCatalog,
        backends: BackendMap,
        config: EnvironmentConfig,
    ) -> Result<Self, Error> {
        let backend_names: Vec<_> = backends.keys().cloned().collect();
        let store = EnvironmentStore::new(catalog, backends, config.into())
            .map_err(stowage_core::Error::from)?;

        info!(backends = ?backend_names, "environment ready");

        Ok(Self {
            store: Rc::new(store),
        })
    }

    /// Build from a JSON configuration document.
    pub fn from_json(
        catalog: ClassCatalog,
        backends: BackendMap,
        json: &str,
    ) -> Result<Self, Error> {
        Self::new(catalog, backends, EnvironmentConfig::from_json_str(json)?)
    }

    #[must_use]
    pub const fn store(&self) -> &Rc<EnvironmentStore> {
        &self.store
    }

    // ---- binding -------------------------------------------------------

    /// Bind a storage interface; `args` are passed through to its constructor.
    pub fn implement<T: Interface>(&self, args: Vec<Datum>) -> Result<T, Error> {
        Ok(T::bind(self.implement_model(T::MODEL, args)?))
    }

    pub fn implement_model(
        &self,
        model: &'static InterfaceModel,
        args: Vec<Datum>,
    ) -> Result<Implementation, Error> {
        Ok(binding::implement(&self.store, model, args)?)
    }

    // ---- identities ----------------------------------------------------

    /// External id of an identity, creating its backend record if needed.
    pub fn export<T: IdentityClass>(&self, value: &T) -> Result<ExternalId, Error> {
        Ok(self.store.export(value.identity())?)
    }

    pub fn export_datum(&self, datum: &Datum) -> Result<ExternalId, Error> {
        Ok(self.store.export_datum(datum)?)
    }

    /// Identity for an external id; the same id always yields the same
    /// instance.
    pub fn import<T: IdentityClass>(&self, id: impl Into<ExternalId>) -> Result<T, Error> {
        Ok(T::from_identity(self.import_class(T::MODEL.path, id)?))
    }

    pub fn import_class(&self, class: &str, id: impl Into<ExternalId>) -> Result<Identity, Error> {
        self.store
            .import(class, id.into())
            .map_err(|err| stowage_core::Error::from(err).into())
    }

    // ---- native queries ------------------------------------------------

    /// Run a native query on a named backend.
    pub fn retrieve(
        &self,
        backend: &str,
        queries: &QuerySpecMap,
        params: &BTreeMap<String, Datum>,
        result_types: &BTreeMap<String, String>,
    ) -> Result<Vec<Datum>, Error> {
        Ok(self.store.retrieve(backend, queries, params, result_types)?)
    }
}
