//! Environment store: class registry and operation dispatcher.
//!
//! The store owns every long-lived cache of an environment: identity
//! serializers (and with them the identity caches), per-class value and row
//! serializers, and compiled interfaces. Nothing here is global; two stores
//! never share state.


use crate::{
    DATE_TIME_PATH,
    backend::{Backend, QuerySpecMap},
    binding::{self, CompiledInterface},
    catalog::{ClassCatalog, ResolutionError},
    datum::{Datum, Identity},
    error::Error,
    model::InterfaceModel,
    serialize::{
        DataRowSerializer, IdentitySerializer, PassthroughSerializer, SerializationError,
        Serializer, ValueSerializer,
    },
    types::{TypeElement, TypeInfo},
    value::{ExternalId, FieldTypes, FieldValues, Value},
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap},
    ptr,
    rc::Rc,
};
use tracing::debug;

/// Named backends available to a store.
pub type BackendMap = BTreeMap<String, Rc<dyn Backend>>;

///
/// StoreConfig
///
/// Identity class to backend routing, the value class list and per-operation
/// backend overrides.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StoreConfig {
    pub identity_classes: BTreeMap<String, String>,
    pub value_classes: Vec<String>,
    /// Fully-qualified operation name to backend name.
    pub methods: BTreeMap<String, String>,
}

impl StoreConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

///
/// TypedValue
/// One named argument with its declared type.
///

#[derive(Clone, Copy, Debug)]
pub struct TypedValue<'a> {
    pub name: &'a str,
    pub ty: &'a TypeInfo,
    pub value: &'a Datum,
}

impl<'a> TypedValue<'a> {
    #[must_use]
    pub const fn new(name: &'a str, ty: &'a TypeInfo, value: &'a Datum) -> Self {
        Self { name, ty, value }
    }
}

///
/// EnvironmentStore
///

pub struct EnvironmentStore {
    catalog: ClassCatalog,
    backends: BackendMap,
    identity_backends: BTreeMap<String, String>,
    identities: BTreeMap<String, Rc<IdentitySerializer>>,
    value_classes: BTreeSet<String>,
    methods: BTreeMap<String, String>,
    serializers: RefCell<HashMap<String, Rc<dyn Serializer>>>,
    rows: RefCell<HashMap<String, Rc<DataRowSerializer>>>,
    compiled: RefCell<HashMap<*const InterfaceModel, Rc<CompiledInterface>>>,
}

impl EnvironmentStore {
    /// Validate the configuration against the catalog and backend map.
    pub fn new(
        catalog: ClassCatalog,
        backends: BackendMap,
        config: StoreConfig,
    ) -> Result<Self, ResolutionError> {
        let backend = |name: &String| {
            backends
                .get(name)
                .ok_or_else(|| ResolutionError::UnknownBackend { name: name.clone() })
        };

        let mut identities = BTreeMap::new();
        for (class, backend_name) in &config.identity_classes {
            catalog.resolve(class, "identity_classes")?;
            let serializer =
                IdentitySerializer::new(class.clone(), Rc::clone(backend(backend_name)?));
            identities.insert(class.clone(), Rc::new(serializer));
        }

        for class in &config.value_classes {
            catalog.resolve(class, "value_classes")?;
        }

        for backend_name in config.methods.values() {
            backend(backend_name)?;
        }

        debug!(
            backends = backends.len(),
            identity_classes = identities.len(),
            value_classes = config.value_classes.len(),
            methods = config.methods.len(),
            "environment store configured"
        );

        Ok(Self {
            catalog,
            backends,
            identity_backends: config.identity_classes,
            identities,
            value_classes: config.value_classes.into_iter().collect(),
            methods: config.methods,
            serializers: RefCell::default(),
            rows: RefCell::default(),
            compiled: RefCell::default(),
        })
    }

    #[must_use]
    pub const fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn backend(&self, name: &str) -> Result<&Rc<dyn Backend>, ResolutionError> {
        self.backends
            .get(name)
            .ok_or_else(|| ResolutionError::UnknownBackend {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn is_identity_class(&self, class: &str) -> bool {
        self.identities.contains_key(class)
    }

    #[must_use]
    pub fn is_value_class(&self, class: &str) -> bool {
        self.value_classes.contains(class)
    }

    /// Identity classes, value classes and the date-time built-in.
    #[must_use]
    pub fn is_serializable_class(&self, class: &str) -> bool {
        class == DATE_TIME_PATH || self.is_identity_class(class) || self.is_value_class(class)
    }

    // ---- registry ------------------------------------------------------

    /// Backend for an operation: explicit override, then the identity
    /// class's backend.
    pub fn backend_name(
        &self,
        operation: &str,
        identity_class: Option<&str>,
        first_field: Option<&str>,
    ) -> Result<&str, ResolutionError> {
        let name = self
            .methods
            .get(operation)
            .or_else(|| identity_class.and_then(|class| self.identity_backends.get(class)))
            .ok_or_else(|| ResolutionError::BackendResolution {
                operation: operation.to_string(),
                identity_class: identity_class.map(str::to_string),
            })?;

        debug!(operation, ?identity_class, ?first_field, backend = %name, "resolved backend");

        Ok(name)
    }

    /// The one identity serializer registered for `class`.
    pub fn identity_serializer(
        &self,
        class: &str,
    ) -> Result<&Rc<IdentitySerializer>, SerializationError> {
        self.identities
            .get(class)
            .ok_or_else(|| SerializationError::NotAnIdentity {
                class: class.to_string(),
            })
    }

    /// Serializer for a serializable class. Value serializers are built once
    /// and cached; identity classes always yield their shared serializer.
    pub fn class_serializer(&self, class: &str) -> Result<Rc<dyn Serializer>, Error> {
        if let Some(identity) = self.identities.get(class) {
            let serializer: Rc<dyn Serializer> = identity.clone();
            return Ok(serializer);
        }

        if let Some(cached) = self.serializers.borrow().get(class) {
            return Ok(Rc::clone(cached));
        }

        let serializer: Rc<dyn Serializer> = if class == DATE_TIME_PATH {
            Rc::new(PassthroughSerializer::date_time())
        } else if self.is_value_class(class) {
            let model = self.catalog.resolve(class, class)?;
            Rc::new(ValueSerializer::new(model, self)?)
        } else {
            return Err(SerializationError::NotSerializable {
                class: class.to_string(),
            }
            .into());
        };

        self.serializers
            .borrow_mut()
            .insert(class.to_string(), Rc::clone(&serializer));

        Ok(serializer)
    }

    /// Row serializer synthesized from a catalogued class, cached per class.
    pub fn row_serializer(&self, class: &str) -> Result<Rc<DataRowSerializer>, Error> {
        if let Some(cached) = self.rows.borrow().get(class) {
            return Ok(Rc::clone(cached));
        }

        let model = self.catalog.resolve(class, class)?;
        let serializer = Rc::new(DataRowSerializer::synthesize(model, self)?);
        self.rows
            .borrow_mut()
            .insert(class.to_string(), Rc::clone(&serializer));

        Ok(serializer)
    }

    /// Element serializer for a query result; non-serializable classes are
    /// read as rows.
    pub fn result_serializer(&self, ty: &TypeInfo) -> Result<Rc<dyn Serializer>, Error> {
        match &ty.element {
            TypeElement::Class(class) if !self.is_serializable_class(class) => {
                let serializer: Rc<dyn Serializer> = self.row_serializer(class)?;
                Ok(serializer)
            }
            TypeElement::Open => Ok(Rc::new(DataRowSerializer::open(BTreeMap::new()))),
            _ => ty.element_type().serializer(self),
        }
    }

    // ---- identities ----------------------------------------------------

    /// Identity to external id, creating the backend record if needed.
    pub fn export(&self, identity: &Identity) -> Result<ExternalId, Error> {
        self.identity_serializer(identity.class())?.export(identity)
    }

    pub fn export_datum(&self, datum: &Datum) -> Result<ExternalId, Error> {
        match datum {
            Datum::Identity(identity) => self.export(identity),
            other => Err(SerializationError::NotAnIdentity {
                class: other.class().unwrap_or(other.kind()).to_string(),
            }
            .into()),
        }
    }

    /// External id to identity; repeated calls yield the same instance.
    pub fn import(&self, class: &str, id: ExternalId) -> Result<Identity, SerializationError> {
        Ok(self.identity_serializer(class)?.import(id))
    }

    fn identify(&self, identity_class: &str, id: &Datum) -> Result<ExternalId, Error> {
        match id {
            Datum::Identity(identity) => {
                self.identity_serializer(identity_class)?.identify(identity)
            }
            Datum::Null => Err(SerializationError::NullIdentity {
                class: identity_class.to_string(),
            }
            .into()),
            other => Err(SerializationError::class_mismatch(identity_class, other).into()),
        }
    }

    fn externalize_all(&self, args: &[TypedValue<'_>]) -> Result<(FieldTypes, FieldValues), Error> {
        let mut types = FieldTypes::new();
        let mut values = FieldValues::new();

        for arg in args {
            let serializer = arg.ty.serializer(self)?;
            types.insert(arg.name.to_string(), serializer.backend_type()?);
            values.insert(arg.name.to_string(), serializer.externalize(arg.value)?);
        }

        Ok((types, values))
    }

    // ---- dispatch ------------------------------------------------------

    /// Read one field of an already known identity.
    pub fn get(
        &self,
        backend_name: &str,
        operation: &str,
        identity_class: &str,
        id: &Datum,
        field_type: &TypeInfo,
        field: &str,
    ) -> Result<Datum, Error> {
        let id = self.identify(identity_class, id)?;
        let serializer = field_type.serializer(self)?;
        let backend = self.backend(backend_name)?;

        debug!(operation, backend = backend_name, id = %id, field, "get");
        let field_type = serializer.backend_type()?;
        let value = backend.get(operation, identity_class, &id, &field_type, field)?;

        serializer.internalize(value)
    }

    /// Write named fields of an already known identity.
    pub fn set(
        &self,
        backend_name: &str,
        operation: &str,
        identity_class: &str,
        id: &Datum,
        fields: &[TypedValue<'_>],
    ) -> Result<(), Error> {
        let id = self.identify(identity_class, id)?;
        let (types, values) = self.externalize_all(fields)?;
        let backend = self.backend(backend_name)?;

        debug!(operation, backend = backend_name, id = %id, fields = values.len(), "set");
        backend.set(operation, identity_class, &id, &types, &values)?;

        Ok(())
    }

    /// Look up identities or rows. An array result type asks for every
    /// match, otherwise the first match or null.
    pub fn find(
        &self,
        backend_name: &str,
        operation: &str,
        result: &TypeInfo,
        filters: &[TypedValue<'_>],
    ) -> Result<Datum, Error> {
        let (types, values) = self.externalize_all(filters)?;
        let serializer = self.result_serializer(result)?;
        let entity = result
            .element_class()
            .filter(|class| self.is_identity_class(class));
        let backend = self.backend(backend_name)?;

        debug!(operation, backend = backend_name, ?entity, multiple = result.is_array, "find");
        let data = backend.find(
            operation,
            entity,
            &types,
            &values,
            &serializer.result_shape()?,
            result.is_array,
        )?;

        if !result.is_array {
            return serializer.internalize(data);
        }

        let items = match data {
            Value::List(items) => items,
            other => return Err(SerializationError::unexpected_value("List", &other).into()),
        };

        items
            .into_iter()
            .map(|item| serializer.internalize(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Datum::List)
    }

    /// Run a native query. Parameter classes are taken from their runtime
    /// type; result fields named in `result_types` are interned, others pass
    /// through unchanged.
    pub fn retrieve(
        &self,
        backend_name: &str,
        queries: &QuerySpecMap,
        params: &BTreeMap<String, Datum>,
        result_types: &BTreeMap<String, String>,
    ) -> Result<Vec<Datum>, Error> {
        let mut param_types = FieldTypes::new();
        let mut param_values = FieldValues::new();
        for (name, value) in params {
            let serializer: Rc<dyn Serializer> = match value.class() {
                Some(class) => self.class_serializer(class)?,
                None => Rc::new(PassthroughSerializer::new()),
            };
            param_types.insert(name.clone(), serializer.backend_type()?);
            param_values.insert(name.clone(), serializer.externalize(value)?);
        }

        let mut fields = BTreeMap::new();
        let mut field_types = FieldTypes::new();
        for (name, annotation) in result_types {
            let ty = TypeInfo::parse(Some(annotation.as_str()), "", &self.catalog)?;
            let serializer = ty.serializer(self)?;
            field_types.insert(name.clone(), serializer.backend_type()?);
            fields.insert(name.clone(), serializer);
        }
        let row = DataRowSerializer::open(fields);
        let backend = self.backend(backend_name)?;

        debug!(backend = backend_name, params = param_values.len(), "retrieve");
        backend
            .retrieve(queries, &param_types, &param_values, &field_types)?
            .into_iter()
            .map(|value| row.internalize(value))
            .collect()
    }

    // ---- binding -------------------------------------------------------

    /// Compiled bindings for an interface, compiled once per store.
    /// Keyed by model identity, so distinct models sharing a path never alias.
    pub fn compiled(&self, model: &'static InterfaceModel) -> Result<Rc<CompiledInterface>, Error> {
        let key = ptr::from_ref(model);
        if let Some(compiled) = self.compiled.borrow().get(&key) {
            return Ok(Rc::clone(compiled));
        }

        let compiled = Rc::new(binding::compile(self, model)?);
        self.compiled
            .borrow_mut()
            .insert(key, Rc::clone(&compiled));

        Ok(compiled)
    }
}
