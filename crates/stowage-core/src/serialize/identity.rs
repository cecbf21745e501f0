use crate::{
    backend::Backend,
    datum::{Datum, Identity},
    error::Error,
    serialize::{SerializationError, Serializer},
    value::{BackendType, ExternalId, Value},
};
use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};
use tracing::debug;

///
/// IdentityCache
///

#[derive(Default)]
struct IdentityCache {
    by_id: HashMap<ExternalId, Identity>,
    by_instance: HashMap<Identity, ExternalId>,
}

impl IdentityCache {
    fn insert(&mut self, id: ExternalId, identity: Identity) {
        self.by_instance.insert(identity.clone(), id.clone());
        self.by_id.insert(id, identity);
    }
}

///
/// IdentitySerializer
///
/// Owns the bidirectional id cache for one identity class. There is exactly
/// one instance per class per store; every consumer shares it.
///

pub struct IdentitySerializer {
    class: String,
    backend: Rc<dyn Backend>,
    cache: RefCell<IdentityCache>,
}

impl IdentitySerializer {
    #[must_use]
    pub fn new(class: impl Into<String>, backend: Rc<dyn Backend>) -> Self {
        Self {
            class: class.into(),
            backend,
            cache: RefCell::new(IdentityCache::default()),
        }
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Id of a known instance; `None` if the instance was never exported or
    /// imported.
    #[must_use]
    pub fn cached_id(&self, identity: &Identity) -> Option<ExternalId> {
        self.cache.borrow().by_instance.get(identity).cloned()
    }

    /// Map an instance to its id, creating the backend record when the
    /// instance is unknown and `auto_create` is set.
    ///
    /// A failure after the backend minted an id leaves that record orphaned.
    pub fn externalize_with(
        &self,
        identity: &Identity,
        auto_create: bool,
    ) -> Result<ExternalId, Error> {
        self.check_class(identity)?;

        if let Some(id) = self.cached_id(identity) {
            return Ok(id);
        }

        if !auto_create {
            return Err(SerializationError::UnknownObject {
                class: self.class.clone(),
            }
            .into());
        }

        let id = self.backend.create(&self.class)?;
        debug!(class = %self.class, id = %id, "auto-created identity record");
        self.cache.borrow_mut().insert(id.clone(), identity.clone());

        Ok(id)
    }

    /// Export with auto-create.
    pub fn export(&self, identity: &Identity) -> Result<ExternalId, Error> {
        self.externalize_with(identity, true)
    }

    /// Id of an already known instance; never creates.
    pub fn identify(&self, identity: &Identity) -> Result<ExternalId, Error> {
        self.externalize_with(identity, false)
    }

    /// Cached instance for `id`, or a blank new one registered under it.
    #[must_use]
    pub fn import(&self, id: ExternalId) -> Identity {
        if let Some(identity) = self.cache.borrow().by_id.get(&id) {
            return identity.clone();
        }

        let identity = Identity::new(self.class.clone());
        self.cache.borrow_mut().insert(id, identity.clone());

        identity
    }

    /// Number of cached (id, instance) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.borrow().by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_class(&self, identity: &Identity) -> Result<(), SerializationError> {
        if identity.class() == self.class {
            Ok(())
        } else {
            Err(SerializationError::ClassMismatch {
                expected: self.class.clone(),
                found: identity.class().to_string(),
            })
        }
    }
}

impl fmt::Debug for IdentitySerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySerializer")
            .field("class", &self.class)
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}

impl Serializer for IdentitySerializer {
    fn externalize(&self, datum: &Datum) -> Result<Value, Error> {
        match datum {
            Datum::Null => Ok(Value::Null),
            Datum::Identity(identity) => Ok(self.export(identity)?.to_value()),
            other => Err(SerializationError::class_mismatch(&self.class, other).into()),
        }
    }

    fn internalize(&self, value: Value) -> Result<Datum, Error> {
        if value.is_null() {
            return Ok(Datum::Null);
        }

        let id = ExternalId::from_value(&value).ok_or(SerializationError::InvalidExternalId {
            found: value.kind(),
        })?;

        Ok(Datum::Identity(self.import(id)))
    }

    fn backend_type(&self) -> Result<BackendType, SerializationError> {
        Ok(BackendType::Primitive)
    }
}
