use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
    rc::Rc,
};

///
/// Identity
///
/// In-memory stand-in for a persisted entity.
///
/// Handles compare and hash by instance, never by content: two handles are
/// equal only when they are clones of the same allocation. The external id
/// lives in the owning store's cache, not in the handle.
///

#[derive(Clone)]
pub struct Identity(Rc<IdentityInner>);

struct IdentityInner {
    class: String,
}

impl Identity {
    /// Create a fresh, not yet persisted identity of the given class.
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self(Rc::new(IdentityInner {
            class: class.into(),
        }))
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.0.class
    }

    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("class", &self.0.class)
            .field("instance", &Rc::as_ptr(&self.0))
            .finish()
    }
}
