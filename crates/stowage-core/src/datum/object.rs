use crate::{
    OPEN_OBJECT_PATH,
    datum::{Datum, FromDatum, IntoDatum},
    serialize::SerializationError,
};
use std::collections::BTreeMap;

///
/// Object
///
/// Field-bearing domain object: a value object, a typed row projection or an
/// ad hoc (open) row. Fields are stamped directly; no domain validation runs
/// here.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    class: String,
    fields: BTreeMap<String, Datum>,
}

impl Object {
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Ad hoc object with no declared shape.
    #[must_use]
    pub fn open() -> Self {
        Self::new(OPEN_OBJECT_PATH)
    }

    /// Load-path constructor used by serializers.
    pub(crate) const fn stamped(class: String, fields: BTreeMap<String, Datum>) -> Self {
        Self { class, fields }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl IntoDatum) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl IntoDatum) {
        self.fields.insert(name.into(), value.into_datum());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.fields.get(name)
    }

    pub fn take(&mut self, name: &str) -> Option<Datum> {
        self.fields.remove(name)
    }

    /// Remove a field and convert it; an absent field reads as null.
    pub fn take_field<T: FromDatum>(&mut self, name: &str) -> Result<T, SerializationError> {
        T::from_datum(self.take(name).unwrap_or(Datum::Null))
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.class == OPEN_OBJECT_PATH
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Datum> {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, Datum> {
        self.fields
    }
}
