use crate::{
    datum::Datum,
    error::Error,
    serialize::{SerializationError, Serializer},
    value::{BackendType, Value},
};

///
/// PassthroughSerializer
///
/// Structural identity conversion for primitive datums. Open objects travel
/// as records; identities and classed objects are rejected.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PassthroughSerializer {
    tag: Option<String>,
}

impl PassthroughSerializer {
    #[must_use]
    pub const fn new() -> Self {
        Self { tag: None }
    }

    /// Passthrough that reports a fixed backend type tag.
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
        }
    }

    #[must_use]
    pub fn date_time() -> Self {
        Self::tagged(crate::value::DATE_TIME_TAG)
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl Serializer for PassthroughSerializer {
    fn externalize(&self, datum: &Datum) -> Result<Value, Error> {
        Ok(datum.to_value()?)
    }

    fn internalize(&self, value: Value) -> Result<Datum, Error> {
        Ok(Datum::from_value(value))
    }

    fn backend_type(&self) -> Result<BackendType, SerializationError> {
        Ok(self
            .tag
            .as_ref()
            .map_or(BackendType::Primitive, |tag| BackendType::Tag(tag.clone())))
    }
}
