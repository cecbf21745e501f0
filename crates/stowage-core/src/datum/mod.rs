//! Domain-side dynamic values.
//!
//! A [`Datum`] is what bound interfaces accept and return: primitives, lists,
//! identity handles and field-bearing objects. Serializers translate datums
//! to and from backend [`Value`]s.

mod convert;
mod identity;
mod object;


use crate::{DATE_TIME_PATH, serialize::SerializationError, value::Value};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// re-exports
pub use convert::{FromDatum, IntoDatum, identity_from_datum, value_from_datum};
pub use identity::Identity;
pub use object::Object;

///
/// Datum
///

#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    List(Vec<Self>),
    Identity(Identity),
    Object(Object),
}

impl Datum {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stable human-readable variant label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::Text(_) => "Text",
            Self::DateTime(_) => "DateTime",
            Self::List(_) => "List",
            Self::Identity(_) => "Identity",
            Self::Object(_) => "Object",
        }
    }

    /// Runtime class of this datum, if it has one.
    ///
    /// Identities and classed objects report their class path, date-times
    /// report the built-in date-time path. Primitives, lists and open objects
    /// have no class.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        match self {
            Self::Identity(identity) => Some(identity.class()),
            Self::Object(object) if !object.is_open() => Some(object.class()),
            Self::DateTime(_) => Some(DATE_TIME_PATH),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_identity(&self) -> Option<&Identity> {
        match self {
            Self::Identity(identity) => Some(identity),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_list(self) -> Option<Vec<Self>> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Structural conversion of a raw backend value.
    /// Records become open objects; nothing is interned.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(v) => Self::Bool(v),
            Value::Int(v) => Self::Int(v),
            Value::Float(v) => Self::Float(v),
            Value::Text(v) => Self::Text(v),
            Value::DateTime(v) => Self::DateTime(v),
            Value::List(list) => Self::List(list.into_iter().map(Self::from_value).collect()),
            Value::Record(record) => {
                let mut object = Object::open();
                for (name, value) in record {
                    object.set(name, Self::from_value(value));
                }
                Self::Object(object)
            }
        }
    }

    /// Structural conversion to a raw backend value.
    /// Identities and classed objects need a serializer and are rejected.
    pub fn to_value(&self) -> Result<Value, SerializationError> {
        let value = match self {
            Self::Null => Value::Null,
            Self::Bool(v) => Value::Bool(*v),
            Self::Int(v) => Value::Int(*v),
            Self::Float(v) => Value::Float(*v),
            Self::Text(v) => Value::Text(v.clone()),
            Self::DateTime(v) => Value::DateTime(*v),
            Self::List(list) => Value::List(
                list.iter()
                    .map(Self::to_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Self::Object(object) if object.is_open() => {
                let mut record = BTreeMap::new();
                for (name, datum) in object.fields() {
                    record.insert(name.clone(), datum.to_value()?);
                }
                Value::Record(record)
            }
            Self::Identity(_) | Self::Object(_) => {
                return Err(SerializationError::NotPrimitive {
                    found: self.class().unwrap_or(self.kind()).to_string(),
                });
            }
        };

        Ok(value)
    }
}
