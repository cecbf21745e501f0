use crate::{
    datum::{Datum, Identity, Object},
    serialize::SerializationError,
    traits::{IdentityClass, ValueClass},
};
use chrono::{DateTime, Utc};

///
/// IntoDatum
///

pub trait IntoDatum {
    fn into_datum(self) -> Datum;
}

///
/// FromDatum
///

pub trait FromDatum: Sized {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError>;
}

const fn unexpected(expected: &'static str, found: &Datum) -> SerializationError {
    SerializationError::UnexpectedDatum {
        expected,
        found: found.kind(),
    }
}

/// Convert a datum into a typed identity class, checking the class path.
pub fn identity_from_datum<T: IdentityClass>(datum: Datum) -> Result<T, SerializationError> {
    match datum {
        Datum::Identity(identity) if identity.class() == T::MODEL.path => {
            Ok(T::from_identity(identity))
        }
        Datum::Identity(identity) => Err(SerializationError::ClassMismatch {
            expected: T::MODEL.path.to_string(),
            found: identity.class().to_string(),
        }),
        other => Err(unexpected("Identity", &other)),
    }
}

/// Convert a datum into a typed value class through its load-path constructor.
pub fn value_from_datum<T: ValueClass>(datum: Datum) -> Result<T, SerializationError> {
    match datum {
        Datum::Object(object) if object.class() == T::MODEL.path => T::materialize(object),
        Datum::Object(object) => Err(SerializationError::ClassMismatch {
            expected: T::MODEL.path.to_string(),
            found: object.class().to_string(),
        }),
        other => Err(unexpected("Object", &other)),
    }
}

///
/// Identity and value class glue
///
/// Implements `IntoDatum` (by value and by reference) and `FromDatum` for
/// types that already implement `IdentityClass` / `ValueClass`.
///

#[macro_export]
macro_rules! identity_datum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::datum::IntoDatum for $ty {
                fn into_datum(self) -> $crate::datum::Datum {
                    $crate::datum::Datum::Identity(
                        $crate::traits::IdentityClass::identity(&self).clone(),
                    )
                }
            }

            impl $crate::datum::IntoDatum for &$ty {
                fn into_datum(self) -> $crate::datum::Datum {
                    $crate::datum::Datum::Identity(
                        $crate::traits::IdentityClass::identity(self).clone(),
                    )
                }
            }

            impl $crate::datum::FromDatum for $ty {
                fn from_datum(
                    datum: $crate::datum::Datum,
                ) -> ::core::result::Result<Self, $crate::serialize::SerializationError> {
                    $crate::datum::identity_from_datum(datum)
                }
            }
        )+
    };
}

#[macro_export]
macro_rules! value_datum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::datum::IntoDatum for $ty {
                fn into_datum(self) -> $crate::datum::Datum {
                    $crate::datum::Datum::Object($crate::traits::ValueClass::to_object(&self))
                }
            }

            impl $crate::datum::IntoDatum for &$ty {
                fn into_datum(self) -> $crate::datum::Datum {
                    $crate::datum::Datum::Object($crate::traits::ValueClass::to_object(self))
                }
            }

            impl $crate::datum::FromDatum for $ty {
                fn from_datum(
                    datum: $crate::datum::Datum,
                ) -> ::core::result::Result<Self, $crate::serialize::SerializationError> {
                    $crate::datum::value_from_datum(datum)
                }
            }
        )+
    };
}

// ---- IntoDatum ---------------------------------------------------------

impl IntoDatum for Datum {
    fn into_datum(self) -> Datum {
        self
    }
}

impl IntoDatum for bool {
    fn into_datum(self) -> Datum {
        Datum::Bool(self)
    }
}

impl IntoDatum for i64 {
    fn into_datum(self) -> Datum {
        Datum::Int(self)
    }
}

impl IntoDatum for i32 {
    fn into_datum(self) -> Datum {
        Datum::Int(i64::from(self))
    }
}

impl IntoDatum for f64 {
    fn into_datum(self) -> Datum {
        Datum::Float(self)
    }
}

impl IntoDatum for String {
    fn into_datum(self) -> Datum {
        Datum::Text(self)
    }
}

impl IntoDatum for &str {
    fn into_datum(self) -> Datum {
        Datum::Text(self.to_string())
    }
}

impl IntoDatum for DateTime<Utc> {
    fn into_datum(self) -> Datum {
        Datum::DateTime(self)
    }
}

impl IntoDatum for Identity {
    fn into_datum(self) -> Datum {
        Datum::Identity(self)
    }
}

impl IntoDatum for &Identity {
    fn into_datum(self) -> Datum {
        Datum::Identity(self.clone())
    }
}

impl IntoDatum for Object {
    fn into_datum(self) -> Datum {
        Datum::Object(self)
    }
}

impl<T: IntoDatum> IntoDatum for Option<T> {
    fn into_datum(self) -> Datum {
        self.map_or(Datum::Null, IntoDatum::into_datum)
    }
}

impl<T: IntoDatum> IntoDatum for Vec<T> {
    fn into_datum(self) -> Datum {
        Datum::List(self.into_iter().map(IntoDatum::into_datum).collect())
    }
}

// ---- FromDatum ---------------------------------------------------------

impl FromDatum for Datum {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        Ok(datum)
    }
}

impl FromDatum for () {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Null => Ok(()),
            other => Err(unexpected("Null", &other)),
        }
    }
}

impl FromDatum for bool {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Bool(v) => Ok(v),
            other => Err(unexpected("Bool", &other)),
        }
    }
}

impl FromDatum for i64 {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Int(v) => Ok(v),
            other => Err(unexpected("Int", &other)),
        }
    }
}

impl FromDatum for f64 {
    #[expect(clippy::cast_precision_loss)]
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Float(v) => Ok(v),
            Datum::Int(v) => Ok(v as Self),
            other => Err(unexpected("Float", &other)),
        }
    }
}

impl FromDatum for String {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Text(v) => Ok(v),
            other => Err(unexpected("Text", &other)),
        }
    }
}

impl FromDatum for DateTime<Utc> {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::DateTime(v) => Ok(v),
            other => Err(unexpected("DateTime", &other)),
        }
    }
}

impl FromDatum for Identity {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Identity(v) => Ok(v),
            other => Err(unexpected("Identity", &other)),
        }
    }
}

impl FromDatum for Object {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Object(v) => Ok(v),
            other => Err(unexpected("Object", &other)),
        }
    }
}

impl<T: FromDatum> FromDatum for Option<T> {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::Null => Ok(None),
            other => T::from_datum(other).map(Some),
        }
    }
}

impl<T: FromDatum> FromDatum for Vec<T> {
    fn from_datum(datum: Datum) -> Result<Self, SerializationError> {
        match datum {
            Datum::List(list) => list.into_iter().map(T::from_datum).collect(),
            other => Err(unexpected("List", &other)),
        }
    }
}
