use crate::{
    datum::Datum,
    error::Error,
    serialize::{SerializationError, Serializer},
    value::{BackendType, Value},
};
use std::rc::Rc;

///
/// ArraySerializer
///
/// Element-wise mapping over ordered lists. Null is rejected in both
/// directions; nullable arrays are the caller's concern.
///

#[derive(Debug)]
pub struct ArraySerializer {
    element: Rc<dyn Serializer>,
}

impl ArraySerializer {
    #[must_use]
    pub fn new(element: Rc<dyn Serializer>) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn element(&self) -> &Rc<dyn Serializer> {
        &self.element
    }
}

impl Serializer for ArraySerializer {
    fn externalize(&self, datum: &Datum) -> Result<Value, Error> {
        match datum {
            Datum::List(items) => items
                .iter()
                .map(|item| self.element.externalize(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Datum::Null => Err(SerializationError::NullArray.into()),
            other => Err(SerializationError::UnexpectedDatum {
                expected: "List",
                found: other.kind(),
            }
            .into()),
        }
    }

    fn internalize(&self, value: Value) -> Result<Datum, Error> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| self.element.internalize(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Datum::List),
            Value::Null => Err(SerializationError::NullArray.into()),
            other => Err(SerializationError::unexpected_value("List", &other).into()),
        }
    }

    fn backend_type(&self) -> Result<BackendType, SerializationError> {
        Ok(BackendType::list(self.element.backend_type()?))
    }
}
