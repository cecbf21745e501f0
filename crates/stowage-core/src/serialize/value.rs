use crate::{
    datum::{Datum, Object},
    error::Error,
    model::ClassModel,
    serialize::{SerializationError, Serializer},
    store::EnvironmentStore,
    types::TypeInfo,
    value::{BackendType, Value},
};
use std::{collections::BTreeMap, rc::Rc};

///
/// ValueField
///

#[derive(Debug)]
struct ValueField {
    name: &'static str,
    serializer: Rc<dyn Serializer>,
}

///
/// ValueSerializer
///
/// Field-by-field conversion of a value class. One field serializes as a
/// transparent scalar, several as a record keyed by field name.
///

#[derive(Debug)]
pub struct ValueSerializer {
    class: &'static str,
    fields: Vec<ValueField>,
    backend_type: BackendType,
}

impl ValueSerializer {
    /// Build child serializers for every instance field, base class first.
    pub fn new(model: &'static ClassModel, store: &EnvironmentStore) -> Result<Self, Error> {
        let declared = model.instance_fields();
        if declared.is_empty() {
            return Err(SerializationError::NoFields {
                class: model.path.to_string(),
            }
            .into());
        }

        let mut fields = Vec::with_capacity(declared.len());
        for field in declared {
            let ty = TypeInfo::parse(
                field.field.annotation,
                field.declared_in.path,
                store.catalog(),
            )?;
            fields.push(ValueField {
                name: field.name(),
                serializer: ty.serializer(store)?,
            });
        }

        let backend_type = match fields.as_slice() {
            [single] => single.serializer.backend_type()?,
            _ => {
                let mut types = BTreeMap::new();
                for field in &fields {
                    types.insert(field.name.to_string(), field.serializer.backend_type()?);
                }
                BackendType::Record(types)
            }
        };

        Ok(Self {
            class: model.path,
            fields,
            backend_type,
        })
    }

    #[must_use]
    pub const fn class(&self) -> &'static str {
        self.class
    }

    /// Field names in serialization order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    const fn is_transparent(&self) -> bool {
        self.fields.len() == 1
    }
}

impl Serializer for ValueSerializer {
    fn externalize(&self, datum: &Datum) -> Result<Value, Error> {
        let object = match datum {
            Datum::Null => return Ok(Value::Null),
            Datum::Object(object) if object.class() == self.class => object,
            other => return Err(SerializationError::class_mismatch(self.class, other).into()),
        };

        let mut record = BTreeMap::new();
        for field in &self.fields {
            let datum = object
                .get(field.name)
                .ok_or_else(|| SerializationError::MissingField {
                    class: self.class.to_string(),
                    field: field.name.to_string(),
                })?;
            let value = field.serializer.externalize(datum)?;

            if self.is_transparent() {
                return Ok(value);
            }
            record.insert(field.name.to_string(), value);
        }

        Ok(Value::Record(record))
    }

    fn internalize(&self, value: Value) -> Result<Datum, Error> {
        if value.is_null() {
            return Ok(Datum::Null);
        }

        let mut fields = BTreeMap::new();
        if let [single] = self.fields.as_slice() {
            fields.insert(single.name.to_string(), single.serializer.internalize(value)?);
        } else {
            let mut record = match value {
                Value::Record(record) => record,
                other => {
                    return Err(SerializationError::unexpected_value("Record", &other).into());
                }
            };

            for field in &self.fields {
                let raw = record
                    .remove(field.name)
                    .ok_or_else(|| SerializationError::MissingField {
                        class: self.class.to_string(),
                        field: field.name.to_string(),
                    })?;
                fields.insert(field.name.to_string(), field.serializer.internalize(raw)?);
            }
        }

        Ok(Datum::Object(Object::stamped(self.class.to_string(), fields)))
    }

    fn backend_type(&self) -> Result<BackendType, SerializationError> {
        Ok(self.backend_type.clone())
    }
}
