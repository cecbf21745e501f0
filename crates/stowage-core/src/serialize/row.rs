use crate::{
    OPEN_OBJECT_PATH,
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
/// DataRowSerializer
///
/// Read-only projection of a raw record into an object. Typed rows keep
/// exactly their declared fields; open rows also carry every undeclared raw
/// field through unchanged.
///

#[derive(Debug)]
pub struct DataRowSerializer {
    class: String,
    fields: BTreeMap<String, Rc<dyn Serializer>>,
    keep_undeclared: bool,
}

impl DataRowSerializer {
    #[must_use]
    pub fn new(class: impl Into<String>, fields: BTreeMap<String, Rc<dyn Serializer>>) -> Self {
        Self {
            class: class.into(),
            fields,
            keep_undeclared: false,
        }
    }

    /// Ad hoc projection: declared fields are interned, the rest pass through.
    #[must_use]
    pub fn open(fields: BTreeMap<String, Rc<dyn Serializer>>) -> Self {
        Self {
            class: OPEN_OBJECT_PATH.to_string(),
            fields,
            keep_undeclared: true,
        }
    }

    /// Synthesize a row shape from the public instance fields of `model`.
    pub fn synthesize(model: &'static ClassModel, store: &EnvironmentStore) -> Result<Self, Error> {
        let mut fields = BTreeMap::new();

        for declared in model.instance_fields() {
            let field = declared.field;
            if !field.is_public() {
                return Err(SerializationError::PrivateRowField {
                    class: model.path.to_string(),
                    field: field.name.to_string(),
                }
                .into());
            }

            let ty = TypeInfo::parse(field.annotation, declared.declared_in.path, store.catalog())?;
            if ty.is_array {
                return Err(SerializationError::ArrayRowField {
                    class: model.path.to_string(),
                    field: field.name.to_string(),
                }
                .into());
            }

            fields.insert(field.name.to_string(), ty.serializer(store)?);
        }

        Ok(Self::new(model.path, fields))
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    fn not_externalizable(&self) -> SerializationError {
        SerializationError::NotExternalizable {
            class: self.class.clone(),
        }
    }
}

impl Serializer for DataRowSerializer {
    fn externalize(&self, _datum: &Datum) -> Result<Value, Error> {
        Err(self.not_externalizable().into())
    }

    fn internalize(&self, value: Value) -> Result<Datum, Error> {
        let mut raw = match value {
            Value::Null => return Ok(Datum::Null),
            Value::Record(raw) => raw,
            other => return Err(SerializationError::unexpected_value("Record", &other).into()),
        };

        let mut fields = BTreeMap::new();
        for (name, serializer) in &self.fields {
            let value = raw
                .remove(name)
                .ok_or_else(|| SerializationError::MissingField {
                    class: self.class.clone(),
                    field: name.clone(),
                })?;
            fields.insert(name.clone(), serializer.internalize(value)?);
        }

        if self.keep_undeclared {
            for (name, value) in raw {
                fields.insert(name, Datum::from_value(value));
            }
        }

        Ok(Datum::Object(Object::stamped(self.class.clone(), fields)))
    }

    fn backend_type(&self) -> Result<BackendType, SerializationError> {
        Err(self.not_externalizable())
    }

    /// Record of declared field types, used by finders to request rows.
    fn result_shape(&self) -> Result<BackendType, SerializationError> {
        let mut types = BTreeMap::new();
        for (name, serializer) in &self.fields {
            types.insert(name.clone(), serializer.backend_type()?);
        }

        Ok(BackendType::Record(types))
    }
}
