#![allow(dead_code)]

use std::{collections::BTreeMap, rc::Rc};
use stowage::{
    Error,
    core::{
        backend::{BackendError, MemoryRequest, MemoryTables},
        serialize::SerializationError,
        value::FieldValues,
    },
    identity_datum,
    prelude::*,
    value_datum,
};

pub const MAIN: &str = "main";

// ---- classes -----------------------------------------------------------

static FOO_ID: ClassModel = ClassModel::new("app::FooId", &[]);
static BAR_VALUE: ClassModel =
    ClassModel::new("app::BarValue", &[FieldModel::public("x", Some("int"))]);
static SPAN_VALUE: ClassModel = ClassModel::new(
    "app::SpanValue",
    &[
        FieldModel::private("start", Some("int")),
        FieldModel::private("end", Some("int")),
    ],
);
static FOO_ROW: ClassModel = ClassModel::new(
    "app::FooRow",
    &[
        FieldModel::public("foo", Some("FooId")),
        FieldModel::public("label", Some("string")),
    ],
);

///
/// FooId
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FooId(Identity);

impl Class for FooId {
    const MODEL: &'static ClassModel = &FOO_ID;
}

impl IdentityClass for FooId {
    fn from_identity(identity: Identity) -> Self {
        Self(identity)
    }

    fn identity(&self) -> &Identity {
        &self.0
    }
}

///
/// BarValue
///

#[derive(Clone, Debug, PartialEq)]
pub struct BarValue {
    pub x: i64,
}

impl Class for BarValue {
    const MODEL: &'static ClassModel = &BAR_VALUE;
}

impl ValueClass for BarValue {
    fn to_object(&self) -> Object {
        Object::new(Self::path()).with("x", self.x)
    }

    fn materialize(mut object: Object) -> Result<Self, SerializationError> {
        Ok(Self {
            x: object.take_field("x")?,
        })
    }
}

///
/// SpanValue
///

#[derive(Clone, Debug, PartialEq)]
pub struct SpanValue {
    start: i64,
    end: i64,
}

impl SpanValue {
    /// Domain constructor; rejects inverted spans.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }
}

impl Class for SpanValue {
    const MODEL: &'static ClassModel = &SPAN_VALUE;
}

impl ValueClass for SpanValue {
    fn to_object(&self) -> Object {
        Object::new(Self::path())
            .with("start", self.start)
            .with("end", self.end)
    }

    fn materialize(mut object: Object) -> Result<Self, SerializationError> {
        Ok(Self {
            start: object.take_field("start")?,
            end: object.take_field("end")?,
        })
    }
}

identity_datum!(FooId);
value_datum!(BarValue, SpanValue);

// ---- interfaces --------------------------------------------------------

static THINGS: InterfaceModel = InterfaceModel::new(
    "app::Things",
    &[
        MethodModel::new(
            "getFooBar",
            &[ParamModel::new("foo", Some("FooId"))],
            Some("BarValue"),
        ),
        MethodModel::new(
            "getFooSpan",
            &[ParamModel::new("foo", Some("FooId"))],
            Some("SpanValue"),
        ),
        MethodModel::new(
            "get_foo_label",
            &[ParamModel::new("foo", Some("FooId"))],
            Some("string"),
        ),
        MethodModel::new(
            "updateFoo",
            &[
                ParamModel::new("foo", Some("FooId")),
                ParamModel::new("bar", Some("BarValue")),
                ParamModel::new("label", Some("string")),
            ],
            None,
        ),
        MethodModel::new(
            "setFooSpan",
            &[
                ParamModel::new("foo", Some("FooId")),
                ParamModel::new("span", Some("SpanValue")),
            ],
            None,
        ),
        MethodModel::new(
            "findByBar",
            &[ParamModel::new("bar", Some("BarValue"))],
            Some("FooId[]"),
        ),
        MethodModel::new(
            "findOneByLabel",
            &[ParamModel::new("label", Some("string"))],
            Some("FooId"),
        ),
        MethodModel::new("findRows", &[], Some("FooRow[]")),
    ],
);

///
/// Things
///

pub struct Things(Implementation);

impl Interface for Things {
    const MODEL: &'static InterfaceModel = &THINGS;

    fn bind(implementation: Implementation) -> Self {
        Self(implementation)
    }
}

impl Things {
    pub fn get_foo_bar(&self, foo: &FooId) -> Result<Option<BarValue>, Error> {
        Ok(self.0.invoke("getFooBar", &[foo.into_datum()])?)
    }

    pub fn get_foo_span(&self, foo: &FooId) -> Result<Option<SpanValue>, Error> {
        Ok(self.0.invoke("getFooSpan", &[foo.into_datum()])?)
    }

    pub fn get_foo_label(&self, foo: &FooId) -> Result<Option<String>, Error> {
        Ok(self.0.invoke("get_foo_label", &[foo.into_datum()])?)
    }

    pub fn update_foo(&self, foo: &FooId, bar: &BarValue, label: &str) -> Result<(), Error> {
        let args = [foo.into_datum(), bar.into_datum(), label.into_datum()];

        Ok(self.0.invoke("updateFoo", &args)?)
    }

    pub fn set_foo_span(&self, foo: &FooId, span: &SpanValue) -> Result<(), Error> {
        Ok(self.0.invoke("setFooSpan", &[foo.into_datum(), span.into_datum()])?)
    }

    pub fn find_by_bar(&self, bar: &BarValue) -> Result<Vec<FooId>, Error> {
        Ok(self.0.invoke("findByBar", &[bar.into_datum()])?)
    }

    pub fn find_one_by_label(&self, label: &str) -> Result<Option<FooId>, Error> {
        Ok(self.0.invoke("findOneByLabel", &[label.into_datum()])?)
    }

    pub fn find_rows(&self) -> Result<Vec<Object>, Error> {
        Ok(self.0.invoke("findRows", &[])?)
    }

    /// Hand-written method on top of the bound ones.
    pub fn export_foo(&self, foo: &FooId) -> Result<ExternalId, Error> {
        Ok(self.0.export_using(foo)?)
    }

    pub fn import_foo(&self, id: &str) -> Result<FooId, Error> {
        Ok(self.0.import_using(ExternalId::from(id))?)
    }
}

static REPORTS: InterfaceModel = InterfaceModel::with_constructor(
    "app::Reports",
    &[ParamModel::new("prefix", Some("string"))],
    &[],
);

///
/// Reports
/// Interface with only hand-written methods and a constructor argument.
///

pub struct Reports(Implementation);

impl Interface for Reports {
    const MODEL: &'static InterfaceModel = &REPORTS;

    fn bind(implementation: Implementation) -> Self {
        Self(implementation)
    }
}

impl Reports {
    pub fn prefix(&self) -> Option<&Datum> {
        self.0.constructor_args().first()
    }

    pub fn labels(&self) -> Result<Vec<Datum>, Error> {
        let queries = QuerySpecMap::from([("memory".to_string(), "labels".to_string())]);
        let result_types = BTreeMap::from([("foo".to_string(), FooId::path().to_string())]);

        Ok(self
            .0
            .retrieve_using(MAIN, &queries, &BTreeMap::new(), &result_types)?)
    }
}

// ---- environment -------------------------------------------------------

pub fn catalog() -> ClassCatalog {
    [&FOO_ID, &BAR_VALUE, &SPAN_VALUE, &FOO_ROW]
        .into_iter()
        .collect()
}

pub fn config() -> EnvironmentConfig {
    EnvironmentConfig::new()
        .identity_class(FooId::path(), MAIN)
        .value_class(BarValue::path())
        .value_class(SpanValue::path())
        .method("app::Things::findRows", MAIN)
}

/// Every row of the `Foo` table as `{foo, label}`.
fn foo_rows(
    tables: &mut MemoryTables,
    _request: &MemoryRequest<'_>,
) -> Result<Value, BackendError> {
    let rows = tables
        .table("Foo")
        .into_iter()
        .flat_map(|table| table.rows())
        .map(|(id, row)| {
            Value::record([
                ("foo", Value::Int(i64::try_from(id).unwrap_or_default())),
                ("label", row.get("label").cloned().unwrap_or(Value::Null)),
            ])
        })
        .collect();

    Ok(Value::List(rows))
}

pub fn memory_backend() -> Rc<MemoryBackend> {
    Rc::new(
        MemoryBackend::new()
            .with_operation("app::Things::findRows", foo_rows)
            .with_native_query("labels", foo_rows),
    )
}

pub fn environment(backend: &Rc<MemoryBackend>) -> Environment {
    let dynamic: Rc<dyn Backend> = backend.clone();
    let backends = BackendMap::from([(MAIN.to_string(), dynamic)]);

    Environment::new(catalog(), backends, config()).expect("environment")
}

pub fn seed_foo(backend: &MemoryBackend, label: &str) -> ExternalId {
    backend
        .seed(
            FooId::path(),
            FieldValues::from([("label".to_string(), Value::from(label))]),
        )
        .expect("seed")
}
