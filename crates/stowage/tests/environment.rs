mod common;

use common::{
    BarValue, FooId, MAIN, Reports, SpanValue, Things, catalog, environment, memory_backend,
    seed_foo,
};
use proptest::prelude::*;
use std::{collections::BTreeMap, rc::Rc};
use stowage::{
    Environment, EnvironmentConfig,
    core::value::{FieldValues, Value},
    error::{
        BackendErrorKind, CompileErrorKind, ErrorClass, ErrorKind, ErrorOrigin,
        SerializationErrorKind,
    },
    prelude::*,
};

static MISNAMED: InterfaceModel = InterfaceModel::new(
    "app::Misnamed",
    &[MethodModel::new(
        "getBarX",
        &[ParamModel::new("foo", Some("FooId"))],
        Some("int"),
    )],
);

static ARRAY_GETTER: InterfaceModel = InterfaceModel::new(
    "app::ArrayGetter",
    &[MethodModel::new(
        "getFooXs",
        &[ParamModel::new("foo", Some("FooId"))],
        Some("int[]"),
    )],
);

#[test]
fn export_creates_the_record_once() {
    let backend = memory_backend();
    let env = environment(&backend);
    let foo = FooId::create();

    let id = env.export(&foo).unwrap();

    assert_eq!(env.export(&foo).unwrap(), id);
    assert_eq!(backend.row(FooId::path(), &id), Some(FieldValues::new()));
    assert_eq!(env.import::<FooId>(id).unwrap(), foo);
}

#[test]
fn setters_and_getters_round_trip() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let foo = FooId::create();
    env.export(&foo).unwrap();

    things.update_foo(&foo, &BarValue { x: 7 }, "seven").unwrap();

    assert_eq!(things.get_foo_bar(&foo).unwrap(), Some(BarValue { x: 7 }));
    assert_eq!(things.get_foo_label(&foo).unwrap().as_deref(), Some("seven"));
}

#[test]
fn multi_field_values_are_stored_as_records() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let foo = FooId::create();
    let id = env.export(&foo).unwrap();
    let span = SpanValue::new(2, 5).unwrap();

    things.set_foo_span(&foo, &span).unwrap();

    let row = backend.row(FooId::path(), &id).unwrap();
    assert_eq!(
        row.get("span"),
        Some(&Value::record([("start", Value::Int(2)), ("end", Value::Int(5))]))
    );
    assert_eq!(things.get_foo_span(&foo).unwrap(), Some(span));
}

#[test]
fn unset_fields_read_as_none() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let foo = FooId::create();
    env.export(&foo).unwrap();

    assert_eq!(things.get_foo_bar(&foo).unwrap(), None);
}

#[test]
fn getters_on_missing_records_are_not_found() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let ghost: FooId = env.import("99").unwrap();

    let err = things.get_foo_bar(&ghost).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.origin, ErrorOrigin::Backend);
    assert_eq!(
        err.kind,
        ErrorKind::Backend(BackendErrorKind::NotFound {
            entity: "Foo".to_string(),
            id: "99".to_string(),
        })
    );
}

#[test]
fn setters_need_a_known_identity() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();

    let err = things
        .update_foo(&FooId::create(), &BarValue { x: 1 }, "new")
        .unwrap_err();

    assert_eq!(err.origin, ErrorOrigin::Serialize);
    assert!(backend.tables().table("Foo").is_none());
}

#[test]
fn finders_return_interned_identities() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let (a, b, c) = (FooId::create(), FooId::create(), FooId::create());
    for (foo, x) in [(&a, 1), (&b, 2), (&c, 1)] {
        env.export(foo).unwrap();
        things.update_foo(foo, &BarValue { x }, "label").unwrap();
    }

    let found = things.find_by_bar(&BarValue { x: 1 }).unwrap();

    assert_eq!(found, vec![a, c]);
    assert!(things.find_by_bar(&BarValue { x: 3 }).unwrap().is_empty());
}

#[test]
fn single_finders_return_first_match_or_none() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let id = seed_foo(&backend, "alpha");
    seed_foo(&backend, "alpha");

    let found = things.find_one_by_label("alpha").unwrap().unwrap();

    assert_eq!(env.export(&found).unwrap(), id);
    assert_eq!(things.find_one_by_label("omega").unwrap(), None);
}

#[test]
fn row_finders_project_declared_fields() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let id = seed_foo(&backend, "alpha");

    let rows = things.find_rows().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].class(), "app::FooRow");
    assert_eq!(
        rows[0].get("foo"),
        Some(&Datum::Identity(env.import_class(FooId::path(), id).unwrap()))
    );
    assert_eq!(rows[0].get("label"), Some(&Datum::Text("alpha".to_string())));
}

#[test]
fn hand_written_helpers_share_the_identity_cache() {
    let backend = memory_backend();
    let env = environment(&backend);
    let things: Things = env.implement(Vec::new()).unwrap();
    let id = seed_foo(&backend, "alpha");

    let foo = things.import_foo(id.as_str()).unwrap();

    assert_eq!(foo, env.import::<FooId>(id.clone()).unwrap());
    assert_eq!(things.export_foo(&foo).unwrap(), id);
}

#[test]
fn native_queries_intern_declared_columns() {
    let backend = memory_backend();
    let env = environment(&backend);
    let reports: Reports = env.implement(vec!["r-".into_datum()]).unwrap();
    let id = seed_foo(&backend, "alpha");

    let rows = reports.labels().unwrap();

    let row = rows[0].as_object().unwrap();
    assert!(row.is_open());
    assert_eq!(
        row.get("foo"),
        Some(&Datum::Identity(env.import_class(FooId::path(), id).unwrap()))
    );
    assert_eq!(row.get("label"), Some(&Datum::Text("alpha".to_string())));
    assert_eq!(reports.prefix(), Some(&Datum::Text("r-".to_string())));
}

#[test]
fn native_queries_need_the_backend_dialect() {
    let backend = memory_backend();
    let env = environment(&backend);
    let queries = QuerySpecMap::from([("sqlite".to_string(), "select 1".to_string())]);

    let err = env
        .retrieve(MAIN, &queries, &BTreeMap::new(), &BTreeMap::new())
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn constructor_arguments_are_checked() {
    let backend = memory_backend();
    let env = environment(&backend);

    let err = env.implement::<Reports>(Vec::new()).err().unwrap();

    assert_eq!(err.class, ErrorClass::Contract);
    assert_eq!(err.origin, ErrorOrigin::Binding);
    assert_eq!(err.kind, ErrorKind::Compile(CompileErrorKind::ArgCountMismatch));
}

#[test]
fn compile_failures_keep_their_kind() {
    let backend = memory_backend();
    let env = environment(&backend);

    let misnamed = env.implement_model(&MISNAMED, Vec::new()).unwrap_err();
    let array = env.implement_model(&ARRAY_GETTER, Vec::new()).unwrap_err();

    assert_eq!((misnamed.class, misnamed.origin), (array.class, array.origin));
    assert_eq!(misnamed.kind, ErrorKind::Compile(CompileErrorKind::NameMismatch));
    assert_eq!(
        array.kind,
        ErrorKind::Compile(CompileErrorKind::ArrayReturnNotAllowed)
    );
}

#[test]
fn export_rejects_non_identities() {
    let backend = memory_backend();
    let env = environment(&backend);

    let err = env.export_datum(&BarValue { x: 1 }.into_datum()).unwrap_err();

    assert_eq!(err.origin, ErrorOrigin::Serialize);
    assert_eq!(
        err.kind,
        ErrorKind::Serialization(SerializationErrorKind::NotAnIdentity)
    );
}

#[test]
fn environments_build_from_json() {
    let backend = memory_backend();
    let dynamic: Rc<dyn Backend> = backend;
    let json = r#"{
        "idClasses": { "app::FooId": "main" },
        "valueClasses": ["app::BarValue", "app::SpanValue"],
        "methods": { "app::Things::findRows": "main" }
    }"#;

    let env = Environment::from_json(
        catalog(),
        BackendMap::from([(MAIN.to_string(), dynamic)]),
        json,
    )
    .unwrap();

    assert!(env.implement::<Things>(Vec::new()).is_ok());
}

#[test]
fn unknown_backends_fail_construction() {
    let config = EnvironmentConfig::new().identity_class(FooId::path(), "nowhere");

    let err = Environment::new(catalog(), BackendMap::new(), config).err().unwrap();

    assert_eq!(err.class, ErrorClass::Unresolved);
    assert_eq!(err.origin, ErrorOrigin::Registry);
}

#[test]
fn environments_do_not_share_identities() {
    let backend = memory_backend();
    let first = environment(&backend);
    let second = environment(&backend);

    let a: FooId = first.import("1").unwrap();
    let b: FooId = second.import("1").unwrap();

    assert_ne!(a, b);
}

proptest! {
    #[test]
    fn stored_values_read_back(x in any::<i64>(), label in "[a-z]{0,12}") {
        let backend = memory_backend();
        let env = environment(&backend);
        let things: Things = env.implement(Vec::new()).unwrap();
        let foo = FooId::create();
        env.export(&foo).unwrap();

        things.update_foo(&foo, &BarValue { x }, &label).unwrap();

        prop_assert_eq!(things.get_foo_bar(&foo).unwrap(), Some(BarValue { x }));
        prop_assert_eq!(things.get_foo_label(&foo).unwrap(), Some(label));
    }
}
