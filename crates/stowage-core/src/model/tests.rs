use crate::model::{
    ClassModel, FieldModel, InterfaceModel, MethodModel, ParamModel, join_path, namespace_of,
    short_name_of,
};

static BASE: ClassModel = ClassModel::new(
    "app::Base",
    &[
        FieldModel::private("x", None),
        FieldModel::shared("count", Some("int")),
    ],
);

static CHILD: ClassModel = ClassModel::extending(
    "app::nested::Child",
    &BASE,
    &[FieldModel::public("y", Some("string"))],
);

static SERVICE: InterfaceModel = InterfaceModel::with_constructor(
    "app::Service",
    &[ParamModel::new("a", None), ParamModel::new("b", None)],
    &[MethodModel::new("ping", &[], None)],
);

#[test]
fn paths_split_on_separator() {
    assert_eq!(namespace_of("app::nested::Child"), "app::nested");
    assert_eq!(short_name_of("app::nested::Child"), "Child");
    assert_eq!(namespace_of("Root"), "");
    assert_eq!(short_name_of("Root"), "Root");
}

#[test]
fn join_path_skips_empty_namespace() {
    assert_eq!(join_path("", "Foo"), "Foo");
    assert_eq!(join_path("app", "Foo"), "app::Foo");
}

#[test]
fn instance_fields_list_base_first_and_skip_static() {
    let fields = CHILD.instance_fields();
    let names: Vec<_> = fields.iter().map(|f| f.name()).collect();

    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(fields[0].declared_in.path, "app::Base");
    assert_eq!(fields[1].declared_in.path, "app::nested::Child");
    assert!(!fields[0].field.is_public());
}

#[test]
fn class_namespace_comes_from_path() {
    assert_eq!(CHILD.namespace(), "app::nested");
    assert_eq!(CHILD.short_name(), "Child");
}

#[test]
fn interface_operation_names_are_qualified() {
    assert_eq!(SERVICE.operation_name("ping"), "app::Service::ping");
    assert_eq!(SERVICE.constructor_arity(), 2);
}
