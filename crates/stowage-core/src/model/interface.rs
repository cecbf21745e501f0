use crate::PATH_SEPARATOR;

///
/// ParamModel
///

#[derive(Debug)]
pub struct ParamModel {
    pub name: &'static str,
    pub annotation: Option<&'static str>,
}

impl ParamModel {
    #[must_use]
    pub const fn new(name: &'static str, annotation: Option<&'static str>) -> Self {
        Self { name, annotation }
    }
}

///
/// MethodModel
/// One abstract method on a storage interface.
///

#[derive(Debug)]
pub struct MethodModel {
    pub name: &'static str,
    pub params: &'static [ParamModel],
    /// Explicit return annotation. `None` means no declared return type.
    pub returns: Option<&'static str>,
}

impl MethodModel {
    #[must_use]
    pub const fn new(
        name: &'static str,
        params: &'static [ParamModel],
        returns: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            params,
            returns,
        }
    }
}

///
/// InterfaceModel
///
/// Abstract storage interface: the methods the binding compiler fills in,
/// plus the constructor parameters passed through at implementation time.
///

#[derive(Debug)]
pub struct InterfaceModel {
    pub path: &'static str,
    /// Declared constructor parameters; `None` means no constructor.
    pub constructor: Option<&'static [ParamModel]>,
    pub methods: &'static [MethodModel],
}

impl InterfaceModel {
    #[must_use]
    pub const fn new(path: &'static str, methods: &'static [MethodModel]) -> Self {
        Self {
            path,
            constructor: None,
            methods,
        }
    }

    #[must_use]
    pub const fn with_constructor(
        path: &'static str,
        constructor: &'static [ParamModel],
        methods: &'static [MethodModel],
    ) -> Self {
        Self {
            path,
            constructor: Some(constructor),
            methods,
        }
    }

    /// Fully-qualified operation name for one of this interface's methods.
    #[must_use]
    pub fn operation_name(&self, method: &str) -> String {
        format!("{}{PATH_SEPARATOR}{method}", self.path)
    }

    /// Number of constructor arguments an implementation must receive.
    #[must_use]
    pub fn constructor_arity(&self) -> usize {
        self.constructor.map_or(0, <[ParamModel]>::len)
    }
}
