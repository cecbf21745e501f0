use crate::{
    DATE_TIME_PATH, OPEN_OBJECT_PATH, PATH_SEPARATOR,
    catalog::{ClassCatalog, ResolutionError},
    error::Error,
    model::{join_path, namespace_of},
    serialize::{ArraySerializer, PassthroughSerializer, Serializer},
    store::EnvironmentStore,
};
use std::rc::Rc;

///
/// CONSTANTS
///

/// Annotations treated as plain backend scalars.
pub const PRIMITIVE_TYPES: &[&str] = &["string", "integer", "int", "boolean", "bool", "float"];

/// Bare array annotation; an array of primitives.
pub const ARRAY_TYPE: &str = "array";

/// Suffix marking an array of the preceding element type.
pub const ARRAY_SUFFIX: &str = "[]";

///
/// TypeElement
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeElement {
    Primitive,
    /// Ad hoc structure with no declared shape.
    Open,
    DateTime,
    /// Catalogued class, by absolute path.
    Class(String),
}

///
/// TypeInfo
///
/// Parsed type annotation: array-ness plus the element it describes.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeInfo {
    pub is_array: bool,
    pub element: TypeElement,
}

impl TypeInfo {
    #[must_use]
    pub const fn primitive() -> Self {
        Self {
            is_array: false,
            element: TypeElement::Primitive,
        }
    }

    /// Parse an annotation declared on `declaring_path`.
    ///
    /// Unqualified class names resolve relative to the declaring type's
    /// namespace; names with a leading or inner `::` are absolute.
    pub fn parse(
        annotation: Option<&str>,
        declaring_path: &str,
        catalog: &ClassCatalog,
    ) -> Result<Self, ResolutionError> {
        let Some(hint) = annotation.map(str::trim).filter(|hint| !hint.is_empty()) else {
            return Ok(Self::primitive());
        };

        let (is_array, hint) = match hint.strip_suffix(ARRAY_SUFFIX) {
            Some(inner) => (true, Some(inner)),
            None if hint == ARRAY_TYPE => (true, None),
            None => (false, Some(hint)),
        };

        let element = match hint {
            None => TypeElement::Primitive,
            Some(name) if PRIMITIVE_TYPES.contains(&name) => TypeElement::Primitive,
            Some(OPEN_OBJECT_PATH) => TypeElement::Open,
            Some(name) => {
                let path = resolve_path(name, declaring_path);
                if path == DATE_TIME_PATH {
                    TypeElement::DateTime
                } else {
                    catalog.resolve(&path, declaring_path)?;
                    TypeElement::Class(path)
                }
            }
        };

        Ok(Self { is_array, element })
    }

    /// Class path of the element, if it names one.
    #[must_use]
    pub fn element_class(&self) -> Option<&str> {
        match &self.element {
            TypeElement::Class(path) => Some(path),
            TypeElement::DateTime => Some(DATE_TIME_PATH),
            TypeElement::Primitive | TypeElement::Open => None,
        }
    }

    /// Element type with array-ness stripped.
    #[must_use]
    pub fn element_type(&self) -> Self {
        Self {
            is_array: false,
            element: self.element.clone(),
        }
    }

    /// Serializer for this type, resolving classes through the store.
    /// Row-mode synthesis is never used here.
    pub fn serializer(&self, store: &EnvironmentStore) -> Result<Rc<dyn Serializer>, Error> {
        let element: Rc<dyn Serializer> = match &self.element {
            TypeElement::Primitive | TypeElement::Open => Rc::new(PassthroughSerializer::new()),
            TypeElement::DateTime => store.class_serializer(DATE_TIME_PATH)?,
            TypeElement::Class(path) => store.class_serializer(path)?,
        };

        if self.is_array {
            Ok(Rc::new(ArraySerializer::new(element)))
        } else {
            Ok(element)
        }
    }
}

fn resolve_path(name: &str, declaring_path: &str) -> String {
    if name == DATE_TIME_PATH {
        return DATE_TIME_PATH.to_string();
    }

    if let Some(absolute) = name.strip_prefix(PATH_SEPARATOR) {
        absolute.to_string()
    } else if name.contains(PATH_SEPARATOR) {
        name.to_string()
    } else {
        join_path(namespace_of(declaring_path), name)
    }
}

///
/// TESTS
///
