//! Static class and interface metadata.
//!
//! Models describe *shape* only: which fields a class declares, which
//! methods an interface leaves abstract, and the type annotations attached
//! to both. They are declared as `static` items next to the types they
//! describe and never change at runtime.
//!
//! In general:
//! - annotations are unparsed strings; [`crate::types::TypeInfo`] reads them
//! - paths use `::` separators; a class namespace is everything before the
//!   last separator

mod class;
mod interface;

#[cfg(test)]
mod tests;

use crate::PATH_SEPARATOR;

// re-exports
pub use class::{ClassModel, DeclaredField, FieldModel, Visibility};
pub use interface::{InterfaceModel, MethodModel, ParamModel};

/// Namespace part of a path; empty for root-level names.
#[must_use]
pub fn namespace_of(path: &str) -> &str {
    path.rsplit_once(PATH_SEPARATOR).map_or("", |(ns, _)| ns)
}

/// Last segment of a path.
#[must_use]
pub fn short_name_of(path: &str) -> &str {
    path.rsplit_once(PATH_SEPARATOR)
        .map_or(path, |(_, name)| name)
}

/// Join a namespace and a name into a path.
#[must_use]
pub fn join_path(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{PATH_SEPARATOR}{name}")
    }
}
