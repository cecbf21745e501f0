//! Binding compiler.
//!
//! Every abstract method of a storage interface is classified once as a
//! getter, setter or finder and recorded as a [`MethodBinding`]. The
//! resulting [`CompiledInterface`] drives the generic [`Implementation`]
//! proxy; no per-method code is generated.

mod compile;
mod implementation;


use crate::{datum::Datum, store::TypedValue, types::TypeInfo};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

pub(crate) use compile::compile;

// re-exports
pub use implementation::{Implementation, implement};

///
/// CompileError
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    #[error("'{method}' must take exactly {expected} parameter(s), found {found}")]
    WrongParamCount {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("getter '{method}' cannot return an array")]
    ArrayReturnNotAllowed { method: String },

    #[error("'{method}' must target an identity class, found '{found}'")]
    TargetNotIdentity { method: String, found: String },

    #[error("getter '{method}' must be named '{expected_prefix}<Field>'")]
    NameMismatch {
        method: String,
        expected_prefix: String,
    },

    #[error("setter '{method}' needs an id parameter and at least one value, found {found} parameter(s)")]
    TooFewParams { method: String, found: usize },

    #[error("'{interface}' expects {expected} constructor argument(s), found {found}")]
    ArgCountMismatch {
        interface: String,
        expected: usize,
        found: usize,
    },
}

///
/// CallError
///

#[derive(Debug, ThisError)]
pub enum CallError {
    #[error("'{interface}' has no bound method '{method}'")]
    UnknownMethod { interface: String, method: String },

    #[error("'{method}' takes {expected} argument(s), found {found}")]
    WrongArgCount {
        method: String,
        expected: usize,
        found: usize,
    },
}

///
/// MethodKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MethodKind {
    Getter,
    Setter,
    Finder,
}

///
/// ParamBinding
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamBinding {
    pub name: &'static str,
    pub ty: TypeInfo,
}

impl ParamBinding {
    fn typed<'a>(params: &'a [Self], args: &'a [Datum]) -> Vec<TypedValue<'a>> {
        params
            .iter()
            .zip(args)
            .map(|(param, value)| TypedValue::new(param.name, &param.ty, value))
            .collect()
    }
}

///
/// Binding
/// Kind-specific payload of a compiled method.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Binding {
    Getter {
        identity_class: String,
        field: String,
        field_type: TypeInfo,
    },
    Setter {
        identity_class: String,
        /// Value parameters; the id parameter is not included.
        fields: Vec<ParamBinding>,
    },
    Finder {
        result: TypeInfo,
        filters: Vec<ParamBinding>,
    },
}

///
/// MethodBinding
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MethodBinding {
    pub name: &'static str,
    /// Fully-qualified operation name, `<interface path>::<method>`.
    pub operation: String,
    /// Backend resolved at compile time.
    pub backend: String,
    pub arity: usize,
    pub binding: Binding,
}

impl MethodBinding {
    #[must_use]
    pub const fn kind(&self) -> MethodKind {
        match self.binding {
            Binding::Getter { .. } => MethodKind::Getter,
            Binding::Setter { .. } => MethodKind::Setter,
            Binding::Finder { .. } => MethodKind::Finder,
        }
    }
}

///
/// CompiledInterface
///

#[derive(Debug)]
pub struct CompiledInterface {
    path: &'static str,
    constructor_arity: usize,
    methods: BTreeMap<&'static str, MethodBinding>,
}

impl CompiledInterface {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub const fn constructor_arity(&self) -> usize {
        self.constructor_arity
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodBinding> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodBinding> {
        self.methods.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn check_constructor_args(&self, found: usize) -> Result<(), CompileError> {
        if found == self.constructor_arity {
            Ok(())
        } else {
            Err(CompileError::ArgCountMismatch {
                interface: self.path.to_string(),
                expected: self.constructor_arity,
                found,
            })
        }
    }
}
