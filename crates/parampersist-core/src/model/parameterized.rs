//! The typed-object capability persisted by the agent

use crate::errors::Result;
use crate::model::{ParamType, ParamValue};
use std::any::Any;
use std::fmt;

/// Reserved identity field, never persisted as a parameter
pub const IDENTITY_FIELD: &str = "name";

/// Declaration of one parameter field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ParamType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: ParamType) -> Self {
        Self { name, kind }
    }
}

/// An object whose fields are declared scalar parameters
///
/// Implementations are normally generated by [`parameterized!`](crate::parameterized).
pub trait Parameterized: Any + fmt::Debug + Send {
    /// Dotted `<namespace>.<TypeName>` path used to resolve the class on load
    fn class_path(&self) -> String;

    /// Declared fields, in declaration order
    fn fields(&self) -> &'static [FieldSpec];

    /// Current value of a declared field
    fn get_param(&self, name: &str) -> Option<ParamValue>;

    /// Assign a declared field
    ///
    /// # Errors
    ///
    /// `UnknownField` for an undeclared name, `TypeMismatch` when the value
    /// kind does not fit the field.
    fn set_param(&mut self, name: &str, value: ParamValue) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Look up a declared field by name
    fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Persistable `(name, value)` pairs in declaration order, identity excluded
    fn param_values(&self) -> Vec<(&'static str, ParamValue)> {
        self.fields()
            .iter()
            .filter(|f| f.name != IDENTITY_FIELD)
            .filter_map(|f| self.get_param(f.name).map(|v| (f.name, v)))
            .collect()
    }
}

impl dyn Parameterized {
    pub fn is<T: Parameterized>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Parameterized>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Convert a boxed object into its concrete type
    pub fn into_concrete<T: Parameterized>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// A parameterized type that can be constructed from nothing
pub trait ParameterizedClass: Parameterized + Default {
    /// Static counterpart of [`Parameterized::class_path`]
    fn qualified_name() -> String;
}

/// Build a dotted class path from a Rust module path and a type name
pub fn dotted_path(module_path: &str, type_name: &str) -> String {
    format!("{}.{}", module_path.replace("::", "."), type_name)
}
