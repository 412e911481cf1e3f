//! Typed-object model
//!
//! - [`ParamType`] / [`ParamValue`]: the closed set of scalar kinds
//! - [`Parameterized`]: field enumeration and by-name access
//! - [`parameterized!`](crate::parameterized): declares conforming structs

pub mod declare;
pub mod parameterized;
pub mod value;

pub use parameterized::{dotted_path, FieldSpec, Parameterized, ParameterizedClass, IDENTITY_FIELD};
pub use value::{ParamType, ParamValue, ScalarParam};
