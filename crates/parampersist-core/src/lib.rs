//! ParamPersist Core - typed parameter objects and their canonical form
//!
//! This crate provides:
//! - The typed-object model: scalar [`ParamType`]s, the [`Parameterized`]
//!   trait and the [`parameterized!`] declaration macro
//! - A process-wide [`ClassRegistry`] resolving stored class paths
//! - The [`Serializer`] converting objects to and from the canonical
//!   `{class_path, params}` form and JSON
//! - The error facility (`ExError`, `ParamPersistError`) and the structured
//!   logging facility shared with the store crate

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod serialize;

// Used by the logging macros
#[doc(hidden)]
pub use parampersist_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ParamPersistError, Result};
pub use model::{ParamType, ParamValue, Parameterized, ParameterizedClass};
pub use registry::ClassRegistry;
pub use serialize::{CanonicalForm, ParamTriple, Serializer};
