//! Serializer: typed object <-> canonical form <-> JSON
//!
//! The canonical form `{class_path, params: [{name, value, type}]}` is the
//! wire contract between the serializer and the persistence agent.

pub mod canonical;
pub mod handlers;
pub mod serializer;

pub use canonical::{CanonicalForm, ParamTriple};
pub use serializer::Serializer;
