//! Row types for the `instances` and `params` tables

use crate::errors::Result;
use parampersist_core::ParamTriple;
use std::fmt;
use uuid::Uuid;

/// One persisted object: its id and the class path it was saved as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRow {
    pub id: String,
    pub class_path: String,
}

impl InstanceRow {
    /// New row with a freshly generated id
    pub fn new(class_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            class_path: class_path.into(),
        }
    }
}

impl fmt::Display for InstanceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Instance(id='{}', class_path='{}')>", self.id, self.class_path)
    }
}

/// One persisted field; `value` holds the JSON text of a param triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRow {
    pub id: String,
    pub instance_id: String,
    pub value: String,
}

impl ParamRow {
    /// Encode a triple into a new row owned by `instance_id`
    pub fn encode(instance_id: &str, triple: &ParamTriple) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            instance_id: instance_id.to_string(),
            value: triple.to_json()?,
        })
    }

    /// Parse the stored triple
    ///
    /// # Errors
    ///
    /// `Serialization` if the stored text is not a `{name, value, type}` object.
    pub fn decode(&self) -> Result<ParamTriple> {
        Ok(ParamTriple::from_json(&self.value)?)
    }
}

impl fmt::Display for ParamRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Param(id='{}', instance_id='{}', value='{}')>",
            self.id, self.instance_id, self.value
        )
    }
}
