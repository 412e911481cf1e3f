//! Scalar parameter kinds and values
//!
//! Only four scalar kinds can be persisted. Each kind has one canonical type
//! tag written at save time; decoding also accepts the aliases listed in
//! [`ParamType::from_tag`].

use crate::errors::{ParamPersistError, Result};
use std::fmt;
use std::str::FromStr;

/// Closed set of persistable scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Integer,
    Number,
    String,
    Boolean,
}

impl ParamType {
    /// Canonical type tag recorded in the `type` slot of a param triple
    pub fn tag(&self) -> &'static str {
        match self {
            ParamType::Integer => "int",
            ParamType::Number => "float",
            ParamType::String => "str",
            ParamType::Boolean => "bool",
        }
    }

    /// Resolve a stored type tag
    ///
    /// Accepts the canonical tags, the long-form aliases (`number`, `string`,
    /// `boolean`) and the qualified tags written by older databases
    /// (`param.Integer`, `param.Number`, `param.String`,
    /// `param.parameterized.String`, `param.Boolean`).
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "int" | "param.Integer" => Ok(ParamType::Integer),
            "float" | "number" | "param.Number" => Ok(ParamType::Number),
            "str" | "string" | "param.String" | "param.parameterized.String" => {
                Ok(ParamType::String)
            }
            "bool" | "boolean" | "param.Boolean" => Ok(ParamType::Boolean),
            other => Err(ParamPersistError::UnknownTypeTag {
                tag: other.to_string(),
            }),
        }
    }
}

impl FromStr for ParamType {
    type Err = ParamPersistError;

    fn from_str(s: &str) -> Result<Self> {
        ParamType::from_tag(s)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A scalar field value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl ParamValue {
    /// Runtime kind of this value
    pub fn kind(&self) -> ParamType {
        match self {
            ParamValue::Integer(_) => ParamType::Integer,
            ParamValue::Number(_) => ParamType::Number,
            ParamValue::String(_) => ParamType::String,
            ParamValue::Boolean(_) => ParamType::Boolean,
        }
    }

    /// Encode as a JSON scalar
    ///
    /// Fails for NaN and infinities, which JSON cannot represent.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        match self {
            ParamValue::Integer(i) => Ok(serde_json::Value::from(*i)),
            ParamValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .ok_or_else(|| ParamPersistError::Serialization {
                    message: format!("non-finite number {} cannot be encoded", n),
                }),
            ParamValue::String(s) => Ok(serde_json::Value::String(s.clone())),
            ParamValue::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

/// Rust types that can back a declared parameter field
///
/// Assignment is strict except that an integer widens into a number field.
pub trait ScalarParam: Sized + Clone + Into<ParamValue> {
    const KIND: ParamType;

    fn from_param_value(value: ParamValue, field: &str) -> Result<Self>;
}

fn mismatch(field: &str, expected: ParamType, found: &ParamValue) -> ParamPersistError {
    ParamPersistError::TypeMismatch {
        field: field.to_string(),
        expected: expected.tag().to_string(),
        found: found.kind().tag().to_string(),
    }
}

impl ScalarParam for i64 {
    const KIND: ParamType = ParamType::Integer;

    fn from_param_value(value: ParamValue, field: &str) -> Result<Self> {
        match value {
            ParamValue::Integer(i) => Ok(i),
            other => Err(mismatch(field, Self::KIND, &other)),
        }
    }
}

impl ScalarParam for f64 {
    const KIND: ParamType = ParamType::Number;

    fn from_param_value(value: ParamValue, field: &str) -> Result<Self> {
        match value {
            ParamValue::Number(n) => Ok(n),
            ParamValue::Integer(i) => Ok(i as f64),
            other => Err(mismatch(field, Self::KIND, &other)),
        }
    }
}

impl ScalarParam for String {
    const KIND: ParamType = ParamType::String;

    fn from_param_value(value: ParamValue, field: &str) -> Result<Self> {
        match value {
            ParamValue::String(s) => Ok(s),
            other => Err(mismatch(field, Self::KIND, &other)),
        }
    }
}

impl ScalarParam for bool {
    const KIND: ParamType = ParamType::Boolean;

    fn from_param_value(value: ParamValue, field: &str) -> Result<Self> {
        match value {
            ParamValue::Boolean(b) => Ok(b),
            other => Err(mismatch(field, Self::KIND, &other)),
        }
    }
}
