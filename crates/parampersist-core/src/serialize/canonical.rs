//! Canonical form types

use crate::errors::Result;
use crate::model::ParamValue;
use crate::serialize::handlers;
use serde::{Deserialize, Serialize};

/// One encoded field: `{"name": ..., "value": ..., "type": ...}`
///
/// This is also the exact text stored in a param row's `value` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamTriple {
    pub name: String,
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub type_tag: String,
}

impl ParamTriple {
    /// Encode a field value, tagging it with its runtime kind
    pub fn new(name: impl Into<String>, value: &ParamValue) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            value: value.to_json()?,
            type_tag: value.kind().tag().to_string(),
        })
    }

    /// Decode the value using the decoder selected by the type tag
    pub fn decode(&self) -> Result<ParamValue> {
        handlers::decode(&self.type_tag, &self.value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `{class_path, params}` representation of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalForm {
    pub class_path: String,
    pub params: Vec<ParamTriple>,
}

impl CanonicalForm {
    /// Find a triple by field name
    pub fn param(&self, name: &str) -> Option<&ParamTriple> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Dictionary view of the form
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_encoding_shape() {
        let triple = ParamTriple::new("string_field", &ParamValue::from("Test String")).unwrap();
        assert_eq!(
            triple.to_json().unwrap(),
            r#"{"name":"string_field","value":"Test String","type":"str"}"#
        );
    }

    #[test]
    fn test_triple_parses_stored_row_text() {
        let triple =
            ParamTriple::from_json(r#"{"name": "number_field", "type": "param.Number", "value": 1.7}"#)
                .unwrap();
        assert_eq!(triple.name, "number_field");
        assert_eq!(triple.decode().unwrap(), ParamValue::Number(1.7));
    }

    #[test]
    fn test_form_lookup() {
        let form = CanonicalForm {
            class_path: "a.B".to_string(),
            params: vec![ParamTriple::new("x", &ParamValue::Integer(1)).unwrap()],
        };
        assert_eq!(form.param("x").unwrap().type_tag, "int");
        assert!(form.param("y").is_none());
        assert_eq!(form.to_value().unwrap()["class_path"], "a.B");
    }
}
