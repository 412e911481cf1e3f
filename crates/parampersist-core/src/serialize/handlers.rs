//! Decoders for stored scalar values, one per [`ParamType`]
//!
//! Decoding is coercive: each decoder converts any compatible JSON scalar to
//! its kind. `null`, arrays and objects never decode.

use crate::errors::{ParamPersistError, Result};
use crate::model::{ParamType, ParamValue};
use serde_json::Value;

/// Decode a stored value with the decoder selected by `tag`
///
/// # Errors
///
/// `UnknownTypeTag` if the tag is not recognised, `InvalidValue` if the
/// value cannot be converted.
pub fn decode(tag: &str, value: &Value) -> Result<ParamValue> {
    let kind = ParamType::from_tag(tag)?;
    let decoded = match kind {
        ParamType::Integer => decode_integer(value).map(ParamValue::Integer),
        ParamType::Number => decode_number(value).map(ParamValue::Number),
        ParamType::String => decode_string(value).map(ParamValue::String),
        ParamType::Boolean => decode_boolean(value).map(ParamValue::Boolean),
    };
    decoded.ok_or_else(|| ParamPersistError::InvalidValue {
        tag: tag.to_string(),
        value: value.to_string(),
    })
}

fn decode_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn decode_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn decode_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => Some(!s.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_kinds() {
        assert_eq!(decode("int", &json!(9)).unwrap(), ParamValue::Integer(9));
        assert_eq!(decode("float", &json!(1.7)).unwrap(), ParamValue::Number(1.7));
        assert_eq!(
            decode("str", &json!("Testing Strings")).unwrap(),
            ParamValue::from("Testing Strings")
        );
        assert_eq!(decode("bool", &json!(true)).unwrap(), ParamValue::Boolean(true));
    }

    #[test]
    fn test_integer_coercions() {
        assert_eq!(decode("int", &json!(9.7)).unwrap(), ParamValue::Integer(9));
        assert_eq!(decode("int", &json!(" 42 ")).unwrap(), ParamValue::Integer(42));
        assert_eq!(decode("int", &json!(true)).unwrap(), ParamValue::Integer(1));
        assert!(decode("int", &json!("4.2")).is_err());
        assert!(decode("int", &json!(1e300)).is_err());
    }

    #[test]
    fn test_number_accepts_integers() {
        assert_eq!(decode("number", &json!(9)).unwrap(), ParamValue::Number(9.0));
        assert_eq!(decode("float", &json!("0.25")).unwrap(), ParamValue::Number(0.25));
    }

    #[test]
    fn test_string_renders_scalars() {
        assert_eq!(decode("string", &json!(1.7)).unwrap(), ParamValue::from("1.7"));
        assert_eq!(decode("str", &json!(false)).unwrap(), ParamValue::from("false"));
    }

    #[test]
    fn test_boolean_truthiness() {
        assert_eq!(decode("boolean", &json!(0)).unwrap(), ParamValue::Boolean(false));
        assert_eq!(decode("bool", &json!(3)).unwrap(), ParamValue::Boolean(true));
        assert_eq!(decode("bool", &json!("")).unwrap(), ParamValue::Boolean(false));
        assert_eq!(decode("bool", &json!("no")).unwrap(), ParamValue::Boolean(true));
    }

    #[test]
    fn test_null_and_composites_are_rejected() {
        for tag in ["int", "float", "str", "bool"] {
            assert!(matches!(
                decode(tag, &Value::Null),
                Err(ParamPersistError::InvalidValue { .. })
            ));
            assert!(decode(tag, &json!([1])).is_err());
            assert!(decode(tag, &json!({"a": 1})).is_err());
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            decode("list", &json!([])).unwrap_err(),
            ParamPersistError::UnknownTypeTag {
                tag: "list".to_string()
            }
        );
        assert_eq!(
            decode("integer", &json!(9)).unwrap_err(),
            ParamPersistError::UnknownTypeTag {
                tag: "integer".to_string()
            }
        );
    }
}
