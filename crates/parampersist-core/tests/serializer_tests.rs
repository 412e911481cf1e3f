// Integration tests for the serializer
// Covers the canonical-form round trip and tolerant deserialization

use parampersist_core::errors::ParamPersistError;
use parampersist_core::model::{ParamValue, Parameterized, ParameterizedClass};
use parampersist_core::{parameterized, ClassRegistry, Serializer};
use proptest::prelude::*;
use serde_json::json;

parameterized! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct SerializerTestParam {
        pub number_field: Number = 0.5,
        pub integer_field: Integer = 1,
        pub string_field: String = "My String",
        pub bool_field: Boolean = false,
    }
}

fn setup_registry() -> ClassRegistry {
    let registry = ClassRegistry::new();
    registry.register::<SerializerTestParam>();
    registry
}

#[test]
fn test_to_dict_shape() {
    // Given: An object with non-default values
    let registry = setup_registry();
    let object = SerializerTestParam {
        number_field: 1.7,
        integer_field: 9,
        string_field: "Testing Strings".to_string(),
        bool_field: true,
    };

    // When: We encode it
    let form = Serializer::new(&registry).to_dict(&object).unwrap();

    // Then: The class path and all four triples are present in field order
    assert_eq!(form.class_path, "serializer_tests.SerializerTestParam");
    assert_eq!(
        form.to_value().unwrap(),
        json!({
            "class_path": "serializer_tests.SerializerTestParam",
            "params": [
                {"name": "number_field", "value": 1.7, "type": "float"},
                {"name": "integer_field", "value": 9, "type": "int"},
                {"name": "string_field", "value": "Testing Strings", "type": "str"},
                {"name": "bool_field", "value": true, "type": "bool"}
            ]
        })
    );
}

#[test]
fn test_to_json_is_deterministic() {
    let registry = setup_registry();
    let serializer = Serializer::new(&registry);
    let object = SerializerTestParam::default();

    assert_eq!(
        serializer.to_json(&object).unwrap(),
        serializer.to_json(&object).unwrap()
    );
}

#[test]
fn test_json_round_trip() {
    let registry = setup_registry();
    let serializer = Serializer::new(&registry);
    let object = SerializerTestParam {
        number_field: -3.25,
        integer_field: -7,
        string_field: "quoted \"text\"".to_string(),
        bool_field: true,
    };

    let json = serializer.to_json(&object).unwrap();
    let restored = serializer.from_json(&json).unwrap();

    assert_eq!(restored.class_path(), object.class_path());
    assert_eq!(
        restored.downcast_ref::<SerializerTestParam>(),
        Some(&object)
    );
}

#[test]
fn test_from_dict_missing_stored_fields_keep_defaults() {
    // Given: A dictionary carrying only two of the four fields
    let registry = setup_registry();
    let dict = json!({
        "class_path": SerializerTestParam::qualified_name(),
        "params": [
            {"name": "number_field", "value": 1.7, "type": "float"},
            {"name": "bool_field", "value": true, "type": "bool"}
        ]
    });

    // When: We deserialize it
    let object = Serializer::new(&registry).from_dict(&dict).unwrap();
    let object = object.into_concrete::<SerializerTestParam>().unwrap();

    // Then: Stored values are applied and the rest are defaults
    assert_eq!(object.number_field, 1.7);
    assert!(object.bool_field);
    assert_eq!(object.integer_field, 1);
    assert_eq!(object.string_field, "My String");
}

#[test]
fn test_from_dict_extra_fields_are_ignored() {
    let registry = setup_registry();
    let dict = json!({
        "class_path": SerializerTestParam::qualified_name(),
        "params": [
            {"name": "integer_field", "value": 9, "type": "int"},
            {"name": "garbage_field_1", "value": "Garbage", "type": "str"},
            {"name": "garbage_field_2", "value": [1, 2], "type": "tuple"}
        ]
    });

    let object = Serializer::new(&registry).from_dict(&dict).unwrap();

    assert_eq!(object.get_param("integer_field"), Some(ParamValue::Integer(9)));
    assert!(object.get_param("garbage_field_1").is_none());
    assert_eq!(object.fields().len(), 4);
}

#[test]
fn test_from_dict_unknown_tag_on_declared_field_fails() {
    let registry = setup_registry();
    let dict = json!({
        "class_path": SerializerTestParam::qualified_name(),
        "params": [{"name": "integer_field", "value": 9, "type": "decimal"}]
    });

    let err = Serializer::new(&registry).from_dict(&dict).unwrap_err();

    assert_eq!(
        err,
        ParamPersistError::UnknownTypeTag {
            tag: "decimal".to_string()
        }
    );
}

#[test]
fn test_from_dict_unresolvable_class() {
    let registry = setup_registry();
    let dict = json!({
        "class_path": "this.is.not.a.valid.module.InvalidParamClass",
        "params": [{"name": "integer_field", "value": 9, "type": "int"}]
    });

    let err = Serializer::new(&registry).from_dict(&dict).unwrap_err();

    assert!(err.to_string().contains(
        "Given path is \"this.is.not.a.valid.module.InvalidParamClass\""
    ));
}

#[test]
fn test_from_dict_missing_keys() {
    let registry = setup_registry();
    let serializer = Serializer::new(&registry);

    let err = serializer.from_dict(&json!({})).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Param not configured correctly. Missing \"class_path\" definition."
    );

    let err = serializer
        .from_dict(&json!({"class_path": SerializerTestParam::qualified_name()}))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Param not configured correctly. Missing \"params\" definition."
    );
}

#[test]
fn test_from_json_rejects_invalid_json() {
    let registry = setup_registry();
    let err = Serializer::new(&registry).from_json("{not json").unwrap_err();
    assert!(matches!(err, ParamPersistError::Serialization { .. }));
}

#[test]
fn test_default_serializer_uses_global_registry() {
    ClassRegistry::global().register::<SerializerTestParam>();
    let serializer = Serializer::default();

    let json = serializer.to_json(&SerializerTestParam::default()).unwrap();
    let restored = serializer.from_json(&json).unwrap();

    assert!(restored.is::<SerializerTestParam>());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_dict_round_trip_preserves_fields(
        number in -1.0e12f64..1.0e12,
        integer in any::<i64>(),
        text in ".*",
        flag in any::<bool>(),
    ) {
        let registry = setup_registry();
        let serializer = Serializer::new(&registry);
        let object = SerializerTestParam {
            number_field: number,
            integer_field: integer,
            string_field: text,
            bool_field: flag,
        };

        let dict = serializer.to_dict(&object).unwrap().to_value().unwrap();
        let restored = serializer.from_dict(&dict).unwrap();

        prop_assert_eq!(restored.downcast_ref::<SerializerTestParam>(), Some(&object));
    }
}
