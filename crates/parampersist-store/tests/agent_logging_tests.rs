// Logging tests for the persistence agent
// Kept in their own binary because the capture subscriber is process-global

use parampersist_core::logging_facility::init_test_capture;
use parampersist_core::model::ParameterizedClass;
use parampersist_core::{parameterized, ClassRegistry};
use parampersist_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CLASS_PATH, FIELD_ERR_CODE, FIELD_INSTANCE_ID,
    FIELD_PARAM_COUNT, FIELD_PARAM_NAME, FIELD_REQUEST_ID,
};
use parampersist_store::{Database, PersistenceAgent, SqliteAgent};
use std::sync::Arc;
use tracing::Level;

parameterized! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct LoggedParam {
        pub integer_field: Integer = 1,
    }
}

parameterized! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct WiderLoggedParam {
        pub integer_field: Integer = 1,
        pub bool_field: Boolean = false,
    }
}

fn setup_agent(registry: &ClassRegistry) -> SqliteAgent<'_> {
    registry.register::<LoggedParam>();
    registry.register::<WiderLoggedParam>();
    let db = Arc::new(Database::open_in_memory().unwrap());
    SqliteAgent::with_registry(db, registry)
}

#[test]
fn test_operations_log_start_and_end() {
    let capture = init_test_capture();
    let registry = ClassRegistry::new();
    let agent = setup_agent(&registry);

    let id = agent.save(&LoggedParam::default()).unwrap();
    agent.load(&id).unwrap();

    capture.assert_event_exists("save", EVENT_START);
    capture.assert_event_exists("save", EVENT_END);
    capture.assert_event_exists("load", EVENT_START);

    let load_ends = capture.count_events(|e| {
        e.op.as_deref() == Some("load")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_INSTANCE_ID) == Some(id.as_str())
            && e.field(FIELD_REQUEST_ID).is_some()
    });
    assert_eq!(load_ends, 1);
}

#[test]
fn test_failed_operation_logs_error_code() {
    let capture = init_test_capture();
    let registry = ClassRegistry::new();
    let agent = setup_agent(&registry);

    assert!(agent.update(&LoggedParam::default(), "missing-for-update").is_err());

    let errors: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.field(FIELD_INSTANCE_ID) == Some("missing-for-update"))
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Level::ERROR);
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_delete_of_unknown_id_warns() {
    let capture = init_test_capture();
    let registry = ClassRegistry::new();
    let agent = setup_agent(&registry);

    agent.delete("missing-for-delete").unwrap();

    let warnings = capture.count_events(|e| {
        e.level == Level::WARN
            && e.field(FIELD_INSTANCE_ID) == Some("missing-for-delete")
            && e.message.as_deref() == Some("unable to find instance with given id")
    });
    assert_eq!(warnings, 1);
    capture.assert_event_exists("delete", EVENT_END);
}

#[test]
fn test_save_end_records_new_id() {
    let capture = init_test_capture();
    let registry = ClassRegistry::new();
    let agent = setup_agent(&registry);

    let id = agent.save(&WiderLoggedParam::default()).unwrap();

    let end = capture
        .events()
        .into_iter()
        .find(|e| {
            e.op.as_deref() == Some("save")
                && e.event.as_deref() == Some(EVENT_END)
                && e.field(FIELD_INSTANCE_ID) == Some(id.as_str())
        })
        .expect("Should have a save end event carrying the new id");
    assert_eq!(end.field(FIELD_PARAM_COUNT), Some("2"));

    let class_path = WiderLoggedParam::qualified_name();
    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("save")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field(FIELD_CLASS_PATH) == Some(class_path.as_str())
    });
    assert!(starts >= 1);
}

#[test]
fn test_update_warns_about_fields_without_rows() {
    let capture = init_test_capture();
    let registry = ClassRegistry::new();
    let agent = setup_agent(&registry);
    let id = agent.save(&LoggedParam::default()).unwrap();

    agent.update(&WiderLoggedParam::default(), &id).unwrap();

    let warnings = capture.count_events(|e| {
        e.level == Level::WARN
            && e.field(FIELD_INSTANCE_ID) == Some(id.as_str())
            && e.field(FIELD_PARAM_NAME) == Some("bool_field")
    });
    assert_eq!(warnings, 1);
}
