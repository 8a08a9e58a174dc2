#![allow(clippy::unwrap_used, clippy::expect_used)]

use tabula_core::errors::TabulaError;
use tabula_core::logging_facility::test_capture::init_test_capture;
use tabula_core::{log_op_end, log_op_error, log_op_start};
use tabula_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, table = "words");

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(capture.events_for(op_name, "words").len(), 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .expect("Should have end event");

    assert_eq!(end_event.fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = TabulaError::CyclicSchema {
        tables: vec!["a".to_string(), "b".to_string()],
    };
    log_op_error!(op_name, err, duration_ms = 5, table = "a");

    capture.assert_event_exists(op_name, EVENT_END_ERROR);

    let events = capture.events_for(op_name, "a");
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        events[0].fields.get("err.code"),
        Some(&"ERR_CYCLIC_SCHEMA".to_string())
    );
}

#[test]
fn test_start_and_end_pair() {
    let capture = init_test_capture();
    let op_name = "test_start_end_pair_unique_4";

    log_op_start!(op_name, table = "questions");
    log_op_end!(op_name, duration_ms = 1, table = "questions", rows = 3_u64);

    let events = capture.events_for(op_name, "questions");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].fields.get("rows"), Some(&"3".to_string()));
}
