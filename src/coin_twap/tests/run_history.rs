use std::fs;

use chrono::{Duration, Utc};
use coin_twap::history::{HistoryError, RunHistoryStore};
use coin_twap::report::ReportError;

mod common;

#[test]
fn load_without_file_is_empty() {
    let ws = common::Workspace::empty();
    let history = ws.store().load().expect("load");
    assert!(history.is_empty());
    assert!(!ws.history.exists(), "load must not create the file");
}

#[test]
fn append_then_load_returns_the_new_record() {
    let ws = common::Workspace::with_template();
    let store = ws.store();

    let before = Utc::now();
    let record = store.append("first", "TWAP for bitcoin in usd over 7 days: 1.5").unwrap();
    let after = Utc::now();

    let history = store.load().unwrap();
    assert_eq!(history.len(), 1);
    let last = history.last().unwrap();
    assert_eq!(last, &record);
    assert_eq!(last.description(), "first");
    assert_eq!(last.output(), "TWAP for bitcoin in usd over 7 days: 1.5");
    // Persisted with microsecond precision; allow for the truncation.
    assert!(last.timestamp() >= before - Duration::microseconds(1));
    assert!(last.timestamp() <= after);
}

#[test]
fn appends_accumulate_in_call_order() {
    let ws = common::Workspace::with_template();
    let store = ws.store();

    for i in 0..5 {
        store.append(&format!("run {i}"), &format!("out {i}")).unwrap();
    }

    let history = store.load().unwrap();
    assert_eq!(history.len(), 5);
    let descriptions: Vec<&str> = history.iter().map(|r| r.description()).collect();
    assert_eq!(descriptions, ["run 0", "run 1", "run 2", "run 3", "run 4"]);
    assert!(
        history
            .records()
            .windows(2)
            .all(|w| w[0].timestamp() <= w[1].timestamp())
    );
}

#[test]
fn persisted_file_is_a_plain_array_of_three_field_objects() {
    let ws = common::Workspace::with_template();
    ws.store().append("d", "o").unwrap();

    let json = ws.read_history_json();
    let arr = json.as_array().expect("array");
    assert_eq!(arr.len(), 1);
    let obj = arr[0].as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["description", "output", "timestamp"]);
    assert!(obj["timestamp"].as_str().unwrap().ends_with("+00:00"));

    // Human-inspectable: indented, one field per line.
    let text = fs::read_to_string(&ws.history).unwrap();
    assert!(text.contains("\n    \"description\": \"d\""));
}

#[test]
fn corrupt_history_is_an_error_and_is_left_intact() {
    let ws = common::Workspace::with_template();
    fs::write(&ws.history, "{ not json").unwrap();
    let store = ws.store();

    let err = store.load().unwrap_err();
    assert!(matches!(err, HistoryError::Corrupt { .. }));
    assert!(err.to_string().contains("runs.json"));

    let err = store.append("d", "o").unwrap_err();
    assert!(matches!(err, HistoryError::Corrupt { .. }));
    assert_eq!(fs::read_to_string(&ws.history).unwrap(), "{ not json");
    assert!(!ws.report.exists());
}

#[test]
fn empty_history_file_is_corrupt() {
    let ws = common::Workspace::with_template();
    fs::write(&ws.history, "").unwrap();
    assert!(matches!(
        ws.store().load().unwrap_err(),
        HistoryError::Corrupt { .. }
    ));
}

#[test]
fn missing_template_fails_before_any_history_work() {
    let ws = common::Workspace::empty();
    let err = ws.store().append("d", "o").unwrap_err();

    match &err {
        HistoryError::Report(ReportError::MissingTemplate { path }) => {
            assert_eq!(path, &ws.template);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("README.template.md"));
    assert!(!ws.history.exists(), "history must not be written");
    assert!(!ws.report.exists(), "report must not be written");
}

#[test]
fn append_regenerates_the_report_and_keeps_the_template() {
    let ws = common::Workspace::with_template();
    let store = ws.store();

    store.append("first | run", "out 1").unwrap();
    let report = ws.read_report();
    assert_eq!(common::table_rows(&report).len(), 1);

    store.append("second", "a|b").unwrap();
    let report = ws.read_report();
    let rows = common::table_rows(&report);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with(r"| first \| run | "));
    assert!(rows[1].ends_with(r" | a\|b |"));

    assert!(report.starts_with("# Crypto TWAP\n\nSome intro.\n\n## Past Runs\n"));
    assert!(report.ends_with("\n\n_generated_\n"));
    assert_eq!(fs::read_to_string(&ws.template).unwrap(), common::TEMPLATE);
}

#[test]
fn history_written_by_hand_with_offsets_renders_in_utc() {
    let ws = common::Workspace::with_template();
    fs::write(
        &ws.history,
        r#"[{"description":"old","timestamp":"2024-05-01T20:15:30.5-04:00","output":"x"}]"#,
    )
    .unwrap();

    ws.store().append("new", "y").unwrap();
    let report = ws.read_report();
    let rows = common::table_rows(&report);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], "| old | 2024-05-02 00:15:30 | x |");
    assert!(rows[1].starts_with("| new | "));
}

#[cfg(unix)]
#[test]
fn append_keeps_the_modes_of_existing_files() {
    use std::os::unix::fs::PermissionsExt;

    let ws = common::Workspace::with_template();
    let mode = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    let store = ws.store();

    store.append("first", "out").unwrap();
    assert_eq!(mode(ws.history.as_path()), 0o644);
    assert_eq!(mode(ws.report.as_path()), 0o644);

    fs::set_permissions(&ws.report, fs::Permissions::from_mode(0o664)).unwrap();
    fs::set_permissions(&ws.history, fs::Permissions::from_mode(0o640)).unwrap();
    store.append("second", "out").unwrap();

    assert_eq!(mode(ws.report.as_path()), 0o664);
    assert_eq!(mode(ws.history.as_path()), 0o640);
    assert_eq!(store.load().unwrap().len(), 2);
}
