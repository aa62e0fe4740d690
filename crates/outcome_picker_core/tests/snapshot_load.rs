use outcome_picker_core::{
    audit_context, get_all_outcome_ids, get_outcome, get_root_outcome_ids, get_scope,
    load_snapshot, parse_snapshot, Inconsistency, SnapshotError,
};
use std::io::Write;

const SNAPSHOT: &str = r#"{
    "activePicker": "alignments",
    "alignments": { "config": { "contextUuid": "course_7" } },
    "unconfigured": {},
    "context": {
        "outcomes": {
            "course_7": {
                "30": { "id": 30, "title": "Writing", "child_ids": [12, "4"] },
                "12": { "id": "12", "title": "Grammar", "has_children": true, "is_partial": true },
                "4": { "id": 4, "title": "Spelling", "description": "Spells words" }
            },
            "course_8": null
        },
        "rootOutcomeIds": { "course_7": [30], "course_8": null }
    }
}"#;

#[test]
fn parse_snapshot_keeps_document_order_and_normalizes_ids() {
    let state = parse_snapshot(SNAPSHOT).unwrap();

    assert_eq!(get_scope(&state), "alignments");
    assert_eq!(get_all_outcome_ids(&state, "alignments"), vec!["30", "12", "4"]);
    assert_eq!(get_root_outcome_ids(&state, "alignments"), vec!["30"]);

    let writing = get_outcome(&state, "alignments", "30").unwrap();
    assert_eq!(writing.child_ids, vec!["12", "4"]);
    let spelling = get_outcome(&state, "alignments", "4").unwrap();
    assert_eq!(spelling.description.as_deref(), Some("Spells words"));

    assert!(state.scope_config("unconfigured").is_some());
    assert!(get_all_outcome_ids(&state, "unconfigured").is_empty());
    assert!(state.context_outcomes("course_8").is_none());
}

#[test]
fn parse_snapshot_accepts_empty_document() {
    let state = parse_snapshot("{}").unwrap();
    assert_eq!(get_scope(&state), "");
    assert_eq!(state.scope_keys().count(), 0);
}

#[test]
fn parse_snapshot_rejects_mismatched_outcome_key() {
    let err = parse_snapshot(
        r#"{ "context": { "outcomes": { "course_1": { "1": { "id": 2 } } } } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
    assert!(err.to_string().contains("does not match"), "unexpected error: {err}");
}

#[test]
fn parse_snapshot_rejects_non_object_scope_entry() {
    let err = parse_snapshot(
        r#"{
            "activePicker": "s",
            "searchText": "",
            "s": { "config": { "contextUuid": "c" } },
            "context": {}
        }"#,
    )
    .unwrap_err();

    match &err {
        SnapshotError::InvalidShape { key, reason } => {
            assert_eq!(key, "searchText");
            assert!(reason.contains("found a string"), "unexpected reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("`searchText`"));
}

#[test]
fn parse_snapshot_rejects_malformed_scope_config() {
    let err = parse_snapshot(r#"{ "s": { "config": { "contextUuid": 7 } } }"#).unwrap_err();
    assert!(
        matches!(&err, SnapshotError::InvalidShape { key, .. } if key == "s"),
        "unexpected error: {err}"
    );
}

#[test]
fn load_snapshot_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();

    let state = load_snapshot(file.path()).unwrap();
    assert_eq!(get_all_outcome_ids(&state, "alignments").len(), 3);
    assert!(audit_context(&state, "alignments").is_empty());
}

#[test]
fn load_snapshot_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let err = load_snapshot(&missing).unwrap_err();
    match err {
        SnapshotError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn audit_flags_complete_group_with_unloaded_child() {
    let state = parse_snapshot(
        r#"{
            "s": { "config": { "contextUuid": "c" } },
            "context": { "outcomes": { "c": { "1": { "id": 1, "child_ids": ["2"] } } } }
        }"#,
    )
    .unwrap();

    assert_eq!(
        audit_context(&state, "s"),
        vec![Inconsistency::MissingChild {
            parent: "1".to_string(),
            child: "2".to_string(),
        }]
    );
}
