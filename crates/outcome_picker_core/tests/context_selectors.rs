use outcome_picker_core::{
    get_all_outcome_ids, get_descriptor, get_outcome, get_outcome_summary, get_root_outcome_ids,
    is_outcome_group, outcome_status, parse_snapshot, OutcomeStatus, OutcomeStore,
};

const SCOPE: &str = "scopeForTest";

fn setup() -> OutcomeStore {
    let json = serde_json::json!({
        "scopeForTest": { "config": { "contextUuid": "course_100" } },
        "context": {
            "outcomes": {
                "course_100": {
                    "1": { "id": 1, "label": "l1", "title": "t1", "child_ids": ["2", "3"] },
                    "2": { "id": 2, "label": "l2", "title": "t2", "child_ids": ["4"] },
                    "3": { "id": 3, "label": "l3", "title": "t3", "child_ids": [] },
                    "4": { "id": 4, "label": "l4", "title": "t4" }
                }
            },
            "rootOutcomeIds": { "course_100": [1] }
        }
    });
    parse_snapshot(&json.to_string()).unwrap()
}

#[test]
fn get_all_outcome_ids_returns_keys_in_order() {
    let state = setup();
    assert_eq!(get_all_outcome_ids(&state, SCOPE), vec!["1", "2", "3", "4"]);
}

#[test]
fn get_all_outcome_ids_is_empty_when_mapping_empty_or_unset() {
    let mut state = setup();
    for id in ["1", "2", "3", "4"] {
        state.remove_outcome("course_100", id);
    }
    assert!(get_all_outcome_ids(&state, SCOPE).is_empty());

    state.clear_outcomes("course_100");
    assert!(get_all_outcome_ids(&state, SCOPE).is_empty());
    assert!(get_all_outcome_ids(&state, "unknownScope").is_empty());
}

#[test]
fn get_outcome_returns_record_or_none() {
    let state = setup();
    let record = get_outcome(&state, SCOPE, "3").unwrap();
    assert_eq!(record.id, "3");
    assert_eq!(record.label, "l3");

    assert!(get_outcome(&state, SCOPE, "10").is_none());
    assert!(get_outcome(&state, "unknownScope", "3").is_none());
}

#[test]
fn get_root_outcome_ids_returns_roots_or_empty() {
    let mut state = setup();
    assert_eq!(get_root_outcome_ids(&state, SCOPE), vec!["1"]);

    state.clear_root_outcome_ids("course_100");
    assert!(get_root_outcome_ids(&state, SCOPE).is_empty());
}

#[test]
fn is_outcome_group_follows_group_invariant() {
    let mut state = setup();
    assert!(is_outcome_group(&state, SCOPE, "1"));
    assert!(is_outcome_group(&state, SCOPE, "2"));
    assert!(!is_outcome_group(&state, SCOPE, "3"));
    assert!(!is_outcome_group(&state, SCOPE, "4"));

    state.upsert_outcomes(
        "course_100",
        [outcome_picker_core::Outcome::new("5", "t5").with_has_children(true)],
    );
    assert!(is_outcome_group(&state, SCOPE, "5"));
}

#[test]
fn is_outcome_group_treats_listed_unloaded_child_as_group() {
    let mut state = setup();
    state.remove_outcome("course_100", "2");

    assert!(is_outcome_group(&state, SCOPE, "2"));
    assert!(!is_outcome_group(&state, SCOPE, "99"));
    assert_eq!(outcome_status(&state, SCOPE, "2"), OutcomeStatus::NotLoaded);
}

#[test]
fn is_outcome_group_drops_tentative_group_once_parent_stops_listing_it() {
    let mut state = setup();
    state.remove_outcome("course_100", "4");
    assert!(is_outcome_group(&state, SCOPE, "4"));

    state.remove_outcome("course_100", "2");
    assert!(!is_outcome_group(&state, SCOPE, "4"));
    assert!(is_outcome_group(&state, SCOPE, "2"));

    state.upsert_outcomes(
        "course_100",
        [outcome_picker_core::Outcome::new("1", "t1").with_child_ids(["3"])],
    );
    assert!(!is_outcome_group(&state, SCOPE, "2"));
}

#[test]
fn get_outcome_summary_counts_direct_children() {
    let state = setup();
    assert_eq!(get_outcome_summary(&state, SCOPE, "1"), "1 Group | 1 Outcome");
    assert_eq!(get_outcome_summary(&state, SCOPE, "2"), "1 Outcome");
    assert_eq!(get_outcome_summary(&state, SCOPE, "3"), "");
    assert_eq!(get_outcome_summary(&state, SCOPE, "10"), "");
}

#[test]
fn get_descriptor_formats_counts() {
    assert_eq!(get_descriptor(2, 3), "2 Groups | 3 Outcomes");
    assert_eq!(get_descriptor(1, 0), "1 Group");
    assert_eq!(get_descriptor(0, 1), "1 Outcome");
    assert_eq!(get_descriptor(0, 0), "");
}
