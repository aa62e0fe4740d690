//! Group/outcome count summaries.

use crate::model::outcome::Outcome;
use crate::scope::scope_outcomes;
use crate::store::{ContextOutcomes, OutcomeStore};

/// Formats child counts, e.g. `"2 Groups | 3 Outcomes"`.
///
/// Returns an empty string when both counts are zero.
pub fn get_descriptor(group_count: usize, outcome_count: usize) -> String {
    let groups = (group_count > 0).then(|| pluralize(group_count, "Group", "Groups"));
    let outcomes = (outcome_count > 0).then(|| pluralize(outcome_count, "Outcome", "Outcomes"));
    match (groups, outcomes) {
        (Some(groups), Some(outcomes)) => format!("{groups} | {outcomes}"),
        (Some(clause), None) | (None, Some(clause)) => clause,
        (None, None) => String::new(),
    }
}

/// Summarizes the direct children of `id`.
///
/// Unloaded children are not counted; an unknown `id` yields `""`.
pub fn get_outcome_summary(state: &OutcomeStore, scope: &str, id: &str) -> String {
    let Some(outcomes) = scope_outcomes(state, scope) else {
        return String::new();
    };
    match outcomes.get(id) {
        Some(record) => {
            let (groups, leaves) = count_children(outcomes, record);
            get_descriptor(groups, leaves)
        }
        None => String::new(),
    }
}

/// Partitions loaded direct children into `(groups, leaves)`.
pub(crate) fn count_children(outcomes: &ContextOutcomes, record: &Outcome) -> (usize, usize) {
    record
        .child_ids
        .iter()
        .filter_map(|child| outcomes.get(child))
        .fold((0, 0), |(groups, leaves), child| {
            if child.is_group() {
                (groups + 1, leaves)
            } else {
                (groups, leaves + 1)
            }
        })
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
