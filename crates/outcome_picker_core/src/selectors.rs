//! Basic accessors over a scope's outcome mapping.
//!
//! All accessors return empty values for missing scopes, contexts, maps and
//! ids. None of them fail.

use crate::model::outcome::{Outcome, OutcomeId, OutcomeStatus};
use crate::scope::{context_id, scope_outcomes};
use crate::store::OutcomeStore;

/// Returns the record for `id`, if loaded.
pub fn get_outcome<'a>(state: &'a OutcomeStore, scope: &str, id: &str) -> Option<&'a Outcome> {
    scope_outcomes(state, scope)?.get(id)
}

/// Returns every loaded id in insertion order.
pub fn get_all_outcome_ids(state: &OutcomeStore, scope: &str) -> Vec<OutcomeId> {
    scope_outcomes(state, scope)
        .map(|outcomes| outcomes.ids().to_vec())
        .unwrap_or_default()
}

/// Returns the context's top-level ids.
pub fn get_root_outcome_ids(state: &OutcomeStore, scope: &str) -> Vec<OutcomeId> {
    context_id(state, scope)
        .and_then(|context| state.root_outcome_ids(context))
        .map(<[OutcomeId]>::to_vec)
        .unwrap_or_default()
}

/// Returns the three-valued load state of `id`.
pub fn outcome_status(state: &OutcomeStore, scope: &str, id: &str) -> OutcomeStatus {
    OutcomeStatus::of(get_outcome(state, scope, id))
}

/// Returns whether `id` should be rendered as an expandable group.
///
/// A loaded record follows the group invariant. An unloaded id counts as a
/// tentative group when a loaded group lists it as a child.
pub fn is_outcome_group(state: &OutcomeStore, scope: &str, id: &str) -> bool {
    let Some(outcomes) = scope_outcomes(state, scope) else {
        return false;
    };
    match outcomes.get(id) {
        Some(record) => record.is_group(),
        None => outcomes.is_listed_by_group(id),
    }
}
