//! Partial-load resolution.
//!
//! # Responsibility
//! - Decide which ids the fetch collaborator must request before a group
//!   can be expanded.
//! - Detect and log inconsistent data written by the fetch collaborator.
//!
//! # Invariants
//! - Resolution never mutates state.
//! - A partial record is re-requested as a whole, even when only some of
//!   its children are missing.
//! - Inconsistencies are logged, never returned as errors.

use crate::model::outcome::{OutcomeId, OutcomeStatus};
use crate::scope::{context_id, scope_outcomes};
use crate::store::OutcomeStore;
use log::warn;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Returns the ids to fetch before `id` can be expanded.
///
/// 1. `id` not loaded: `[id]`.
/// 2. `id` loaded but partial: `[id]`.
/// 3. `id` is a leaf: `[]`.
/// 4. Otherwise: children that are not loaded, or are partial groups.
pub fn get_children_to_load(state: &OutcomeStore, scope: &str, id: &str) -> Vec<OutcomeId> {
    let outcomes = scope_outcomes(state, scope);
    let record = outcomes.and_then(|outcomes| outcomes.get(id));

    match OutcomeStatus::of(record) {
        OutcomeStatus::NotLoaded
        | OutcomeStatus::Leaf { partial: true }
        | OutcomeStatus::Group { partial: true } => vec![id.to_string()],
        OutcomeStatus::Leaf { partial: false } => Vec::new(),
        OutcomeStatus::Group { partial: false } => {
            let (Some(outcomes), Some(record)) = (outcomes, record) else {
                return Vec::new();
            };
            record
                .child_ids
                .iter()
                .filter(|child| match OutcomeStatus::of(outcomes.get(child.as_str())) {
                    OutcomeStatus::NotLoaded => true,
                    OutcomeStatus::Group { partial } => partial,
                    OutcomeStatus::Leaf { .. } => false,
                })
                .cloned()
                .collect()
        }
    }
}

/// Data written by the fetch collaborator that contradicts the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// A child id is empty or whitespace.
    BlankChildId { parent: OutcomeId },
    /// A group lists itself as a child.
    SelfReference { id: OutcomeId },
    /// A group lists the same child more than once.
    DuplicateChild { parent: OutcomeId, child: OutcomeId },
    /// A group not marked partial references an unloaded child.
    MissingChild { parent: OutcomeId, child: OutcomeId },
}

impl Display for Inconsistency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankChildId { parent } => write!(f, "blank child id under {parent}"),
            Self::SelfReference { id } => write!(f, "outcome {id} lists itself as a child"),
            Self::DuplicateChild { parent, child } => {
                write!(f, "child {child} listed more than once under {parent}")
            }
            Self::MissingChild { parent, child } => {
                write!(f, "complete group {parent} references unloaded child {child}")
            }
        }
    }
}

/// Checks every loaded group of the scope's context.
///
/// Each finding is also logged at `warn` level.
pub fn audit_context(state: &OutcomeStore, scope: &str) -> Vec<Inconsistency> {
    let Some(outcomes) = scope_outcomes(state, scope) else {
        return Vec::new();
    };
    let context = context_id(state, scope).unwrap_or("-");

    let mut findings = Vec::new();
    for record in outcomes.iter().filter(|record| record.is_group()) {
        let mut seen = HashSet::new();
        for child in &record.child_ids {
            let finding = if child.trim().is_empty() {
                Some(Inconsistency::BlankChildId {
                    parent: record.id.clone(),
                })
            } else if *child == record.id {
                Some(Inconsistency::SelfReference {
                    id: record.id.clone(),
                })
            } else if !seen.insert(child.as_str()) {
                Some(Inconsistency::DuplicateChild {
                    parent: record.id.clone(),
                    child: child.clone(),
                })
            } else if !record.is_partial() && !outcomes.contains(child) {
                Some(Inconsistency::MissingChild {
                    parent: record.id.clone(),
                    child: child.clone(),
                })
            } else {
                None
            };

            if let Some(finding) = finding {
                warn!(
                    "event=outcome_inconsistent module=loader status=warn context={} detail={}",
                    context, finding
                );
                findings.push(finding);
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::{audit_context, Inconsistency};
    use crate::model::outcome::Outcome;
    use crate::store::{OutcomeStore, ScopeConfig};

    fn store_with(records: Vec<Outcome>) -> OutcomeStore {
        let mut store = OutcomeStore::new();
        store.set_scope_config("scope", ScopeConfig::for_context("course_1"));
        store.upsert_outcomes("course_1", records);
        store
    }

    #[test]
    fn audit_reports_contradicting_child_lists() {
        let store = store_with(vec![
            Outcome::new("1", "t1").with_child_ids(["2", "", "1", "2", "3"]),
            Outcome::new("2", "t2"),
        ]);

        assert_eq!(
            audit_context(&store, "scope"),
            vec![
                Inconsistency::BlankChildId {
                    parent: "1".to_string()
                },
                Inconsistency::SelfReference {
                    id: "1".to_string()
                },
                Inconsistency::DuplicateChild {
                    parent: "1".to_string(),
                    child: "2".to_string()
                },
                Inconsistency::MissingChild {
                    parent: "1".to_string(),
                    child: "3".to_string()
                },
            ]
        );
    }

    #[test]
    fn audit_accepts_missing_children_of_partial_groups() {
        let store = store_with(vec![Outcome::new("1", "t1")
            .with_child_ids(["2", "3"])
            .with_partial(true)]);

        assert!(audit_context(&store, "scope").is_empty());
        assert!(audit_context(&store, "unknown_scope").is_empty());
    }
}
