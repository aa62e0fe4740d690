//! Derived collection node produced by the tree projector.

use crate::model::outcome::OutcomeId;
use crate::summary::get_descriptor;
use serde::Serialize;
use std::collections::BTreeMap;

/// Id-indexed collection tree. Child links are ids, not owned nodes.
pub type CollectionMap = BTreeMap<OutcomeId, Collection>;

/// Display node for one outcome group. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    /// Same id as the source group record.
    pub id: OutcomeId,
    /// Group title.
    pub name: String,
    /// Ordered child ids whose records are loaded groups.
    pub collections: Vec<OutcomeId>,
    /// Loaded direct children that are leaf outcomes.
    pub outcome_count: usize,
}

impl Collection {
    /// Loaded direct children that are groups.
    pub fn group_count(&self) -> usize {
        self.collections.len()
    }

    /// Row summary, e.g. `"1 Group | 2 Outcomes"`.
    pub fn descriptor(&self) -> String {
        get_descriptor(self.group_count(), self.outcome_count)
    }
}
