//! Process-wide picker state.
//!
//! # Responsibility
//! - Hold flat outcome records and root id lists per context.
//! - Hold per-scope configuration and the active picker scope.
//! - Provide the write surface used by the fetch collaborator.
//!
//! # Invariants
//! - A missing context mapping or root list means "nothing loaded yet".
//! - Read paths never fail; write paths only replace or add whole records.

mod context_outcomes;

pub use context_outcomes::ContextOutcomes;

use crate::model::outcome::{Outcome, OutcomeId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identifier of a context (e.g. `course_100`).
pub type ContextId = String;

/// Opaque key of one picker instance.
pub type ScopeKey = String;

/// Per-scope configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConfig {
    /// Context this scope browses. Blank means "no context".
    #[serde(default)]
    pub context_uuid: String,
}

impl ScopeConfig {
    pub fn for_context(context_uuid: impl Into<String>) -> Self {
        Self {
            context_uuid: context_uuid.into(),
        }
    }
}

/// Snapshot of picker state read by every selector.
#[derive(Debug, Clone, Default)]
pub struct OutcomeStore {
    active_picker: String,
    scopes: BTreeMap<ScopeKey, ScopeConfig>,
    outcomes: HashMap<ContextId, ContextOutcomes>,
    root_outcome_ids: HashMap<ContextId, Vec<OutcomeId>>,
}

impl OutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active picker scope; empty when no picker is open.
    pub fn active_picker(&self) -> &str {
        &self.active_picker
    }

    pub fn set_active_picker(&mut self, scope: impl Into<ScopeKey>) {
        self.active_picker = scope.into();
    }

    pub fn close_picker(&mut self) {
        self.active_picker.clear();
    }

    pub fn scope_config(&self, scope: &str) -> Option<&ScopeConfig> {
        self.scopes.get(scope)
    }

    pub fn set_scope_config(&mut self, scope: impl Into<ScopeKey>, config: ScopeConfig) {
        self.scopes.insert(scope.into(), config);
    }

    pub fn remove_scope_config(&mut self, scope: &str) -> Option<ScopeConfig> {
        self.scopes.remove(scope)
    }

    /// Configured scope keys, sorted.
    pub fn scope_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.scopes.keys().map(String::as_str)
    }

    pub fn context_outcomes(&self, context_id: &str) -> Option<&ContextOutcomes> {
        self.outcomes.get(context_id)
    }

    pub fn root_outcome_ids(&self, context_id: &str) -> Option<&[OutcomeId]> {
        self.root_outcome_ids.get(context_id).map(Vec::as_slice)
    }

    /// Replaces the whole outcome mapping of one context.
    pub fn set_context_outcomes(
        &mut self,
        context_id: impl Into<ContextId>,
        outcomes: ContextOutcomes,
    ) {
        self.outcomes.insert(context_id.into(), outcomes);
    }

    /// Adds absent records and fully replaces existing ones.
    ///
    /// Returns how many records changed.
    pub fn upsert_outcomes(
        &mut self,
        context_id: &str,
        records: impl IntoIterator<Item = Outcome>,
    ) -> usize {
        let outcomes = self.outcomes.entry(context_id.to_string()).or_default();
        let changed = outcomes.upsert_all(records);
        debug!(
            "event=outcomes_upsert module=store context={} changed={} total={}",
            context_id,
            changed,
            outcomes.len()
        );
        changed
    }

    pub fn remove_outcome(&mut self, context_id: &str, id: &str) -> Option<Outcome> {
        let removed = self.outcomes.get_mut(context_id)?.remove(id);
        if removed.is_some() {
            debug!("event=outcome_remove module=store context={context_id} id={id}");
        }
        removed
    }

    /// Drops the outcome mapping of one context entirely.
    pub fn clear_outcomes(&mut self, context_id: &str) -> bool {
        self.outcomes.remove(context_id).is_some()
    }

    pub fn set_root_outcome_ids<I, S>(&mut self, context_id: impl Into<ContextId>, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<OutcomeId>,
    {
        self.root_outcome_ids
            .insert(context_id.into(), ids.into_iter().map(Into::into).collect());
    }

    pub fn clear_root_outcome_ids(&mut self, context_id: &str) -> bool {
        self.root_outcome_ids.remove(context_id).is_some()
    }
}
