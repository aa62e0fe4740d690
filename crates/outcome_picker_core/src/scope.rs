//! Scope resolution.
//!
//! # Responsibility
//! - Map a scope key to its configuration and target context.
//! - Report which picker scope is currently open.
//!
//! # Invariants
//! - A scope without configuration, or with a blank context, resolves to
//!   `None`; selectors treat that as empty data, never as failure.

use crate::store::{ContextOutcomes, OutcomeStore, ScopeConfig};

/// Returns the configuration stored for `scope`.
pub fn scope_config<'a>(state: &'a OutcomeStore, scope: &str) -> Option<&'a ScopeConfig> {
    state.scope_config(scope)
}

/// Returns the context id `scope` currently targets.
pub fn context_id<'a>(state: &'a OutcomeStore, scope: &str) -> Option<&'a str> {
    scope_config(state, scope)
        .map(|config| config.context_uuid.trim())
        .filter(|value| !value.is_empty())
}

/// Returns the active picker scope, or `""` when none is open.
pub fn get_scope(state: &OutcomeStore) -> &str {
    state.active_picker()
}

/// Returns whether `candidate` is the active picker scope.
pub fn is_open(state: &OutcomeStore, candidate: &str) -> bool {
    get_scope(state) == candidate
}

pub(crate) fn scope_outcomes<'a>(
    state: &'a OutcomeStore,
    scope: &str,
) -> Option<&'a ContextOutcomes> {
    context_id(state, scope).and_then(|context| state.context_outcomes(context))
}
