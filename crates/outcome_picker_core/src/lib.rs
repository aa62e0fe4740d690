//! Derived-state core for the outcome picker.
//! Turns a flat, partially loaded outcome map into a cached collection tree
//! and decides which fetches are still required.

pub mod collections;
pub mod loader;
pub mod logging;
pub mod model;
pub mod scope;
pub mod selectors;
pub mod snapshot;
pub mod store;
pub mod summary;

pub use collections::{build_collection_data, display_order, CollectionCache, DisplayRow};
pub use loader::{audit_context, get_children_to_load, Inconsistency};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{Collection, CollectionMap};
pub use model::outcome::{Outcome, OutcomeId, OutcomeStatus};
pub use scope::{context_id, get_scope, is_open, scope_config};
pub use selectors::{
    get_all_outcome_ids, get_outcome, get_root_outcome_ids, is_outcome_group, outcome_status,
};
pub use snapshot::{load_snapshot, parse_snapshot, SnapshotError, SnapshotResult};
pub use store::{ContextId, ContextOutcomes, OutcomeStore, ScopeConfig, ScopeKey};
pub use summary::{get_descriptor, get_outcome_summary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
