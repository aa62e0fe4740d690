//! Collection tree projection and its per-scope cache.
//!
//! # Responsibility
//! - Derive one `Collection` per group from a flat outcome mapping.
//! - Memoize the derived map per scope so unchanged state yields the same
//!   `Arc` and callers can skip work with `Arc::ptr_eq`.
//! - Reconstruct display order by following `collections` from root ids.
//!
//! # Invariants
//! - The projection is a single pass over the flat mapping, not a
//!   recursive walk.
//! - Unloaded child ids are never listed in `collections`.
//! - The cache holds at most one entry per scope, keyed by
//!   `(context id, generation)`. Any mismatch rebuilds from scratch.
//! - Every rebuild first evicts entries of scopes with no configuration.

use crate::model::collection::{Collection, CollectionMap};
use crate::model::outcome::OutcomeId;
use crate::scope::context_id;
use crate::store::{ContextId, ContextOutcomes, OutcomeStore, ScopeKey};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Builds the collection map for every group in `outcomes`.
pub fn build_collection_data(outcomes: &ContextOutcomes) -> CollectionMap {
    outcomes
        .iter()
        .filter(|record| record.is_group())
        .map(|record| {
            let mut collections = Vec::new();
            let mut outcome_count = 0;
            for child in record.child_ids.iter().filter_map(|id| outcomes.get(id)) {
                if child.is_group() {
                    collections.push(child.id.clone());
                } else {
                    outcome_count += 1;
                }
            }
            let collection = Collection {
                id: record.id.clone(),
                name: record.title.clone(),
                collections,
                outcome_count,
            };
            (record.id.clone(), collection)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    context_id: Option<ContextId>,
    generation: Option<u64>,
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    data: Arc<CollectionMap>,
}

/// Memoized `getCollectionData` for any number of scopes.
///
/// Owned by one consumer; single-threaded access through `&mut self`.
/// Entries of scopes removed from the store are evicted on the next rebuild
/// or by `prune`.
#[derive(Debug, Default)]
pub struct CollectionCache {
    entries: HashMap<ScopeKey, CacheEntry>,
    rebuilds: u64,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collection map for `scope`, rebuilding only when the
    /// scope's context or that context's outcome mapping changed.
    pub fn get_collection_data(
        &mut self,
        state: &OutcomeStore,
        scope: &str,
    ) -> Arc<CollectionMap> {
        let context = context_id(state, scope);
        let outcomes = context.and_then(|context| state.context_outcomes(context));
        let key = CacheKey {
            context_id: context.map(str::to_string),
            generation: outcomes.map(ContextOutcomes::generation),
        };

        if let Some(entry) = self.entries.get(scope) {
            if entry.key == key {
                return Arc::clone(&entry.data);
            }
        }

        self.prune(state);
        let data = Arc::new(outcomes.map(build_collection_data).unwrap_or_default());
        self.rebuilds += 1;
        debug!(
            "event=collections_rebuild module=collections scope={} context={} groups={}",
            scope,
            context.unwrap_or("-"),
            data.len()
        );
        self.entries.insert(
            scope.to_string(),
            CacheEntry {
                key,
                data: Arc::clone(&data),
            },
        );
        data
    }

    /// Drops the entry for one scope. Returns whether one existed.
    pub fn invalidate(&mut self, scope: &str) -> bool {
        self.entries.remove(scope).is_some()
    }

    /// Drops entries whose scope has no configuration in `state`.
    /// Returns how many were dropped.
    pub fn prune(&mut self, state: &OutcomeStore) -> usize {
        let before = self.entries.len();
        self.entries.retain(|scope, _| state.scope_config(scope).is_some());
        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!("event=collections_prune module=collections pruned={}", pruned);
        }
        pruned
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of full rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

/// One row of the displayed collection tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: OutcomeId,
    /// Zero for root collections.
    pub depth: usize,
}

/// Walks `collections` depth-first starting from `root_ids`.
///
/// Root ids without a collection (leaves or unloaded) are skipped. An id
/// reached twice is emitted once and the repeat is logged as inconsistent
/// data.
pub fn display_order(collections: &CollectionMap, root_ids: &[OutcomeId]) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(&str, usize)> = root_ids
        .iter()
        .rev()
        .map(|id| (id.as_str(), 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(collection) = collections.get(id) else {
            continue;
        };
        if !visited.insert(id) {
            warn!("event=collection_revisit module=collections status=inconsistent id={id}");
            continue;
        }
        rows.push(DisplayRow {
            id: collection.id.clone(),
            depth,
        });
        stack.extend(
            collection
                .collections
                .iter()
                .rev()
                .map(|child| (child.as_str(), depth + 1)),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{build_collection_data, display_order, DisplayRow};
    use crate::model::outcome::Outcome;
    use crate::store::ContextOutcomes;

    fn row(id: &str, depth: usize) -> DisplayRow {
        DisplayRow {
            id: id.to_string(),
            depth,
        }
    }

    #[test]
    fn unloaded_children_are_not_collections() {
        let outcomes = ContextOutcomes::from_records([
            Outcome::new("1", "t1").with_child_ids(["2", "missing", "3"]),
            Outcome::new("2", "t2").with_has_children(true),
            Outcome::new("3", "t3"),
        ]);
        let collections = build_collection_data(&outcomes);

        let root = &collections["1"];
        assert_eq!(root.collections, vec!["2".to_string()]);
        assert_eq!(root.outcome_count, 1);
        assert_eq!(root.group_count(), 1);
        assert_eq!(collections["2"].group_count(), 0);
        assert_eq!(root.descriptor(), "1 Group | 1 Outcome");
        assert!(collections["2"].collections.is_empty());
    }

    #[test]
    fn display_order_is_depth_first_from_roots() {
        let outcomes = ContextOutcomes::from_records([
            Outcome::new("a", "A").with_child_ids(["b", "c"]),
            Outcome::new("b", "B").with_child_ids(["d"]),
            Outcome::new("c", "C").with_has_children(true),
            Outcome::new("d", "D").with_has_children(true),
            Outcome::new("e", "E").with_has_children(true),
            Outcome::new("leaf", "Leaf"),
        ]);
        let collections = build_collection_data(&outcomes);
        let roots = ["a", "leaf", "e"].map(String::from);

        assert_eq!(
            display_order(&collections, &roots),
            vec![row("a", 0), row("b", 1), row("d", 2), row("c", 1), row("e", 0)]
        );
    }

    #[test]
    fn display_order_stops_on_cycles() {
        let outcomes = ContextOutcomes::from_records([
            Outcome::new("x", "X").with_child_ids(["y"]),
            Outcome::new("y", "Y").with_child_ids(["x"]),
        ]);
        let collections = build_collection_data(&outcomes);
        let roots = vec!["x".to_string()];

        assert_eq!(
            display_order(&collections, &roots),
            vec![row("x", 0), row("y", 1)]
        );
    }
}
