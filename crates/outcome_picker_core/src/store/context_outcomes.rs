//! Ordered outcome mapping for one context.
//!
//! # Invariants
//! - Iteration follows insertion order; replacing a record keeps its slot.
//! - Every effective mutation assigns a fresh process-unique generation.
//! - Clones share a generation until one of them is mutated.
//! - `listing_groups` counts, per child id, the loaded groups listing it.

use crate::model::outcome::{Outcome, OutcomeId};
use serde::de::{Error as DeError, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt::Formatter;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Flat id → record mapping of one context, with a generation token.
#[derive(Debug, Clone)]
pub struct ContextOutcomes {
    order: Vec<OutcomeId>,
    records: HashMap<OutcomeId, Outcome>,
    listing_groups: HashMap<OutcomeId, usize>,
    generation: u64,
}

impl Default for ContextOutcomes {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ContextOutcomes {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.records == other.records
    }
}

impl Eq for ContextOutcomes {}

impl ContextOutcomes {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
            listing_groups: HashMap::new(),
            generation: next_generation(),
        }
    }

    /// Builds a mapping from records, later duplicates replacing earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = Outcome>) -> Self {
        let mut outcomes = Self::new();
        outcomes.upsert_all(records);
        outcomes
    }

    /// Token identifying the current content of this mapping.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Outcome> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Whether a loaded group lists `id` among its children.
    pub fn is_listed_by_group(&self, id: &str) -> bool {
        self.listing_groups.contains_key(id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[OutcomeId] {
        &self.order
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Outcome> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Adds or replaces records. Returns how many records changed.
    ///
    /// The generation advances once per call, and only if something changed.
    pub fn upsert_all(&mut self, records: impl IntoIterator<Item = Outcome>) -> usize {
        let mut changed = 0;
        for record in records {
            match self.records.get(record.id.as_str()) {
                Some(existing) if *existing == record => continue,
                Some(_) => {}
                None => self.order.push(record.id.clone()),
            }
            self.link_children(&record);
            if let Some(previous) = self.records.insert(record.id.clone(), record) {
                self.unlink_children(&previous);
            }
            changed += 1;
        }
        if changed > 0 {
            self.generation = next_generation();
        }
        changed
    }

    /// Removes one record, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Outcome> {
        let removed = self.records.remove(id)?;
        self.unlink_children(&removed);
        self.order.retain(|candidate| candidate != id);
        self.generation = next_generation();
        Some(removed)
    }

    fn link_children(&mut self, parent: &Outcome) {
        if !parent.is_group() {
            return;
        }
        for child in &parent.child_ids {
            *self.listing_groups.entry(child.clone()).or_insert(0) += 1;
        }
    }

    fn unlink_children(&mut self, parent: &Outcome) {
        if !parent.is_group() {
            return;
        }
        for child in &parent.child_ids {
            if let Some(count) = self.listing_groups.get_mut(child.as_str()) {
                *count -= 1;
                if *count == 0 {
                    self.listing_groups.remove(child.as_str());
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for ContextOutcomes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ContextOutcomesVisitor)
    }
}

struct ContextOutcomesVisitor;

impl<'de> Visitor<'de> for ContextOutcomesVisitor {
    type Value = ContextOutcomes;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "a map of outcome id to outcome record")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, record)) = map.next_entry::<String, Outcome>()? {
            if key != record.id {
                return Err(A::Error::custom(format!(
                    "outcome key `{key}` does not match record id `{}`",
                    record.id
                )));
            }
            records.push(record);
        }
        Ok(ContextOutcomes::from_records(records))
    }
}
