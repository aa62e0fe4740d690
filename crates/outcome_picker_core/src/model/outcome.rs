//! Outcome record model.
//!
//! # Responsibility
//! - Define the flat record shape written by the fetch collaborator.
//! - Classify records into groups and leaves.
//!
//! # Invariants
//! - A record is a group iff `has_children == Some(true)` or `child_ids` is
//!   non-empty. Every other loaded record is a leaf.
//! - An id with no record means "not yet loaded", never an error.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of one outcome within its context.
///
/// Upstream payloads send ids both as JSON strings and integers; both are
/// normalized to their decimal string form.
pub type OutcomeId = String;

/// Flat outcome record keyed by `id` inside one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: OutcomeId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered child ids. Absent or `null` on the wire means empty.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub child_ids: Vec<OutcomeId>,
    /// Marks a group whose child listing may not be known yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
    /// Child listing is known but at least one child is not loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_partial: Option<bool>,
}

impl Outcome {
    /// Creates a leaf record with the same text for `label` and `title`.
    pub fn new(id: impl Into<OutcomeId>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            label: title.clone(),
            title,
            description: None,
            child_ids: Vec::new(),
            has_children: None,
            is_partial: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_child_ids<I, S>(mut self, child_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OutcomeId>,
    {
        self.child_ids = child_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_has_children(mut self, has_children: bool) -> Self {
        self.has_children = Some(has_children);
        self
    }

    pub fn with_partial(mut self, is_partial: bool) -> Self {
        self.is_partial = Some(is_partial);
        self
    }

    /// Returns whether this record classifies as a group.
    pub fn is_group(&self) -> bool {
        self.has_children == Some(true) || !self.child_ids.is_empty()
    }

    /// Returns whether this record's child listing is incomplete.
    pub fn is_partial(&self) -> bool {
        self.is_partial == Some(true)
    }
}

/// Load state of one id inside a context.
///
/// Keeps "not loaded" distinct from "loaded leaf" so partial-load policy
/// can match exhaustively instead of overloading `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// No record exists for the id yet.
    NotLoaded,
    /// Loaded record without children.
    Leaf { partial: bool },
    /// Loaded record classified as a group.
    Group { partial: bool },
}

impl OutcomeStatus {
    /// Classifies an optional record.
    pub fn of(record: Option<&Outcome>) -> Self {
        match record {
            None => Self::NotLoaded,
            Some(outcome) if outcome.is_group() => Self::Group {
                partial: outcome.is_partial(),
            },
            Some(outcome) => Self::Leaf {
                partial: outcome.is_partial(),
            },
        }
    }

    pub fn is_loaded(self) -> bool {
        !matches!(self, Self::NotLoaded)
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

/// Wire form of an id: JSON string or integer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Text(String),
    Integer(i64),
}

impl From<WireId> for OutcomeId {
    fn from(value: WireId) -> Self {
        match value {
            WireId::Text(text) => text,
            WireId::Integer(number) => number.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<OutcomeId, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(deserializer).map(Into::into)
}

fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<OutcomeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Option::<Vec<WireId>>::deserialize(deserializer)?;
    Ok(ids
        .unwrap_or_default()
        .into_iter()
        .map(OutcomeId::from)
        .collect())
}
