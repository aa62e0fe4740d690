//! JSON state snapshots.
//!
//! # Responsibility
//! - Parse a picker state document into an `OutcomeStore`.
//!
//! # Invariants
//! - Outcome key order in the document is the store's insertion order.
//! - Top-level keys other than `activePicker` and `context` are scopes.
//! - Missing sections load as empty state.
//! - A scope entry that is not an object is a shape error, reported with
//!   its key.

use crate::model::outcome::WireId;
use crate::store::{ContextId, ContextOutcomes, OutcomeStore, ScopeConfig, ScopeKey};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Result type for snapshot loading.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot loading failure.
#[derive(Debug)]
pub enum SnapshotError {
    /// Snapshot file cannot be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document is not valid snapshot JSON.
    Json(serde_json::Error),
    /// Valid JSON whose top-level entry has the wrong layout.
    InvalidShape { key: String, reason: String },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read snapshot `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid snapshot json: {err}"),
            Self::InvalidShape { key, reason } => {
                write!(f, "invalid snapshot entry `{key}`: {reason}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidShape { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireContextState {
    #[serde(default)]
    outcomes: BTreeMap<ContextId, Option<ContextOutcomes>>,
    #[serde(default)]
    root_outcome_ids: BTreeMap<ContextId, Option<Vec<WireId>>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireScope {
    #[serde(default)]
    config: ScopeConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    #[serde(default)]
    active_picker: Option<String>,
    #[serde(default)]
    context: WireContextState,
    #[serde(flatten)]
    scopes: BTreeMap<ScopeKey, Value>,
}

impl TryFrom<WireSnapshot> for OutcomeStore {
    type Error = SnapshotError;

    fn try_from(value: WireSnapshot) -> SnapshotResult<Self> {
        let mut store = OutcomeStore::new();
        if let Some(active) = value.active_picker {
            store.set_active_picker(active);
        }
        for (scope, entry) in value.scopes {
            let config = scope_entry_config(&scope, entry)?;
            store.set_scope_config(scope, config);
        }
        for (context, outcomes) in value.context.outcomes {
            if let Some(outcomes) = outcomes {
                store.set_context_outcomes(context, outcomes);
            }
        }
        for (context, ids) in value.context.root_outcome_ids {
            if let Some(ids) = ids {
                store.set_root_outcome_ids(context, ids);
            }
        }
        Ok(store)
    }
}

fn scope_entry_config(scope: &str, entry: Value) -> SnapshotResult<ScopeConfig> {
    let kind = match &entry {
        Value::Object(_) => None,
        Value::Null => Some("null"),
        Value::Bool(_) => Some("a boolean"),
        Value::Number(_) => Some("a number"),
        Value::String(_) => Some("a string"),
        Value::Array(_) => Some("an array"),
    };
    if let Some(kind) = kind {
        return Err(SnapshotError::InvalidShape {
            key: scope.to_string(),
            reason: format!("expected a scope object, found {kind}"),
        });
    }
    let wire: WireScope =
        serde_json::from_value(entry).map_err(|err| SnapshotError::InvalidShape {
            key: scope.to_string(),
            reason: err.to_string(),
        })?;
    Ok(wire.config)
}

/// Parses a snapshot document.
pub fn parse_snapshot(json: &str) -> SnapshotResult<OutcomeStore> {
    let wire: WireSnapshot = serde_json::from_str(json)?;
    OutcomeStore::try_from(wire)
}

/// Reads and parses a snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> SnapshotResult<OutcomeStore> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = parse_snapshot(&json)?;
    info!(
        "event=snapshot_load module=snapshot status=ok scopes={}",
        store.scope_keys().count()
    );
    Ok(store)
}
