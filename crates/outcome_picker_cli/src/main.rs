//! Diagnostic CLI for the outcome picker core.
//!
//! # Responsibility
//! - Load a JSON state snapshot and print the derived collection tree.
//! - Show per-group summaries and the fetches each group still needs.
//!
//! Usage: `outcome_picker_cli <snapshot.json> [scope]`
//! The scope defaults to the snapshot's active picker. Set
//! `OUTCOME_PICKER_LOG_DIR` to an absolute path to enable file logging.

use log::info;
use outcome_picker_core::{
    audit_context, context_id, default_log_level, display_order, get_children_to_load,
    get_root_outcome_ids, get_scope, init_logging, is_open, load_snapshot, CollectionCache,
};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "OUTCOME_PICKER_LOG_DIR";

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next() else {
        eprintln!("usage: outcome_picker_cli <snapshot.json> [scope]");
        return ExitCode::from(2);
    };
    let scope_arg = args.next();

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let state = match load_snapshot(&snapshot_path) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let scope = scope_arg.unwrap_or_else(|| get_scope(&state).to_string());
    println!("outcome_picker_core version={}", outcome_picker_core::core_version());
    println!(
        "scope={} context={} open={}",
        scope,
        context_id(&state, &scope).unwrap_or("-"),
        is_open(&state, &scope)
    );

    let mut cache = CollectionCache::new();
    let collections = cache.get_collection_data(&state, &scope);
    info!(
        "event=cli_run module=cli scope={} groups={}",
        scope,
        collections.len()
    );
    for row in display_order(&collections, &get_root_outcome_ids(&state, &scope)) {
        let Some(collection) = collections.get(row.id.as_str()) else {
            continue;
        };
        let pending = get_children_to_load(&state, &scope, &row.id);
        let indent = "  ".repeat(row.depth);
        if pending.is_empty() {
            println!("{indent}{} ({})", collection.name, collection.descriptor());
        } else {
            println!(
                "{indent}{} ({}) load=[{}]",
                collection.name,
                collection.descriptor(),
                pending.join(",")
            );
        }
    }

    for finding in audit_context(&state, &scope) {
        println!("inconsistent: {finding}");
    }
    ExitCode::SUCCESS
}
