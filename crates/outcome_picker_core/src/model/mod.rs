//! Domain model for the outcome picker.
//!
//! # Responsibility
//! - Define flat outcome records as written by the fetch collaborator.
//! - Define derived collection nodes consumed by display code.
//!
//! # Invariants
//! - Trees are expressed as id-keyed maps with id references, never as
//!   owning pointers.

pub mod collection;
pub mod outcome;
