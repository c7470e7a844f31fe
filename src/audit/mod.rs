//! Audit trail for ledger mutations
//!
//! Every create, update and delete performed through the services is
//! appended to `audit.log` as one JSON line holding the entity's state
//! before and after the change.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: appends and reads the JSONL file
//! - `generate_diff`: summary of changed top-level fields for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
