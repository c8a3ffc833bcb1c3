//! Audit logging for backup events
//!
//! Records every backup created, restore completed or failed, and prune in
//! an append-only JSON-lines log next to the data directory.
//!
//! - `AuditEntry`: one event with timestamp, counts and optional error.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, AuditEvent};
pub use logger::AuditLogger;
