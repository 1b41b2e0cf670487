//! Audit logging
//!
//! Every create, update, delete and merge performed through the services is
//! appended to `audit.log` as one JSON object per line, with the record
//! before and after the change.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_cli::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Provider, key.to_string(), &provider))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::diff_summary;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
