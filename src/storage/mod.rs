//! Storage layer
//!
//! The whole ledger lives in one JSON document (`data/ledger.json`) written
//! atomically. `Storage` owns the in-memory [`Ledger`] between a load and a
//! save and routes audit entries to the log.

pub mod file_io;
pub mod init;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::LedgerPaths;
use crate::error::LedgerResult;
use crate::ledger::{Ledger, LedgerSnapshot};

/// Main storage coordinator
pub struct Storage {
    paths: LedgerPaths,
    pub ledger: Ledger,
    audit: AuditLogger,
    audit_enabled: bool,
}

impl Storage {
    /// Create a storage with an empty ledger; call [`load_all`](Self::load_all)
    /// to read what is on disk
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            ledger: Ledger::new(),
            audit_enabled: true,
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Replace the in-memory ledger with the one on disk
    pub fn load_all(&mut self) -> LedgerResult<()> {
        let snapshot: LedgerSnapshot = read_json(self.paths.ledger_file())?;
        self.ledger = Ledger::from_snapshot(snapshot)?;
        Ok(())
    }

    /// Write the in-memory ledger to disk
    pub fn save_all(&self) -> LedgerResult<()> {
        write_json_atomic(self.paths.ledger_file(), &self.ledger.snapshot())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Append entries to the audit log, if enabled
    pub fn log_batch(&self, entries: &[AuditEntry]) -> LedgerResult<()> {
        if self.audit_enabled {
            self.audit.log_batch(entries)
        } else {
            Ok(())
        }
    }

    pub fn log_create<T: Serialize>(&self, entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> LedgerResult<()> {
        self.log_batch(&[AuditEntry::create(entity_type, entity_id, entity)])
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        self.log_batch(&[AuditEntry::update(entity_type, entity_id, before, after)])
    }

    pub fn log_merge<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        self.log_batch(&[AuditEntry::merge(entity_type, entity_id, before, after)])
    }

    pub fn log_delete<T: Serialize>(&self, entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> LedgerResult<()> {
        self.log_batch(&[AuditEntry::delete(entity_type, entity_id, entity)])
    }
}
