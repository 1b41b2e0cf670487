//! JSON export of the whole ledger with schema versioning

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Ledger, LedgerSnapshot};
use crate::models::Money;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub ledger: LedgerSnapshot,

    pub metadata: ExportMetadata,
}

/// Figures computed at export time, for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub provider_count: usize,
    pub offer_count: usize,
    pub acquisition_count: usize,
    pub total_spent: Money,
    pub earliest_acquisition: Option<String>,
    pub latest_acquisition: Option<String>,
}

impl FullExport {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let snapshot = ledger.snapshot();

        // Acquisitions are in date order
        let metadata = ExportMetadata {
            provider_count: snapshot.providers.len(),
            offer_count: snapshot.offers.len(),
            acquisition_count: snapshot.acquisitions.len(),
            total_spent: ledger.total_spent(),
            earliest_acquisition: snapshot.acquisitions.first().map(|a| a.date.to_string()),
            latest_acquisition: snapshot.acquisitions.last().map(|a| a.date.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: snapshot,
            metadata,
        }
    }

    /// Check the schema version and rebuild the ledger, which rejects
    /// duplicate keys and records pointing at unknown providers
    pub fn restore(self) -> LedgerResult<Ledger> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(LedgerError::Export(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            )));
        }
        Ledger::from_snapshot(self.ledger)
    }
}

/// Export the full ledger to JSON
pub fn export_full_json<W: Write>(ledger: &Ledger, writer: &mut W, pretty: bool) -> LedgerResult<()> {
    let export = FullExport::from_ledger(ledger);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse a JSON export and rebuild the ledger from it
pub fn import_from_json(json_str: &str) -> LedgerResult<Ledger> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.restore()
}
