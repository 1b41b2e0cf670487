//! YAML export of the whole ledger

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

use super::json::FullExport;

/// Export the full ledger to YAML, preceded by a comment header
pub fn export_full_yaml<W: Write>(ledger: &Ledger, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::from_ledger(ledger);
    let io_err = |e: std::io::Error| LedgerError::Export(e.to_string());

    writeln!(writer, "# Ledger export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse a YAML export and rebuild the ledger from it
pub fn import_from_yaml(yaml_str: &str) -> LedgerResult<Ledger> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.restore()
}
