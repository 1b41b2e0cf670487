//! First-run setup

use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerError;
use crate::ledger::LedgerSnapshot;

use super::file_io::write_json_atomic;

/// Create the directory layout, an empty ledger and default settings
///
/// Existing files are left alone, so running it twice is harmless. Returns
/// `true` if anything was created.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<bool, LedgerError> {
    paths.ensure_directories()?;
    let mut created = false;

    if !paths.ledger_file().exists() {
        write_json_atomic(paths.ledger_file(), &LedgerSnapshot::default())?;
        created = true;
    }

    if !paths.is_initialized() {
        Settings::default().save(paths)?;
        created = true;
    }

    Ok(created)
}
