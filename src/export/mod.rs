//! Export module
//!
//! - JSON: machine-readable full ledger export
//! - YAML: human-readable full ledger export
//! - CSV: acquisitions, for spreadsheets

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_acquisitions_csv;
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
