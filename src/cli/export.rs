//! CLI commands for data export

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_acquisitions_csv, export_full_json, export_full_yaml, FullExport};
use crate::storage::Storage;

/// Full export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON (full ledger)
    Json,
    /// YAML (full ledger, human-readable)
    Yaml,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the whole ledger
    All {
        /// Output file path; defaults to the exports directory
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export acquisitions to CSV
    Acquisitions {
        /// Output file path; defaults to the exports directory
        output: Option<PathBuf>,
    },

    /// Show what an export would contain without writing files
    Info,
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, settings: &Settings, cmd: ExportCommands) -> LedgerResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let output = output_path(storage, output, "ledger", format.extension())?;
            let mut writer = BufWriter::new(create(&output)?);
            match format {
                ExportFormat::Json => export_full_json(&storage.ledger, &mut writer, pretty)?,
                ExportFormat::Yaml => export_full_yaml(&storage.ledger, &mut writer)?,
            }
            println!("Full ledger exported to: {}", output.display());
        }

        ExportCommands::Acquisitions { output } => {
            let output = output_path(storage, output, "acquisitions", "csv")?;
            export_acquisitions_csv(&storage.ledger, BufWriter::new(create(&output)?))?;
            println!(
                "Exported {} acquisition(s) to: {}",
                storage.ledger.acquisitions().len(),
                output.display()
            );
        }

        ExportCommands::Info => {
            let export = FullExport::from_ledger(&storage.ledger);
            let meta = &export.metadata;
            println!("Export schema version: {}", export.schema_version);
            println!("Providers:    {}", meta.provider_count);
            println!("Offers:       {}", meta.offer_count);
            println!("Acquisitions: {}", meta.acquisition_count);
            println!(
                "Total spent:  {}",
                meta.total_spent.format_with_symbol(&settings.currency_symbol)
            );
            if let (Some(first), Some(last)) = (&meta.earliest_acquisition, &meta.latest_acquisition) {
                println!("Date range:   {} to {}", first, last);
            }
        }
    }

    Ok(())
}

/// The given path, or a timestamped file in the exports directory
fn output_path(storage: &Storage, output: Option<PathBuf>, stem: &str, extension: &str) -> LedgerResult<PathBuf> {
    if let Some(path) = output {
        return Ok(path);
    }
    let dir = storage.paths().export_dir();
    std::fs::create_dir_all(&dir)
        .map_err(|e| LedgerError::Export(format!("Failed to create {}: {}", dir.display(), e)))?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    Ok(dir.join(format!("{}-{}.{}", stem, stamp, extension)))
}

fn create(path: &Path) -> LedgerResult<File> {
    File::create(path)
        .map_err(|e| LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e)))
}
