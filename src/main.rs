use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ledger_cli::cli::{
    handle_acquisition_command, handle_export_command, handle_offer_command, handle_provider_command,
    handle_territory_command, AcquisitionCommands, ExportCommands, OfferCommands, ProviderCommands,
    TerritoryCommands,
};
use ledger_cli::config::paths::DATA_DIR_ENV;
use ledger_cli::config::{LedgerPaths, Settings};
use ledger_cli::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "ledger",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based purchase ledger",
    long_about = "Keeps providers, the products they offer and what you bought from \
                  them. Renaming a provider or a place carries every offer and \
                  acquisition along with it."
)]
struct Cli {
    /// Directory holding the ledger, settings and audit log
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provider management commands
    #[command(subcommand)]
    Provider(ProviderCommands),

    /// Offer management commands
    #[command(subcommand)]
    Offer(OfferCommands),

    /// Acquisition (purchase) commands
    #[command(subcommand, alias = "buy")]
    Acquisition(AcquisitionCommands),

    /// Cities, neighborhoods and streets
    #[command(subcommand)]
    Territory(TerritoryCommands),

    /// Export the ledger
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent audit log entries
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize a new ledger
    Init,

    /// Show or change configuration
    Config {
        /// Change a setting, e.g. currency_symbol=€
        #[arg(long, value_name = "KEY=VALUE")]
        set: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);
    storage
        .load_all()
        .with_context(|| format!("Failed to load {}", paths.ledger_file().display()))?;

    match cli.command {
        Some(Commands::Provider(cmd)) => handle_provider_command(&mut storage, &settings, cmd)?,
        Some(Commands::Offer(cmd)) => handle_offer_command(&mut storage, &settings, cmd)?,
        Some(Commands::Acquisition(cmd)) => handle_acquisition_command(&mut storage, &settings, cmd)?,
        Some(Commands::Territory(cmd)) => handle_territory_command(&mut storage, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::History { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No history yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing ledger at: {}", paths.base_dir().display());
            if initialize_storage(&paths)? {
                println!("Initialization complete!");
                println!();
                println!("Run 'ledger provider add --help' to add your first provider.");
            } else {
                println!("Already initialized; nothing to do.");
            }
        }
        Some(Commands::Config { set }) => {
            if let Some(assignment) = set {
                let (name, value) = assignment
                    .split_once('=')
                    .context("Expected KEY=VALUE, e.g. currency_symbol=€")?;
                settings.set(name.trim(), value.trim())?;
                settings.save(&paths)?;
                println!("Set {} = {}", name.trim(), value.trim());
                return Ok(());
            }

            println!("Ledger Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Ledger file:      {}", paths.ledger_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  currency_symbol: {}", settings.currency_symbol);
            println!("  date_format:     {}", settings.date_format);
            println!("  audit_enabled:   {}", settings.audit_enabled);
        }
        None => {
            println!("Ledger - providers, offers and acquisitions");
            println!();
            println!("Run 'ledger --help' for usage information.");
        }
    }

    Ok(())
}
