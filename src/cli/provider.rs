//! Provider CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_provider_details, format_provider_list};
use crate::error::LedgerResult;
use crate::models::Address;
use crate::services::ProviderService;
use crate::storage::Storage;

use super::{describe_cascade, ProviderArgs};

/// Provider subcommands
#[derive(Subcommand)]
pub enum ProviderCommands {
    /// Add a provider
    Add {
        /// Provider name
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        neighborhood: String,
        #[arg(long)]
        street: String,
        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// List all providers
    List,
    /// Show provider details and offers
    Show {
        #[command(flatten)]
        who: ProviderArgs,
    },
    /// Rename a provider; its offers and acquisitions follow
    Rename {
        #[command(flatten)]
        who: ProviderArgs,
        /// New name
        new_name: String,
    },
    /// Move a provider to another address; its offers and acquisitions follow
    Move {
        #[command(flatten)]
        who: ProviderArgs,
        #[arg(long)]
        to_city: Option<String>,
        #[arg(long)]
        to_neighborhood: Option<String>,
        #[arg(long)]
        to_street: Option<String>,
    },
    /// Delete a provider
    Delete {
        #[command(flatten)]
        who: ProviderArgs,
        /// Also delete its offers and acquisitions
        #[arg(long)]
        cascade: bool,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a provider command
pub fn handle_provider_command(storage: &mut Storage, settings: &Settings, cmd: ProviderCommands) -> LedgerResult<()> {
    let mut service = ProviderService::new(storage);

    match cmd {
        ProviderCommands::Add {
            name,
            city,
            neighborhood,
            street,
            phone,
        } => {
            let address = Address::new(&city, &neighborhood, &street)?;
            let provider = service.create(&name, address, phone.as_deref())?;
            println!("Created provider: {}", provider);
        }

        ProviderCommands::List => {
            println!("{}", format_provider_list(&service.list(), settings));
        }

        ProviderCommands::Show { who } => {
            let key = service.resolve(&who.selector())?;
            let summary = service.summary(&key)?;
            print!("{}", format_provider_details(&summary, &service.offers(&key), settings));
        }

        ProviderCommands::Rename { who, new_name } => {
            let key = service.resolve(&who.selector())?;
            let (provider, report) = service.rename(&key, &new_name)?;
            println!("Renamed provider: '{}' -> '{}'", key.name, provider.name);
            if let Some(line) = describe_cascade(&report) {
                println!("{}", line);
            }
        }

        ProviderCommands::Move {
            who,
            to_city,
            to_neighborhood,
            to_street,
        } => {
            let key = service.resolve(&who.selector())?;
            let (provider, report) = service.relocate(
                &key,
                to_city.as_deref(),
                to_neighborhood.as_deref(),
                to_street.as_deref(),
            )?;
            println!("Moved provider: {} -> {}", key, provider);
            if let Some(line) = describe_cascade(&report) {
                println!("{}", line);
            }
        }

        ProviderCommands::Delete { who, cascade, force } => {
            let key = service.resolve(&who.selector())?;

            if !force {
                println!("About to delete provider: {}", key);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let (provider, dependents) = service.delete(&key, cascade)?;
            println!("Deleted provider: {}", provider);
            if dependents > 0 {
                println!("  with {} offer(s) and acquisition(s)", dependents);
            }
        }
    }

    Ok(())
}
