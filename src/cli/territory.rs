//! Territory CLI commands

use clap::Subcommand;

use crate::display::format_territories;
use crate::error::LedgerResult;
use crate::services::TerritoryService;
use crate::storage::Storage;

use super::describe_cascade;

/// Territory subcommands
#[derive(Subcommand)]
pub enum TerritoryCommands {
    /// List cities, neighborhoods and streets with providers
    List,
    /// Rename a city; every provider in it moves along
    RenameCity {
        city: String,
        new_name: String,
    },
    /// Rename a neighborhood within a city
    RenameNeighborhood {
        city: String,
        neighborhood: String,
        new_name: String,
    },
    /// Rename a street within a neighborhood
    RenameStreet {
        city: String,
        neighborhood: String,
        street: String,
        new_name: String,
    },
}

/// Handle a territory command
pub fn handle_territory_command(storage: &mut Storage, cmd: TerritoryCommands) -> LedgerResult<()> {
    let mut service = TerritoryService::new(storage);

    let (old, new, report) = match cmd {
        TerritoryCommands::List => {
            println!("{}", format_territories(&service.list()));
            return Ok(());
        }
        TerritoryCommands::RenameCity { city, new_name } => {
            let report = service.rename_city(&city, &new_name)?;
            (city, new_name, report)
        }
        TerritoryCommands::RenameNeighborhood {
            city,
            neighborhood,
            new_name,
        } => {
            let report = service.rename_neighborhood(&city, &neighborhood, &new_name)?;
            (neighborhood, new_name, report)
        }
        TerritoryCommands::RenameStreet {
            city,
            neighborhood,
            street,
            new_name,
        } => {
            let report = service.rename_street(&city, &neighborhood, &street, &new_name)?;
            (street, new_name, report)
        }
    };

    println!(
        "Renamed '{}' -> '{}' ({} provider(s) moved)",
        old.trim(),
        new.trim(),
        report.providers_moved
    );
    if let Some(line) = describe_cascade(&report) {
        println!("{}", line);
    }
    Ok(())
}
