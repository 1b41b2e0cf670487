//! Acquisition CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_acquisition_list;
use crate::error::LedgerResult;
use crate::ledger::{Recorded, Redefined};
use crate::models::{Acquisition, AcquisitionKey, ProviderKey};
use crate::services::{AcquisitionService, ProviderService};
use crate::storage::Storage;

use super::{parse_date, parse_money, ProviderArgs, TargetProviderArgs};

/// Acquisition subcommands
#[derive(Subcommand)]
pub enum AcquisitionCommands {
    /// Record a purchase
    Record {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        /// Quantity bought
        quantity: u32,
        /// Unit price; defaults to the provider's offer for the product
        #[arg(long)]
        price: Option<String>,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Memo
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// List acquisitions in date order
    List {
        /// Only purchases from providers with this name
        #[arg(short, long)]
        provider: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Move a purchase to another provider
    Move {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        /// Purchase date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        #[command(flatten)]
        target: TargetProviderArgs,
    },
    /// Rename the product of a purchase
    Rename {
        #[command(flatten)]
        who: ProviderArgs,
        /// Current product name
        product: String,
        /// New product name
        new_product: String,
        /// Purchase date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Move a purchase to another date
    Redate {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        /// Current purchase date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// New purchase date (YYYY-MM-DD)
        new_date: String,
    },
    /// Delete a purchase
    Delete {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        /// Purchase date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
}

/// Handle an acquisition command
pub fn handle_acquisition_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: AcquisitionCommands,
) -> LedgerResult<()> {
    match cmd {
        AcquisitionCommands::Record {
            who,
            product,
            quantity,
            price,
            date,
            memo,
        } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => Local::now().date_naive(),
            };

            let mut service = AcquisitionService::new(storage);
            let unit_price = match price {
                Some(price) => parse_money(&price)?,
                None => service.offered_price(&provider, &product)?,
            };
            let mut line = Acquisition::new(date, provider, &product, quantity, unit_price)?;
            if let Some(memo) = memo {
                line = line.with_memo(memo);
            }

            let (recorded, stored) = service.record(line)?;
            let total = stored.total().format_with_symbol(&settings.currency_symbol);
            match recorded {
                Recorded::Inserted(_) => println!(
                    "Recorded: {} x {} from {} ({})",
                    stored.quantity, stored.product, stored.provider.name, total
                ),
                Recorded::Merged(_) => println!(
                    "Merged into existing line: now {} x {} from {} ({})",
                    stored.quantity, stored.product, stored.provider.name, total
                ),
            }
        }

        AcquisitionCommands::List { provider, from, to } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;

            let service = AcquisitionService::new(storage);
            let lines: Vec<_> = service
                .list(None, from, to)
                .into_iter()
                .filter(|l| provider.as_deref().map_or(true, |name| l.provider.name == name.trim()))
                .collect();
            println!("{}", format_acquisition_list(&lines, settings));
        }

        AcquisitionCommands::Move {
            who,
            product,
            date,
            target,
        } => {
            let providers = ProviderService::new(storage);
            let from = providers.resolve(&who.selector())?;
            let to = providers.resolve(&target.selector())?;

            let key = line_key(from, &product, &date)?;
            let (outcome, stored) = AcquisitionService::new(storage).move_to(&key, to)?;
            report(&outcome, &stored);
        }

        AcquisitionCommands::Rename {
            who,
            product,
            new_product,
            date,
        } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let key = line_key(provider, &product, &date)?;
            let (outcome, stored) = AcquisitionService::new(storage).rename(&key, &new_product)?;
            report(&outcome, &stored);
        }

        AcquisitionCommands::Redate {
            who,
            product,
            date,
            new_date,
        } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let key = line_key(provider, &product, &date)?;
            let (outcome, stored) = AcquisitionService::new(storage).redate(&key, parse_date(&new_date)?)?;
            report(&outcome, &stored);
        }

        AcquisitionCommands::Delete { who, product, date } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let key = line_key(provider, &product, &date)?;
            let line = AcquisitionService::new(storage).delete(&key)?;
            println!("Deleted acquisition: {} (quantity {})", key, line.quantity);
        }
    }

    Ok(())
}

fn line_key(provider: ProviderKey, product: &str, date: &str) -> LedgerResult<AcquisitionKey> {
    Ok(AcquisitionKey {
        date: parse_date(date)?,
        provider,
        product: product.trim().to_string(),
    })
}

fn report(outcome: &Redefined, stored: &Acquisition) {
    match outcome {
        Redefined::Moved(key) => println!("Updated acquisition: {}", key),
        Redefined::Merged(key) => println!(
            "Merged into existing line: {} (quantity now {})",
            key, stored.quantity
        ),
    }
}
