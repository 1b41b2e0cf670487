//! Offer CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_offer_list;
use crate::error::LedgerResult;
use crate::services::{OfferService, ProviderService};
use crate::storage::Storage;

use super::{parse_money, ProviderArgs, TargetProviderArgs};

/// Offer subcommands
#[derive(Subcommand)]
pub enum OfferCommands {
    /// Publish a product at a unit price for a provider
    Add {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        /// Unit price (e.g. 4.50)
        price: String,
    },
    /// List offers
    List {
        /// Only offers from providers with this name
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Move an offer to another provider
    Move {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        #[command(flatten)]
        target: TargetProviderArgs,
    },
    /// Rename the product of an offer
    Rename {
        #[command(flatten)]
        who: ProviderArgs,
        /// Current product name
        product: String,
        /// New product name
        new_product: String,
    },
    /// Change the unit price of an offer
    Reprice {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
        /// New unit price
        price: String,
    },
    /// Delete an offer
    Delete {
        #[command(flatten)]
        who: ProviderArgs,
        /// Product name
        product: String,
    },
}

/// Handle an offer command
pub fn handle_offer_command(storage: &mut Storage, settings: &Settings, cmd: OfferCommands) -> LedgerResult<()> {
    match cmd {
        OfferCommands::Add { who, product, price } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let offer = OfferService::new(storage).create(provider, &product, parse_money(&price)?)?;
            println!(
                "Added offer: {} at {}",
                offer.product,
                offer.unit_price.format_with_symbol(&settings.currency_symbol)
            );
        }

        OfferCommands::List { provider } => {
            let service = OfferService::new(storage);
            let offers: Vec<_> = match provider {
                Some(name) => service
                    .list(None)
                    .into_iter()
                    .filter(|o| o.provider.name == name.trim())
                    .collect(),
                None => service.list(None),
            };
            println!("{}", format_offer_list(&offers, settings));
        }

        OfferCommands::Move { who, product, target } => {
            let providers = ProviderService::new(storage);
            let from = providers.resolve(&who.selector())?;
            let to = providers.resolve(&target.selector())?;

            let offer = OfferService::new(storage).move_to(&OfferService::key(from, &product), to)?;
            println!("Moved offer: {} -> {}", offer.product, offer.provider);
        }

        OfferCommands::Rename {
            who,
            product,
            new_product,
        } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let offer = OfferService::new(storage).rename(&OfferService::key(provider, &product), &new_product)?;
            println!("Renamed offer: '{}' -> '{}'", product.trim(), offer.product);
        }

        OfferCommands::Reprice { who, product, price } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let offer = OfferService::new(storage).reprice(&OfferService::key(provider, &product), parse_money(&price)?)?;
            println!(
                "Repriced offer: {} now {}",
                offer.product,
                offer.unit_price.format_with_symbol(&settings.currency_symbol)
            );
        }

        OfferCommands::Delete { who, product } => {
            let provider = ProviderService::new(storage).resolve(&who.selector())?;
            let offer = OfferService::new(storage).delete(&OfferService::key(provider, &product))?;
            println!("Deleted offer: {}", offer.product);
        }
    }

    Ok(())
}
