//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Providers are
//! picked by name; the address options are only needed when several
//! providers share that name.

pub mod acquisition;
pub mod export;
pub mod offer;
pub mod provider;
pub mod territory;

pub use acquisition::{handle_acquisition_command, AcquisitionCommands};
pub use export::{handle_export_command, ExportCommands};
pub use offer::{handle_offer_command, OfferCommands};
pub use provider::{handle_provider_command, ProviderCommands};
pub use territory::{handle_territory_command, TerritoryCommands};

use chrono::NaiveDate;
use clap::Args;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::CascadeReport;
use crate::models::Money;
use crate::services::ProviderSelector;

/// Selects an existing provider
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Provider name
    pub provider: String,

    /// City of the provider, if the name is ambiguous
    #[arg(long)]
    pub city: Option<String>,

    /// Neighborhood of the provider, if the name is ambiguous
    #[arg(long)]
    pub neighborhood: Option<String>,

    /// Street of the provider, if the name is ambiguous
    #[arg(long)]
    pub street: Option<String>,
}

impl ProviderArgs {
    pub fn selector(&self) -> ProviderSelector {
        ProviderSelector {
            name: self.provider.clone(),
            city: self.city.clone(),
            neighborhood: self.neighborhood.clone(),
            street: self.street.clone(),
        }
    }
}

/// Selects the provider something is moved to
#[derive(Args, Debug, Clone)]
pub struct TargetProviderArgs {
    /// Name of the provider to move to
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub to_city: Option<String>,

    #[arg(long)]
    pub to_neighborhood: Option<String>,

    #[arg(long)]
    pub to_street: Option<String>,
}

impl TargetProviderArgs {
    pub fn selector(&self) -> ProviderSelector {
        ProviderSelector {
            name: self.to.clone(),
            city: self.to_city.clone(),
            neighborhood: self.to_neighborhood.clone(),
            street: self.to_street.clone(),
        }
    }
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", input)))
}

/// Parse an amount such as "12.50"
pub fn parse_money(input: &str) -> LedgerResult<Money> {
    let amount = Money::parse(input).map_err(|e| LedgerError::Validation(e.to_string()))?;
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!("Amount cannot be negative: {}", input)));
    }
    Ok(amount)
}

/// One line describing what a cascade carried along, if anything
fn describe_cascade(report: &CascadeReport) -> Option<String> {
    if report.offers_moved + report.acquisitions_moved + report.acquisitions_merged == 0 {
        return None;
    }
    let mut line = format!(
        "  carried {} offer(s) and {} acquisition(s)",
        report.offers_moved, report.acquisitions_moved
    );
    if report.acquisitions_merged > 0 {
        line.push_str(&format!(", merged {} acquisition(s)", report.acquisitions_merged));
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_date("29/02/2024").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("12.5").unwrap(), Money::from_cents(1250));
        assert!(parse_money("-1").is_err());
        assert!(parse_money("abc").is_err());
    }

    #[test]
    fn test_describe_cascade() {
        assert_eq!(describe_cascade(&CascadeReport::default()), None);
        let report = CascadeReport {
            providers_moved: 1,
            offers_moved: 2,
            acquisitions_moved: 3,
            acquisitions_merged: 1,
        };
        assert_eq!(
            describe_cascade(&report).unwrap(),
            "  carried 2 offer(s) and 3 acquisition(s), merged 1 acquisition(s)"
        );
    }
}
