//! Acquisition model
//!
//! A ledger line: some quantity of a product bought from a provider on a date.
//! Two lines with the same date, provider and product are the same line; when
//! a change would make them collide their quantities are combined.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::provider::ProviderKey;
use super::LedgerEntity;
use crate::collection::{required_component, InvalidKey, Keyed};

/// Key of an acquisition, in ledger (date) order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AcquisitionKey {
    pub date: NaiveDate,
    pub provider: ProviderKey,
    pub product: String,
}

impl fmt::Display for AcquisitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} from {}", self.date, self.product, self.provider)
    }
}

/// A change to one of the acquisition's key fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionChange {
    /// Move the line to another counterparty
    Provider(ProviderKey),
    Product(String),
    Date(NaiveDate),
}

/// A purchase recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acquisition {
    pub date: NaiveDate,
    pub provider: ProviderKey,
    pub product: String,
    pub quantity: u32,
    pub unit_price: Money,

    /// Free-form note
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl Acquisition {
    pub fn new(
        date: NaiveDate,
        provider: ProviderKey,
        product: impl AsRef<str>,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, InvalidKey> {
        Ok(Self {
            date,
            provider,
            product: required_component(product.as_ref(), "Product")?,
            quantity,
            unit_price,
            memo: String::new(),
        })
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Quantity times unit price
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Fold another line's quantity into this one
    pub fn absorb(&mut self, other: &Acquisition) {
        self.quantity = self.quantity.saturating_add(other.quantity);
    }
}

impl Keyed for Acquisition {
    type Key = AcquisitionKey;
    type Change = AcquisitionChange;

    fn key(&self) -> AcquisitionKey {
        AcquisitionKey {
            date: self.date,
            provider: self.provider.clone(),
            product: self.product.clone(),
        }
    }

    fn check_key(&self) -> Result<(), InvalidKey> {
        required_component(&self.product, "Product")?;
        required_component(&self.provider.name, "Provider name")?;
        self.provider.address.validate()
    }

    fn set_key(&mut self, change: AcquisitionChange) -> Result<(), InvalidKey> {
        let key = self.preview_key(&change)?;
        self.date = key.date;
        self.provider = key.provider;
        self.product = key.product;
        Ok(())
    }

    fn preview_key(&self, change: &AcquisitionChange) -> Result<AcquisitionKey, InvalidKey> {
        let mut key = self.key();
        match change {
            AcquisitionChange::Provider(provider) => key.provider = provider.clone(),
            AcquisitionChange::Product(product) => {
                key.product = required_component(product, "Product")?;
            }
            AcquisitionChange::Date(date) => key.date = *date,
        }
        Ok(key)
    }
}

impl LedgerEntity for Acquisition {
    const KIND: &'static str = "Acquisition";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn grocer() -> ProviderKey {
        ProviderKey::new("Bodega", Address::new("Lima", "Surco", "Av. Benavides").unwrap()).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let price = Money::parse("50000000000").unwrap();
        let line = Acquisition::new(day(1), grocer(), "Gold", 2_000_000, price).unwrap();
        assert_eq!(line.total(), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_total() {
        let line = Acquisition::new(day(1), grocer(), "Milk", 3, Money::from_cents(420)).unwrap();
        assert_eq!(line.total(), Money::from_cents(1260));
    }

    #[test]
    fn test_absorb_adds_quantity() {
        let mut line = Acquisition::new(day(1), grocer(), "Milk", 3, Money::from_cents(420)).unwrap();
        let other = Acquisition::new(day(2), grocer(), "Milk", 4, Money::from_cents(400)).unwrap();
        line.absorb(&other);
        assert_eq!(line.quantity, 7);
        assert_eq!(line.unit_price, Money::from_cents(420));
    }

    #[test]
    fn test_date_change() {
        let mut line = Acquisition::new(day(1), grocer(), "Milk", 1, Money::zero()).unwrap();
        let preview = line.preview_key(&AcquisitionChange::Date(day(9))).unwrap();
        assert_eq!(line.date, day(1));
        line.set_key(AcquisitionChange::Date(day(9))).unwrap();
        assert_eq!(line.key(), preview);
    }

    #[test]
    fn test_key_orders_by_date_first() {
        let early = Acquisition::new(day(1), grocer(), "Zucchini", 1, Money::zero()).unwrap();
        let late = Acquisition::new(day(2), grocer(), "Apples", 1, Money::zero()).unwrap();
        assert!(early.key() < late.key());
    }
}
