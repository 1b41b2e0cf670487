//! Offer model
//!
//! A product a provider sells at a unit price. Keyed by provider and product.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::provider::ProviderKey;
use super::LedgerEntity;
use crate::collection::{required_component, InvalidKey, Keyed};

/// Key of an offer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferKey {
    pub provider: ProviderKey,
    pub product: String,
}

impl fmt::Display for OfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.product, self.provider)
    }
}

/// A change to one of the offer's key fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferChange {
    Provider(ProviderKey),
    Product(String),
}

/// A priced product from a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub provider: ProviderKey,
    pub product: String,
    pub unit_price: Money,
}

impl Offer {
    pub fn new(
        provider: ProviderKey,
        product: impl AsRef<str>,
        unit_price: Money,
    ) -> Result<Self, InvalidKey> {
        Ok(Self {
            provider,
            product: required_component(product.as_ref(), "Product")?,
            unit_price,
        })
    }
}

impl Keyed for Offer {
    type Key = OfferKey;
    type Change = OfferChange;

    fn key(&self) -> OfferKey {
        OfferKey {
            provider: self.provider.clone(),
            product: self.product.clone(),
        }
    }

    fn check_key(&self) -> Result<(), InvalidKey> {
        required_component(&self.product, "Product")?;
        required_component(&self.provider.name, "Provider name")?;
        self.provider.address.validate()
    }

    fn set_key(&mut self, change: OfferChange) -> Result<(), InvalidKey> {
        let key = self.preview_key(&change)?;
        self.provider = key.provider;
        self.product = key.product;
        Ok(())
    }

    fn preview_key(&self, change: &OfferChange) -> Result<OfferKey, InvalidKey> {
        match change {
            OfferChange::Provider(provider) => Ok(OfferKey {
                provider: provider.clone(),
                product: self.product.clone(),
            }),
            OfferChange::Product(product) => Ok(OfferKey {
                provider: self.provider.clone(),
                product: required_component(product, "Product")?,
            }),
        }
    }
}

impl LedgerEntity for Offer {
    const KIND: &'static str = "Offer";
}
