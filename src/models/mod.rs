//! Core data models for the ledger
//!
//! Providers (located in a territory), the offers they publish and the
//! acquisitions recorded against them.

pub mod acquisition;
pub mod address;
pub mod money;
pub mod offer;
pub mod provider;

use std::fmt::Display;

use crate::collection::Keyed;

pub use acquisition::{Acquisition, AcquisitionChange, AcquisitionKey};
pub use address::Address;
pub use money::{Money, MoneyParseError};
pub use offer::{Offer, OfferChange, OfferKey};
pub use provider::{Provider, ProviderChange, ProviderKey};

/// A keyed record kept by the ledger
pub trait LedgerEntity: Keyed<Key: Display> {
    /// Entity name used in errors and audit entries
    const KIND: &'static str;
}
