//! Provider model
//!
//! A provider is an organization the user buys from. Its key is its name plus
//! its full address, so two branches of the same chain in different places
//! are distinct providers. Offers and acquisitions embed the provider key,
//! which is why every change to it has to cascade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::address::Address;
use super::LedgerEntity;
use crate::collection::{required_component, InvalidKey, Keyed};

/// Key of a provider: name first, then territory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderKey {
    pub name: String,
    pub address: Address,
}

impl ProviderKey {
    pub fn new(name: impl AsRef<str>, address: Address) -> Result<Self, InvalidKey> {
        Ok(Self {
            name: required_component(name.as_ref(), "Provider name")?,
            address,
        })
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// A change to one of the provider's key fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChange {
    Name(String),
    City(String),
    Neighborhood(String),
    Street(String),
    Address(Address),
}

/// An organization offering products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Display name
    pub name: String,

    /// Where the provider is located
    pub address: Address,

    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// When the provider was created
    pub created_at: DateTime<Utc>,

    /// When the provider was last modified
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Create a new provider
    pub fn new(name: impl AsRef<str>, address: Address) -> Result<Self, InvalidKey> {
        let now = Utc::now();
        Ok(Self {
            name: required_component(name.as_ref(), "Provider name")?,
            address,
            phone: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach a contact phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        let phone = phone.into();
        self.phone = if phone.trim().is_empty() {
            None
        } else {
            Some(phone.trim().to_string())
        };
        self
    }
}

impl Keyed for Provider {
    type Key = ProviderKey;
    type Change = ProviderChange;

    fn key(&self) -> ProviderKey {
        ProviderKey {
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }

    fn check_key(&self) -> Result<(), InvalidKey> {
        required_component(&self.name, "Provider name")?;
        self.address.validate()
    }

    fn set_key(&mut self, change: ProviderChange) -> Result<(), InvalidKey> {
        let key = self.preview_key(&change)?;
        self.name = key.name;
        self.address = key.address;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn preview_key(&self, change: &ProviderChange) -> Result<ProviderKey, InvalidKey> {
        match change {
            ProviderChange::Name(name) => ProviderKey::new(name, self.address.clone()),
            ProviderChange::City(city) => Ok(ProviderKey {
                name: self.name.clone(),
                address: self.address.with_city(city)?,
            }),
            ProviderChange::Neighborhood(neighborhood) => Ok(ProviderKey {
                name: self.name.clone(),
                address: self.address.with_neighborhood(neighborhood)?,
            }),
            ProviderChange::Street(street) => Ok(ProviderKey {
                name: self.name.clone(),
                address: self.address.with_street(street)?,
            }),
            ProviderChange::Address(address) => {
                address.validate()?;
                Ok(ProviderKey {
                    name: self.name.clone(),
                    address: address.clone(),
                })
            }
        }
    }
}

impl LedgerEntity for Provider {
    const KIND: &'static str = "Provider";
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
