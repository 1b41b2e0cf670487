//! Territory model
//!
//! An address places a provider in a city, a neighborhood of that city and a
//! street. All three components are part of the provider's key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collection::{required_component, InvalidKey};

/// City / neighborhood / street triple
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}

impl Address {
    /// Build an address, trimming and validating every component
    pub fn new(
        city: impl AsRef<str>,
        neighborhood: impl AsRef<str>,
        street: impl AsRef<str>,
    ) -> Result<Self, InvalidKey> {
        Ok(Self {
            city: required_component(city.as_ref(), "City")?,
            neighborhood: required_component(neighborhood.as_ref(), "Neighborhood")?,
            street: required_component(street.as_ref(), "Street")?,
        })
    }

    /// Re-check components of an address built without `new` (e.g. deserialized)
    pub fn validate(&self) -> Result<(), InvalidKey> {
        Self::new(&self.city, &self.neighborhood, &self.street).map(|_| ())
    }

    /// Copy with a different city
    pub fn with_city(&self, city: &str) -> Result<Self, InvalidKey> {
        Ok(Self {
            city: required_component(city, "City")?,
            ..self.clone()
        })
    }

    /// Copy with a different neighborhood
    pub fn with_neighborhood(&self, neighborhood: &str) -> Result<Self, InvalidKey> {
        Ok(Self {
            neighborhood: required_component(neighborhood, "Neighborhood")?,
            ..self.clone()
        })
    }

    /// Copy with a different street
    pub fn with_street(&self, street: &str) -> Result<Self, InvalidKey> {
        Ok(Self {
            street: required_component(street, "Street")?,
            ..self.clone()
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.street, self.neighborhood, self.city)
    }
}
