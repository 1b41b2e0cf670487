//! Provider service
//!
//! Creation, lookup, renames, relocations and removal of providers. Renames
//! and relocations carry every offer and acquisition along with the provider.

use std::fmt;

use crate::audit::{AuditEntry, EntityType};
use crate::collection::Keyed;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::CascadeReport;
use crate::models::{Address, Money, Offer, Provider, ProviderKey};
use crate::storage::Storage;

use super::with_cascade;

/// Picks a provider from user input: a name plus as much of the address as
/// needed to make it unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSelector {
    pub name: String,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub street: Option<String>,
}

impl ProviderSelector {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn matches(&self, key: &ProviderKey) -> bool {
        fn part(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f.trim() == value)
        }

        key.name == self.name.trim()
            && part(&self.city, &key.address.city)
            && part(&self.neighborhood, &key.address.neighborhood)
            && part(&self.street, &key.address.street)
    }
}

impl fmt::Display for ProviderSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.trim())?;
        let parts: Vec<&str> = [&self.street, &self.neighborhood, &self.city]
            .into_iter()
            .filter_map(|p| p.as_deref().map(str::trim))
            .collect();
        if !parts.is_empty() {
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

/// A provider with figures computed from the rest of the ledger
#[derive(Debug, Clone)]
pub struct ProviderSummary {
    pub provider: Provider,
    pub offer_count: usize,
    pub acquisition_count: usize,
    /// Sum of all acquisitions from this provider
    pub spent: Money,
}

/// Service for provider management
pub struct ProviderService<'a> {
    storage: &'a mut Storage,
}

impl<'a> ProviderService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Create a new provider
    pub fn create(&mut self, name: &str, address: Address, phone: Option<&str>) -> LedgerResult<Provider> {
        let mut provider = Provider::new(name, address)?;
        if let Some(phone) = phone {
            provider = provider.with_phone(phone);
        }

        let key = self.storage.ledger.add_provider(provider.clone())?;
        self.storage.save_all()?;
        self.storage
            .log_create(EntityType::Provider, key.to_string(), &provider)?;

        Ok(provider)
    }

    pub fn get(&self, key: &ProviderKey) -> LedgerResult<&Provider> {
        self.storage.ledger.providers().get(key)
    }

    /// Find the single provider matching `selector`
    pub fn resolve(&self, selector: &ProviderSelector) -> LedgerResult<ProviderKey> {
        let matches: Vec<ProviderKey> = self
            .storage
            .ledger
            .providers()
            .iter()
            .map(|p| p.key())
            .filter(|key| selector.matches(key))
            .collect();

        match matches.as_slice() {
            [] => Err(LedgerError::provider_not_found(selector.to_string())),
            [key] => Ok(key.clone()),
            many => Err(LedgerError::Validation(format!(
                "'{}' matches {} providers; narrow it down with --city, --neighborhood or --street",
                selector,
                many.len()
            ))),
        }
    }

    /// Every provider in key order, with offer and spending figures
    pub fn list(&self) -> Vec<ProviderSummary> {
        let spending = self.storage.ledger.spending_by_provider();

        self.storage
            .ledger
            .providers()
            .iter()
            .map(|provider| {
                let spent = spending.get(&provider.key()).copied().unwrap_or_default();
                self.summarize(provider, spent)
            })
            .collect()
    }

    /// One provider with its offer and spending figures
    pub fn summary(&self, key: &ProviderKey) -> LedgerResult<ProviderSummary> {
        let provider = self.get(key)?;
        let spent = self
            .storage
            .ledger
            .acquisitions_of(key)
            .iter()
            .map(|line| line.total())
            .sum();
        Ok(self.summarize(provider, spent))
    }

    /// Offers published by a provider
    pub fn offers(&self, key: &ProviderKey) -> Vec<&Offer> {
        self.storage.ledger.offers_of(key)
    }

    fn summarize(&self, provider: &Provider, spent: Money) -> ProviderSummary {
        let key = provider.key();
        ProviderSummary {
            provider: provider.clone(),
            offer_count: self.storage.ledger.offers_of(&key).len(),
            acquisition_count: self.storage.ledger.acquisitions_of(&key).len(),
            spent,
        }
    }

    /// Give a provider a new name
    pub fn rename(&mut self, key: &ProviderKey, name: &str) -> LedgerResult<(Provider, CascadeReport)> {
        let before = self.get(key)?.clone();
        let (new_key, report) = self.storage.ledger.rename_provider(key, name)?;
        self.finish_update(before, &new_key, report)
    }

    /// Move a provider to another address; components left as `None` keep
    /// their current value
    pub fn relocate(
        &mut self,
        key: &ProviderKey,
        city: Option<&str>,
        neighborhood: Option<&str>,
        street: Option<&str>,
    ) -> LedgerResult<(Provider, CascadeReport)> {
        if city.is_none() && neighborhood.is_none() && street.is_none() {
            return Err(LedgerError::Validation(
                "Nothing to change: give a new city, neighborhood or street".into(),
            ));
        }

        let before = self.get(key)?.clone();
        let mut address = before.address.clone();
        if let Some(city) = city {
            address = address.with_city(city)?;
        }
        if let Some(neighborhood) = neighborhood {
            address = address.with_neighborhood(neighborhood)?;
        }
        if let Some(street) = street {
            address = address.with_street(street)?;
        }

        let (new_key, report) = self.storage.ledger.move_provider(key, address)?;
        self.finish_update(before, &new_key, report)
    }

    /// Remove a provider; with `cascade`, its offers and acquisitions go too
    ///
    /// Returns the removed provider and how many dependents were removed.
    pub fn delete(&mut self, key: &ProviderKey, cascade: bool) -> LedgerResult<(Provider, usize)> {
        let offers: Vec<_> = self.storage.ledger.offers_of(key).into_iter().cloned().collect();
        let lines: Vec<_> = self
            .storage
            .ledger
            .acquisitions_of(key)
            .into_iter()
            .cloned()
            .collect();

        let (provider, dependents) = self.storage.ledger.remove_provider(key, cascade)?;
        self.storage.save_all()?;

        let mut entries: Vec<AuditEntry> = offers
            .iter()
            .map(|o| AuditEntry::delete(EntityType::Offer, o.key().to_string(), o))
            .collect();
        entries.extend(
            lines
                .iter()
                .map(|l| AuditEntry::delete(EntityType::Acquisition, l.key().to_string(), l)),
        );
        entries.push(AuditEntry::delete(EntityType::Provider, key.to_string(), &provider));
        self.storage.log_batch(&entries)?;

        Ok((provider, dependents))
    }

    fn finish_update(
        &mut self,
        before: Provider,
        new_key: &ProviderKey,
        report: CascadeReport,
    ) -> LedgerResult<(Provider, CascadeReport)> {
        let after = self.get(new_key)?.clone();
        if report.providers_moved == 0 {
            return Ok((after, report));
        }

        self.storage.save_all()?;
        let entry = AuditEntry::update(EntityType::Provider, before.key().to_string(), &before, &after);
        self.storage.log_batch(&[with_cascade(entry, &report)])?;

        Ok((after, report))
    }
}
