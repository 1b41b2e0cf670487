//! Offer service

use crate::audit::{AuditEntry, EntityType};
use crate::collection::Keyed;
use crate::error::LedgerResult;
use crate::models::{Money, Offer, OfferChange, OfferKey, ProviderKey};
use crate::storage::Storage;

/// Service for offer management
pub struct OfferService<'a> {
    storage: &'a mut Storage,
}

impl<'a> OfferService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Key of the offer for `product` from `provider`
    pub fn key(provider: ProviderKey, product: &str) -> OfferKey {
        OfferKey {
            provider,
            product: product.trim().to_string(),
        }
    }

    /// Publish a new offer for an existing provider
    pub fn create(&mut self, provider: ProviderKey, product: &str, unit_price: Money) -> LedgerResult<Offer> {
        let offer = Offer::new(provider, product, unit_price)?;
        let key = self.storage.ledger.add_offer(offer.clone())?;
        self.storage.save_all()?;
        self.storage.log_create(EntityType::Offer, key.to_string(), &offer)?;
        Ok(offer)
    }

    pub fn get(&self, key: &OfferKey) -> LedgerResult<&Offer> {
        self.storage.ledger.offers().get(key)
    }

    /// Offers in key order, optionally limited to one provider
    pub fn list(&self, provider: Option<&ProviderKey>) -> Vec<&Offer> {
        match provider {
            Some(provider) => self.storage.ledger.offers_of(provider),
            None => self.storage.ledger.offers().iter().collect(),
        }
    }

    /// Move an offer to another provider
    pub fn move_to(&mut self, key: &OfferKey, provider: ProviderKey) -> LedgerResult<Offer> {
        self.redefine(key, OfferChange::Provider(provider))
    }

    /// Rename the product of an offer
    pub fn rename(&mut self, key: &OfferKey, product: &str) -> LedgerResult<Offer> {
        self.redefine(key, OfferChange::Product(product.to_string()))
    }

    pub fn reprice(&mut self, key: &OfferKey, unit_price: Money) -> LedgerResult<Offer> {
        let before = self.get(key)?.clone();
        self.storage.ledger.reprice_offer(key, unit_price)?;
        let after = self.get(key)?.clone();

        self.storage.save_all()?;
        self.storage
            .log_update(EntityType::Offer, key.to_string(), &before, &after)?;
        Ok(after)
    }

    pub fn delete(&mut self, key: &OfferKey) -> LedgerResult<Offer> {
        let offer = self.storage.ledger.remove_offer(key)?;
        self.storage.save_all()?;
        self.storage.log_delete(EntityType::Offer, key.to_string(), &offer)?;
        Ok(offer)
    }

    fn redefine(&mut self, key: &OfferKey, change: OfferChange) -> LedgerResult<Offer> {
        let before = self.get(key)?.clone();
        let new_key = self.storage.ledger.redefine_offer(key, change)?;
        let after = self.get(&new_key)?.clone();
        if new_key == *key {
            return Ok(after);
        }

        self.storage.save_all()?;
        self.storage.log_batch(&[AuditEntry::update(
            EntityType::Offer,
            before.key().to_string(),
            &before,
            &after,
        )])?;
        Ok(after)
    }
}
