//! Offer collection

use crate::collection::{Keyed, OrderedCollection};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Offer, OfferChange, OfferKey};

/// Offers ordered by provider, then product
#[derive(Debug, Default)]
pub struct OfferCollection {
    inner: OrderedCollection<Offer>,
}

read_api!(OfferCollection, Offer, OfferKey);

impl OfferCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, offer: Offer) -> LedgerResult<OfferKey> {
        let key = offer.key();
        self.inner
            .insert(offer)
            .map_err(|e| LedgerError::from_collection(e, &key))?;
        Ok(key)
    }

    pub(crate) fn remove(&mut self, key: &OfferKey) -> LedgerResult<Offer> {
        self.inner
            .remove(key)
            .map_err(|e| LedgerError::from_collection(e, key))
    }

    /// Move an offer to another provider or product name
    ///
    /// Two offers for the same product from the same provider are never
    /// combined; the change is refused instead.
    pub(crate) fn redefine(&mut self, key: &OfferKey, change: OfferChange) -> LedgerResult<OfferKey> {
        self.inner
            .redefine_key(key, change)
            .map_err(|e| LedgerError::from_collection(e, key))
    }

    /// Update the unit price, which is not part of the key
    pub(crate) fn reprice(&mut self, key: &OfferKey, unit_price: Money) -> LedgerResult<()> {
        let offer = self
            .inner
            .search_mut(key)
            .map_err(|e| LedgerError::from_collection(e, key))?;
        offer.unit_price = unit_price;
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}
