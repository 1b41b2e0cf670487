//! Acquisition collection
//!
//! Ledger lines are quantity-bearing, so a line that would land on an occupied
//! key is merged into the occupant instead of being refused: the occupant
//! absorbs the moving line's quantity and the moving line disappears.

use chrono::NaiveDate;

use crate::collection::{CollectionError, Keyed, OrderedCollection};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Acquisition, AcquisitionChange, AcquisitionKey, ProviderKey};

/// Where a newly recorded line ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// Stored as a new line
    Inserted(AcquisitionKey),
    /// Folded into the existing line with the same key
    Merged(AcquisitionKey),
}

impl Recorded {
    pub fn key(&self) -> &AcquisitionKey {
        match self {
            Self::Inserted(key) | Self::Merged(key) => key,
        }
    }
}

/// Where a redefined line ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redefined {
    /// The line now lives under this key
    Moved(AcquisitionKey),
    /// The line was folded into the line at this key and no longer exists
    Merged(AcquisitionKey),
}

impl Redefined {
    /// The key holding the quantity after the change
    pub fn key(&self) -> &AcquisitionKey {
        match self {
            Self::Moved(key) | Self::Merged(key) => key,
        }
    }
}

/// Acquisitions in ledger (date) order
#[derive(Debug, Default)]
pub struct AcquisitionCollection {
    inner: OrderedCollection<Acquisition>,
}

read_api!(AcquisitionCollection, Acquisition, AcquisitionKey);

impl AcquisitionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line, failing if its key is taken
    pub(crate) fn insert(&mut self, line: Acquisition) -> LedgerResult<AcquisitionKey> {
        let key = line.key();
        self.inner
            .insert(line)
            .map_err(|e| LedgerError::from_collection(e, &key))?;
        Ok(key)
    }

    /// Insert a line, merging it into an existing line with the same key
    pub(crate) fn record(&mut self, line: Acquisition) -> LedgerResult<Recorded> {
        let key = line.key();
        if !self.inner.contains(&key) {
            return self.insert(line).map(Recorded::Inserted);
        }
        self.inner
            .search_mut(&key)
            .map_err(|e| LedgerError::from_collection(e, &key))?
            .absorb(&line);
        Ok(Recorded::Merged(key))
    }

    pub(crate) fn remove(&mut self, key: &AcquisitionKey) -> LedgerResult<Acquisition> {
        self.inner
            .remove(key)
            .map_err(|e| LedgerError::from_collection(e, key))
    }

    /// Change a key field of the line at `key`, merging on collision
    pub(crate) fn redefine(&mut self, key: &AcquisitionKey, change: AcquisitionChange) -> LedgerResult<Redefined> {
        match self.inner.redefine_key(key, change) {
            Ok(new_key) => Ok(Redefined::Moved(new_key)),
            Err(CollectionError::KeyConflict { existing }) => {
                let target = existing.key();
                let moving = self
                    .inner
                    .search(key)
                    .map_err(|e| LedgerError::from_collection(e, key))?
                    .clone();
                self.inner
                    .search_mut(&target)
                    .map_err(|e| LedgerError::from_collection(e, &target))?
                    .absorb(&moving);
                self.remove(key)?;
                Ok(Redefined::Merged(target))
            }
            Err(err) => Err(LedgerError::from_collection(err, key)),
        }
    }

    /// Move a line to another counterparty
    pub(crate) fn set_provider(&mut self, key: &AcquisitionKey, provider: ProviderKey) -> LedgerResult<Redefined> {
        self.redefine(key, AcquisitionChange::Provider(provider))
    }

    /// Rename the product on a line
    pub(crate) fn set_product(&mut self, key: &AcquisitionKey, product: &str) -> LedgerResult<Redefined> {
        self.redefine(key, AcquisitionChange::Product(product.to_string()))
    }

    /// Move a line to another date
    pub(crate) fn set_date(&mut self, key: &AcquisitionKey, date: NaiveDate) -> LedgerResult<Redefined> {
        self.redefine(key, AcquisitionChange::Date(date))
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}
