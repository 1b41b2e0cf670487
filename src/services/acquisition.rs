//! Acquisition service
//!
//! Recording and correcting ledger lines. A line that lands on the key of an
//! existing line (same date, provider and product) is merged into it; the
//! audit log records that as a merge.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::collection::Keyed;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Recorded, Redefined};
use crate::models::{Acquisition, AcquisitionChange, AcquisitionKey, Money, OfferKey, ProviderKey};
use crate::storage::Storage;

/// Service for acquisition management
pub struct AcquisitionService<'a> {
    storage: &'a mut Storage,
}

impl<'a> AcquisitionService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Record a purchase, merging into an existing line with the same key
    ///
    /// Returns where the line ended up and the stored line.
    pub fn record(&mut self, line: Acquisition) -> LedgerResult<(Recorded, Acquisition)> {
        if line.quantity == 0 {
            return Err(LedgerError::Validation("Quantity must be at least 1".into()));
        }

        let key = line.key();
        let occupant = self.storage.ledger.acquisitions().get(&key).ok().cloned();
        ensure_total_fits(line.unit_price, Some(line.quantity))?;
        if let Some(occupant) = &occupant {
            ensure_total_fits(occupant.unit_price, occupant.quantity.checked_add(line.quantity))?;
        }
        let recorded = self.storage.ledger.record_acquisition(line)?;
        let stored = self.get(recorded.key())?.clone();

        self.storage.save_all()?;
        match occupant {
            Some(before) => self
                .storage
                .log_merge(EntityType::Acquisition, key.to_string(), &before, &stored)?,
            None => self
                .storage
                .log_create(EntityType::Acquisition, key.to_string(), &stored)?,
        }

        Ok((recorded, stored))
    }

    pub fn get(&self, key: &AcquisitionKey) -> LedgerResult<&Acquisition> {
        self.storage.ledger.acquisitions().get(key)
    }

    /// Unit price of the provider's offer for `product`
    pub fn offered_price(&self, provider: &ProviderKey, product: &str) -> LedgerResult<Money> {
        let key = OfferKey {
            provider: provider.clone(),
            product: product.trim().to_string(),
        };
        self.storage
            .ledger
            .offers()
            .get(&key)
            .map(|offer| offer.unit_price)
    }

    /// Lines in ledger order, optionally limited to a provider and date range
    pub fn list(
        &self,
        provider: Option<&ProviderKey>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<&Acquisition> {
        self.storage
            .ledger
            .acquisitions()
            .iter()
            .filter(|l| provider.map_or(true, |p| l.provider == *p))
            .filter(|l| from.map_or(true, |d| l.date >= d))
            .filter(|l| to.map_or(true, |d| l.date <= d))
            .collect()
    }

    /// Move a line to another counterparty
    pub fn move_to(&mut self, key: &AcquisitionKey, provider: ProviderKey) -> LedgerResult<(Redefined, Acquisition)> {
        self.redefine(key, AcquisitionChange::Provider(provider))
    }

    pub fn rename(&mut self, key: &AcquisitionKey, product: &str) -> LedgerResult<(Redefined, Acquisition)> {
        self.redefine(key, AcquisitionChange::Product(product.to_string()))
    }

    pub fn redate(&mut self, key: &AcquisitionKey, date: NaiveDate) -> LedgerResult<(Redefined, Acquisition)> {
        self.redefine(key, AcquisitionChange::Date(date))
    }

    pub fn delete(&mut self, key: &AcquisitionKey) -> LedgerResult<Acquisition> {
        let line = self.storage.ledger.remove_acquisition(key)?;
        self.storage.save_all()?;
        self.storage
            .log_delete(EntityType::Acquisition, key.to_string(), &line)?;
        Ok(line)
    }

    fn redefine(&mut self, key: &AcquisitionKey, change: AcquisitionChange) -> LedgerResult<(Redefined, Acquisition)> {
        let before = self.get(key)?.clone();
        let target = before.preview_key(&change)?;
        let occupant = if target == *key {
            None
        } else {
            self.storage.ledger.acquisitions().get(&target).ok().cloned()
        };
        if let Some(occupant) = &occupant {
            ensure_total_fits(occupant.unit_price, occupant.quantity.checked_add(before.quantity))?;
        }

        let outcome = self.storage.ledger.redefine_acquisition(key, change)?;
        let stored = self.get(outcome.key())?.clone();
        if outcome.key() == key {
            return Ok((outcome, stored));
        }

        self.storage.save_all()?;
        let entries = match occupant {
            Some(occupant) => vec![
                AuditEntry::delete(EntityType::Acquisition, key.to_string(), &before),
                AuditEntry::merge(EntityType::Acquisition, target.to_string(), &occupant, &stored),
            ],
            None => vec![AuditEntry::update(
                EntityType::Acquisition,
                key.to_string(),
                &before,
                &stored,
            )],
        };
        self.storage.log_batch(&entries)?;

        Ok((outcome, stored))
    }
}

/// Refuse a line whose quantity or total would not fit
fn ensure_total_fits(unit_price: Money, quantity: Option<u32>) -> LedgerResult<()> {
    match quantity.and_then(|q| unit_price.checked_times(q)) {
        Some(_) => Ok(()),
        None => Err(LedgerError::Validation(format!(
            "Line total out of range at unit price {}",
            unit_price
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Address, Offer, Provider};
    use crate::services::test_support::storage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn provider(storage: &mut Storage, name: &str) -> ProviderKey {
        let address = Address::new("Piura", "Castilla", "Av. Grau").unwrap();
        storage
            .ledger
            .add_provider(Provider::new(name, address).unwrap())
            .unwrap()
    }

    fn line(provider: &ProviderKey, date: NaiveDate, quantity: u32) -> Acquisition {
        Acquisition::new(date, provider.clone(), "Lemons", quantity, Money::from_cents(25)).unwrap()
    }

    #[test]
    fn test_record_then_merge() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        let mut service = AcquisitionService::new(&mut storage);

        let (first, _) = service.record(line(&market, day(1), 12)).unwrap();
        let (second, stored) = service.record(line(&market, day(1), 6)).unwrap();

        assert!(matches!(first, Recorded::Inserted(_)));
        assert!(matches!(second, Recorded::Merged(_)));
        assert_eq!(stored.quantity, 18);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries[1].operation, Operation::Merge);
        assert_eq!(entries[1].diff_summary.as_deref(), Some("quantity: 12 -> 18"));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        let err = AcquisitionService::new(&mut storage)
            .record(line(&market, day(1), 0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_total_out_of_range_is_rejected() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        let price = Money::parse("50000000000").unwrap();
        let huge = Acquisition::new(day(1), market.clone(), "Gold", 2_000_000, price).unwrap();

        let err = AcquisitionService::new(&mut storage).record(huge).unwrap_err();
        assert!(err.is_validation());
        assert!(storage.ledger.acquisitions().is_empty());
    }

    #[test]
    fn test_merge_out_of_range_changes_nothing() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        let price = Money::parse("50000000000").unwrap();
        let mut service = AcquisitionService::new(&mut storage);

        let gold = |date| Acquisition::new(date, market.clone(), "Gold", 1_000_000, price).unwrap();
        let (kept, _) = service.record(gold(day(1))).unwrap();
        let (moving, _) = service.record(gold(day(2))).unwrap();

        assert!(service.record(gold(day(1))).unwrap_err().is_validation());
        assert!(service.redate(moving.key(), day(1)).unwrap_err().is_validation());
        assert_eq!(service.get(kept.key()).unwrap().quantity, 1_000_000);
        assert_eq!(service.get(moving.key()).unwrap().quantity, 1_000_000);
    }

    #[test]
    fn test_move_to_counterparty_merges() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        let stall = provider(&mut storage, "Puesto 12");
        let mut service = AcquisitionService::new(&mut storage);

        let (moving, _) = service.record(line(&market, day(3), 2)).unwrap();
        service.record(line(&stall, day(3), 5)).unwrap();

        let (outcome, stored) = service.move_to(moving.key(), stall.clone()).unwrap();

        assert!(matches!(outcome, Redefined::Merged(_)));
        assert_eq!(stored.quantity, 7);
        assert_eq!(service.list(None, None, None).len(), 1);

        let entries = storage.audit().read_all().unwrap();
        let tail: Vec<_> = entries[2..].iter().map(|e| e.operation).collect();
        assert_eq!(tail, [Operation::Delete, Operation::Merge]);
    }

    #[test]
    fn test_redate_and_filters() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        let mut service = AcquisitionService::new(&mut storage);

        let (recorded, _) = service.record(line(&market, day(1), 2)).unwrap();
        service.record(line(&market, day(5), 1)).unwrap();
        let (outcome, _) = service.redate(recorded.key(), day(9)).unwrap();

        assert_eq!(outcome.key().date, day(9));
        assert_eq!(service.list(None, Some(day(2)), None).len(), 2);
        assert_eq!(service.list(Some(&market), None, Some(day(5))).len(), 1);
    }

    #[test]
    fn test_offered_price() {
        let (mut storage, _temp) = storage();
        let market = provider(&mut storage, "Mercado");
        storage
            .ledger
            .add_offer(Offer::new(market.clone(), "Lemons", Money::from_cents(20)).unwrap())
            .unwrap();
        let service = AcquisitionService::new(&mut storage);

        assert_eq!(service.offered_price(&market, " Lemons ").unwrap(), Money::from_cents(20));
        assert!(service.offered_price(&market, "Limes").unwrap_err().is_not_found());
    }
}
