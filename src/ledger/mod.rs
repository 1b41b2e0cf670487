//! The ledger aggregate
//!
//! `Ledger` owns one collection per entity and is the only way to change
//! them. Offers and acquisitions embed their provider's key, so any change to
//! a provider key (rename, relocation, a territory rename) is applied as a
//! cascade:
//!
//! 1. preview the new provider key and refuse on collision;
//! 2. walk the dependent collections without modifying them and push
//!    `(old key, updated record)` pairs onto a [`SimpleStack`];
//! 3. redefine the provider;
//! 4. drain the stacks, replaying `remove(old key)` + insert for each record.
//!
//! Every check happens before step 3, so a refused cascade changes nothing.

/// Shared read-only surface of the entity collections
macro_rules! read_api {
    ($collection:ident, $entity:ty, $key:ty) => {
        impl $collection {
            /// Number of records
            pub fn len(&self) -> usize {
                self.inner.len()
            }

            pub fn is_empty(&self) -> bool {
                self.inner.is_empty()
            }

            pub fn contains(&self, key: &$key) -> bool {
                self.inner.contains(key)
            }

            /// Look up a record by key
            pub fn get(&self, key: &$key) -> $crate::error::LedgerResult<&$entity> {
                self.inner
                    .search(key)
                    .map_err(|e| $crate::error::LedgerError::from_collection(e, key))
            }

            /// Visit records in key order (descending when `reverse` is set)
            pub fn for_each<F: FnMut(&$entity)>(&self, reverse: bool, visitor: F) {
                self.inner.for_each(reverse, visitor);
            }

            /// Iterate over records in key order
            pub fn iter(&self) -> impl Iterator<Item = &$entity> + '_ {
                self.inner.iter()
            }

            #[cfg(test)]
            pub(crate) fn check_invariants(&self) {
                self.inner.check_invariants();
            }
        }
    };
}

mod acquisitions;
mod offers;
mod providers;
mod snapshot;

pub use acquisitions::{AcquisitionCollection, Recorded, Redefined};
pub use offers::OfferCollection;
pub use providers::ProviderCollection;
pub use snapshot::{LedgerSnapshot, SNAPSHOT_SCHEMA_VERSION};

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::collection::{required_component, Keyed, SimpleStack};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Acquisition, AcquisitionChange, AcquisitionKey, Address, Money, Offer, OfferChange, OfferKey,
    Provider, ProviderChange, ProviderKey,
};

/// Records touched by a cascading update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub providers_moved: usize,
    pub offers_moved: usize,
    pub acquisitions_moved: usize,
    /// Lines folded into an existing line on the way
    pub acquisitions_merged: usize,
}

impl CascadeReport {
    fn add(&mut self, other: CascadeReport) {
        self.providers_moved += other.providers_moved;
        self.offers_moved += other.offers_moved;
        self.acquisitions_moved += other.acquisitions_moved;
        self.acquisitions_merged += other.acquisitions_merged;
    }
}

/// City -> neighborhood -> streets
pub type TerritoryMap = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// Providers, offers and acquisitions kept consistent with each other
#[derive(Debug, Default)]
pub struct Ledger {
    providers: ProviderCollection,
    offers: OfferCollection,
    acquisitions: AcquisitionCollection,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn providers(&self) -> &ProviderCollection {
        &self.providers
    }

    pub fn offers(&self) -> &OfferCollection {
        &self.offers
    }

    pub fn acquisitions(&self) -> &AcquisitionCollection {
        &self.acquisitions
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty() && self.offers.is_empty() && self.acquisitions.is_empty()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.acquisitions.clear();
        self.offers.clear();
        self.providers.clear();
    }

    // --- creation -------------------------------------------------------

    pub fn add_provider(&mut self, provider: Provider) -> LedgerResult<ProviderKey> {
        self.providers.insert(provider)
    }

    /// Add an offer for an existing provider
    pub fn add_offer(&mut self, offer: Offer) -> LedgerResult<OfferKey> {
        self.require_provider(&offer.provider)?;
        self.offers.insert(offer)
    }

    /// Record a purchase; a line with the same date, provider and product
    /// absorbs its quantity
    pub fn record_acquisition(&mut self, line: Acquisition) -> LedgerResult<Recorded> {
        self.require_provider(&line.provider)?;
        self.acquisitions.record(line)
    }

    fn require_provider(&self, key: &ProviderKey) -> LedgerResult<()> {
        if self.providers.contains(key) {
            Ok(())
        } else {
            Err(LedgerError::provider_not_found(key.to_string()))
        }
    }

    // --- providers ------------------------------------------------------

    /// Change a provider key field and carry every dependent record along
    pub fn redefine_provider(
        &mut self,
        key: &ProviderKey,
        change: ProviderChange,
    ) -> LedgerResult<(ProviderKey, CascadeReport)> {
        let candidate = self.providers.preview(key, &change)?;
        if candidate == *key {
            return Ok((candidate, CascadeReport::default()));
        }

        let mut offers = SimpleStack::new();
        for offer in self.offers.iter().filter(|o| o.provider == *key) {
            let mut updated = offer.clone();
            updated.set_key(OfferChange::Provider(candidate.clone()))?;
            if self.offers.contains(&updated.key()) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Offer",
                    identifier: updated.key().to_string(),
                });
            }
            offers.push((offer.key(), updated));
        }

        let mut lines = SimpleStack::new();
        for line in self.acquisitions.iter().filter(|l| l.provider == *key) {
            let mut updated = line.clone();
            updated.set_key(AcquisitionChange::Provider(candidate.clone()))?;
            lines.push((line.key(), updated));
        }

        let new_key = self.providers.redefine(key, change)?;
        let mut report = CascadeReport {
            providers_moved: 1,
            ..CascadeReport::default()
        };

        while let Some((old_key, offer)) = offers.pop() {
            self.offers.remove(&old_key)?;
            self.offers.insert(offer)?;
            report.offers_moved += 1;
        }

        while let Some((old_key, line)) = lines.pop() {
            self.acquisitions.remove(&old_key)?;
            match self.acquisitions.record(line)? {
                Recorded::Inserted(_) => report.acquisitions_moved += 1,
                Recorded::Merged(_) => report.acquisitions_merged += 1,
            }
        }

        Ok((new_key, report))
    }

    pub fn rename_provider(&mut self, key: &ProviderKey, name: &str) -> LedgerResult<(ProviderKey, CascadeReport)> {
        self.redefine_provider(key, ProviderChange::Name(name.to_string()))
    }

    pub fn move_provider(&mut self, key: &ProviderKey, address: Address) -> LedgerResult<(ProviderKey, CascadeReport)> {
        self.redefine_provider(key, ProviderChange::Address(address))
    }

    /// Remove a provider
    ///
    /// Without `cascade`, a provider that still has offers or acquisitions is
    /// kept and `Dependents` is returned. With it, the dependents go first.
    /// Returns the provider and the number of dependents removed.
    pub fn remove_provider(&mut self, key: &ProviderKey, cascade: bool) -> LedgerResult<(Provider, usize)> {
        self.providers.get(key)?;

        let mut offers: SimpleStack<OfferKey> = self
            .offers
            .iter()
            .filter(|o| o.provider == *key)
            .map(|o| o.key())
            .collect();
        let mut lines: SimpleStack<AcquisitionKey> = self
            .acquisitions
            .iter()
            .filter(|l| l.provider == *key)
            .map(|l| l.key())
            .collect();

        let dependents = offers.len() + lines.len();
        if dependents > 0 && !cascade {
            return Err(LedgerError::Dependents {
                entity_type: "Provider",
                identifier: key.to_string(),
                count: dependents,
            });
        }

        while let Some(offer) = offers.pop() {
            self.offers.remove(&offer)?;
        }
        while let Some(line) = lines.pop() {
            self.acquisitions.remove(&line)?;
        }

        let provider = self.providers.remove(key)?;
        Ok((provider, dependents))
    }

    // --- offers ---------------------------------------------------------

    /// Change an offer key field; a new provider must exist
    pub fn redefine_offer(&mut self, key: &OfferKey, change: OfferChange) -> LedgerResult<OfferKey> {
        if let OfferChange::Provider(provider) = &change {
            self.require_provider(provider)?;
        }
        self.offers.redefine(key, change)
    }

    pub fn move_offer(&mut self, key: &OfferKey, provider: ProviderKey) -> LedgerResult<OfferKey> {
        self.redefine_offer(key, OfferChange::Provider(provider))
    }

    pub fn rename_offer_product(&mut self, key: &OfferKey, product: &str) -> LedgerResult<OfferKey> {
        self.redefine_offer(key, OfferChange::Product(product.to_string()))
    }

    pub fn reprice_offer(&mut self, key: &OfferKey, unit_price: Money) -> LedgerResult<()> {
        self.offers.reprice(key, unit_price)
    }

    pub fn remove_offer(&mut self, key: &OfferKey) -> LedgerResult<Offer> {
        self.offers.remove(key)
    }

    // --- acquisitions ---------------------------------------------------

    /// Change an acquisition key field, merging on collision; a new
    /// counterparty must exist
    pub fn redefine_acquisition(&mut self, key: &AcquisitionKey, change: AcquisitionChange) -> LedgerResult<Redefined> {
        match change {
            AcquisitionChange::Provider(provider) => {
                self.require_provider(&provider)?;
                self.acquisitions.set_provider(key, provider)
            }
            AcquisitionChange::Product(product) => self.acquisitions.set_product(key, &product),
            AcquisitionChange::Date(date) => self.acquisitions.set_date(key, date),
        }
    }

    pub fn move_acquisition(&mut self, key: &AcquisitionKey, provider: ProviderKey) -> LedgerResult<Redefined> {
        self.redefine_acquisition(key, AcquisitionChange::Provider(provider))
    }

    pub fn rename_acquisition_product(&mut self, key: &AcquisitionKey, product: &str) -> LedgerResult<Redefined> {
        self.redefine_acquisition(key, AcquisitionChange::Product(product.to_string()))
    }

    pub fn redate_acquisition(&mut self, key: &AcquisitionKey, date: NaiveDate) -> LedgerResult<Redefined> {
        self.redefine_acquisition(key, AcquisitionChange::Date(date))
    }

    pub fn remove_acquisition(&mut self, key: &AcquisitionKey) -> LedgerResult<Acquisition> {
        self.acquisitions.remove(key)
    }

    // --- territories ----------------------------------------------------

    /// Rename a city for every provider located in it
    pub fn rename_city(&mut self, city: &str, new_city: &str) -> LedgerResult<CascadeReport> {
        let city = city.trim();
        let change = ProviderChange::City(required_component(new_city, "City")?);
        self.cascade_territory("City", city.to_string(), |a| a.city == city, change)
    }

    /// Rename a neighborhood of a city for every provider located in it
    pub fn rename_neighborhood(
        &mut self,
        city: &str,
        neighborhood: &str,
        new_neighborhood: &str,
    ) -> LedgerResult<CascadeReport> {
        let (city, neighborhood) = (city.trim(), neighborhood.trim());
        let change = ProviderChange::Neighborhood(required_component(new_neighborhood, "Neighborhood")?);
        self.cascade_territory(
            "Neighborhood",
            format!("{}, {}", neighborhood, city),
            |a| a.city == city && a.neighborhood == neighborhood,
            change,
        )
    }

    /// Rename a street of a neighborhood for every provider located on it
    pub fn rename_street(
        &mut self,
        city: &str,
        neighborhood: &str,
        street: &str,
        new_street: &str,
    ) -> LedgerResult<CascadeReport> {
        let (city, neighborhood, street) = (city.trim(), neighborhood.trim(), street.trim());
        let change = ProviderChange::Street(required_component(new_street, "Street")?);
        self.cascade_territory(
            "Street",
            format!("{}, {}, {}", street, neighborhood, city),
            |a| a.city == city && a.neighborhood == neighborhood && a.street == street,
            change,
        )
    }

    fn cascade_territory<F>(
        &mut self,
        kind: &'static str,
        identifier: String,
        matches: F,
        change: ProviderChange,
    ) -> LedgerResult<CascadeReport>
    where
        F: Fn(&Address) -> bool,
    {
        let mut affected = SimpleStack::new();
        for provider in self.providers.iter().filter(|p| matches(&p.address)) {
            let key = provider.key();
            self.providers.preview(&key, &change)?;
            affected.push(key);
        }

        if affected.is_empty() {
            return Err(LedgerError::NotFound {
                entity_type: kind,
                identifier,
            });
        }

        let mut report = CascadeReport::default();
        while let Some(key) = affected.pop() {
            let (_, moved) = self.redefine_provider(&key, change.clone())?;
            report.add(moved);
        }
        Ok(report)
    }

    /// Every city, neighborhood and street a provider is located in
    pub fn territories(&self) -> TerritoryMap {
        let mut map = TerritoryMap::new();
        self.providers.for_each(false, |provider| {
            let address = &provider.address;
            map.entry(address.city.clone())
                .or_default()
                .entry(address.neighborhood.clone())
                .or_default()
                .insert(address.street.clone());
        });
        map
    }

    // --- reports --------------------------------------------------------

    pub fn offers_of(&self, provider: &ProviderKey) -> Vec<&Offer> {
        self.offers.iter().filter(|o| o.provider == *provider).collect()
    }

    pub fn acquisitions_of(&self, provider: &ProviderKey) -> Vec<&Acquisition> {
        self.acquisitions
            .iter()
            .filter(|l| l.provider == *provider)
            .collect()
    }

    /// Total spent per provider
    pub fn spending_by_provider(&self) -> BTreeMap<ProviderKey, Money> {
        let mut totals = BTreeMap::new();
        self.acquisitions.for_each(false, |line| {
            *totals.entry(line.provider.clone()).or_insert_with(Money::zero) += line.total();
        });
        totals
    }

    pub fn total_spent(&self) -> Money {
        self.acquisitions.iter().map(Acquisition::total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: &str, neighborhood: &str, street: &str) -> Address {
        Address::new(city, neighborhood, street).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    /// Two providers in Lima, one in Cusco, each with an offer and a purchase
    fn sample() -> (Ledger, ProviderKey, ProviderKey, ProviderKey) {
        let mut ledger = Ledger::new();
        let bodega = ledger
            .add_provider(Provider::new("Bodega", address("Lima", "Centro", "Jr. Lampa")).unwrap())
            .unwrap();
        let tambo = ledger
            .add_provider(Provider::new("Tambo", address("Lima", "Lince", "Av. Arequipa")).unwrap())
            .unwrap();
        let mercado = ledger
            .add_provider(Provider::new("Mercado", address("Cusco", "San Blas", "Cuesta")).unwrap())
            .unwrap();

        for (provider, price) in [(&bodega, 120), (&tambo, 150), (&mercado, 90)] {
            ledger
                .add_offer(Offer::new(provider.clone(), "Rice", Money::from_cents(price)).unwrap())
                .unwrap();
            ledger
                .record_acquisition(
                    Acquisition::new(day(1), provider.clone(), "Rice", 2, Money::from_cents(price)).unwrap(),
                )
                .unwrap();
        }

        (ledger, bodega, tambo, mercado)
    }

    fn check(ledger: &Ledger) {
        ledger.providers.check_invariants();
        ledger.offers.check_invariants();
        ledger.acquisitions.check_invariants();
        for offer in ledger.offers.iter() {
            assert!(ledger.providers.contains(&offer.provider), "dangling offer");
        }
        for line in ledger.acquisitions.iter() {
            assert!(ledger.providers.contains(&line.provider), "dangling acquisition");
        }
    }

    #[test]
    fn test_rename_provider_cascades() {
        let (mut ledger, bodega, _, _) = sample();

        let (renamed, report) = ledger.rename_provider(&bodega, "Bodega Lampa").unwrap();

        assert_eq!(renamed.name, "Bodega Lampa");
        assert_eq!(report.providers_moved, 1);
        assert_eq!(report.offers_moved, 1);
        assert_eq!(report.acquisitions_moved, 1);
        assert!(!ledger.providers().contains(&bodega));
        assert!(ledger.offers_of(&bodega).is_empty());
        assert_eq!(ledger.offers_of(&renamed).len(), 1);
        assert_eq!(ledger.acquisitions_of(&renamed)[0].quantity, 2);
        check(&ledger);
    }

    #[test]
    fn test_rename_provider_conflict_changes_nothing() {
        let (mut ledger, bodega, _, _) = sample();
        ledger
            .add_provider(Provider::new("Tambo", address("Lima", "Centro", "Jr. Lampa")).unwrap())
            .unwrap();

        let err = ledger.rename_provider(&bodega, "Tambo").unwrap_err();

        assert!(err.is_duplicate());
        assert!(ledger.providers().contains(&bodega));
        assert_eq!(ledger.offers_of(&bodega).len(), 1);
        assert_eq!(ledger.acquisitions_of(&bodega).len(), 1);
        check(&ledger);
    }

    #[test]
    fn test_rename_to_same_key_is_a_no_op() {
        let (mut ledger, bodega, _, _) = sample();
        let (key, report) = ledger.rename_provider(&bodega, " Bodega ").unwrap();
        assert_eq!(key, bodega);
        assert_eq!(report, CascadeReport::default());
    }

    #[test]
    fn test_move_acquisition_merges_into_existing_line() {
        let (mut ledger, bodega, tambo, _) = sample();
        let moving = ledger.acquisitions_of(&bodega)[0].key();
        let occupant = ledger.acquisitions_of(&tambo)[0].key();

        let outcome = ledger.move_acquisition(&moving, tambo.clone()).unwrap();

        assert_eq!(outcome, Redefined::Merged(occupant.clone()));
        assert_eq!(ledger.acquisitions().get(&occupant).unwrap().quantity, 4);
        assert!(!ledger.acquisitions().contains(&moving));
        assert_eq!(ledger.acquisitions().len(), 2);
        check(&ledger);
    }

    #[test]
    fn test_move_acquisition_to_unknown_provider() {
        let (mut ledger, bodega, _, _) = sample();
        let moving = ledger.acquisitions_of(&bodega)[0].key();
        let ghost = ProviderKey::new("Ghost", address("Lima", "Centro", "Jr. Lampa")).unwrap();

        let err = ledger.move_acquisition(&moving, ghost).unwrap_err();
        assert!(err.is_not_found());
        assert!(ledger.acquisitions().contains(&moving));
    }

    #[test]
    fn test_rename_city_moves_every_provider_in_it() {
        let (mut ledger, bodega, tambo, mercado) = sample();

        let report = ledger.rename_city("Lima", "Lima Metropolitana").unwrap();

        assert_eq!(report.providers_moved, 2);
        assert_eq!(report.offers_moved, 2);
        assert_eq!(report.acquisitions_moved, 2);
        assert!(!ledger.providers().contains(&bodega));
        assert!(!ledger.providers().contains(&tambo));
        assert!(ledger.providers().contains(&mercado));

        let territories = ledger.territories();
        assert!(territories.contains_key("Lima Metropolitana"));
        assert!(!territories.contains_key("Lima"));
        check(&ledger);
    }

    #[test]
    fn test_rename_city_collision_changes_nothing() {
        let (mut ledger, bodega, tambo, _) = sample();
        // Same name and street as Bodega, already in the target city.
        ledger
            .add_provider(Provider::new("Bodega", address("Callao", "Centro", "Jr. Lampa")).unwrap())
            .unwrap();

        let err = ledger.rename_city("Lima", "Callao").unwrap_err();

        assert!(err.is_duplicate());
        assert!(ledger.providers().contains(&bodega));
        assert!(ledger.providers().contains(&tambo));
        assert_eq!(ledger.providers().len(), 4);
        check(&ledger);
    }

    #[test]
    fn test_rename_unknown_territory() {
        let (mut ledger, _, _, _) = sample();
        let err = ledger.rename_street("Lima", "Centro", "Jr. Nowhere", "Jr. Somewhere").unwrap_err();
        assert!(err.is_not_found());
        assert!(ledger.rename_city("Lima", " ").unwrap_err().is_validation());
    }

    #[test]
    fn test_rename_neighborhood_and_street() {
        let (mut ledger, bodega, _, _) = sample();

        ledger.rename_neighborhood("Lima", "Centro", "Cercado").unwrap();
        let moved = ProviderKey::new("Bodega", address("Lima", "Cercado", "Jr. Lampa")).unwrap();
        assert!(ledger.providers().contains(&moved));
        assert!(!ledger.providers().contains(&bodega));

        let report = ledger
            .rename_street("Lima", "Cercado", "Jr. Lampa", "Jr. Lampa 2")
            .unwrap();
        assert_eq!(report.providers_moved, 1);
        assert_eq!(ledger.offers().iter().filter(|o| o.provider.address.street == "Jr. Lampa 2").count(), 1);
        check(&ledger);
    }

    #[test]
    fn test_remove_provider_with_dependents() {
        let (mut ledger, bodega, _, _) = sample();

        let err = ledger.remove_provider(&bodega, false).unwrap_err();
        assert!(matches!(err, LedgerError::Dependents { count: 2, .. }));
        assert!(ledger.providers().contains(&bodega));

        let (removed, dependents) = ledger.remove_provider(&bodega, true).unwrap();
        assert_eq!(removed.name, "Bodega");
        assert_eq!(dependents, 2);
        assert_eq!(ledger.offers().len(), 2);
        assert_eq!(ledger.acquisitions().len(), 2);
        check(&ledger);
    }

    #[test]
    fn test_add_offer_requires_provider() {
        let mut ledger = Ledger::new();
        let ghost = ProviderKey::new("Ghost", address("Lima", "Centro", "Jr. Lampa")).unwrap();
        let err = ledger
            .add_offer(Offer::new(ghost, "Rice", Money::zero()).unwrap())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_offer_product_conflict_is_refused() {
        let (mut ledger, bodega, _, _) = sample();
        let rice = ledger.offers_of(&bodega)[0].key();
        ledger
            .add_offer(Offer::new(bodega.clone(), "Beans", Money::from_cents(80)).unwrap())
            .unwrap();

        let err = ledger.rename_offer_product(&rice, "Beans").unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(ledger.offers_of(&bodega).len(), 2);
    }

    #[test]
    fn test_spending_report() {
        let (ledger, bodega, tambo, mercado) = sample();
        let spending = ledger.spending_by_provider();
        assert_eq!(spending[&bodega], Money::from_cents(240));
        assert_eq!(spending[&tambo], Money::from_cents(300));
        assert_eq!(spending[&mercado], Money::from_cents(180));
        assert_eq!(ledger.total_spent(), Money::from_cents(720));
    }

    #[test]
    fn test_redate_then_record_again_merges() {
        let (mut ledger, bodega, _, _) = sample();
        let key = ledger.acquisitions_of(&bodega)[0].key();
        let moved = ledger.redate_acquisition(&key, day(2)).unwrap();
        assert!(matches!(moved, Redefined::Moved(_)));

        let outcome = ledger
            .record_acquisition(Acquisition::new(day(2), bodega.clone(), "Rice", 3, Money::from_cents(120)).unwrap())
            .unwrap();
        assert_eq!(outcome, Recorded::Merged(moved.key().clone()));
        assert_eq!(ledger.acquisitions().get(moved.key()).unwrap().quantity, 5);
    }
}
