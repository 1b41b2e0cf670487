//! Territory service
//!
//! Cities, neighborhoods and streets are not stored on their own; they are
//! the address components of providers. Renaming one relocates every
//! provider in it, with their offers and acquisitions.

use serde_json::{Map, Value};

use crate::audit::{AuditEntry, EntityType};
use crate::error::LedgerResult;
use crate::ledger::{CascadeReport, TerritoryMap};
use crate::storage::Storage;

use super::with_cascade;

/// Service for territory renames
pub struct TerritoryService<'a> {
    storage: &'a mut Storage,
}

impl<'a> TerritoryService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// City -> neighborhood -> streets, for every provider location
    pub fn list(&self) -> TerritoryMap {
        self.storage.ledger.territories()
    }

    pub fn rename_city(&mut self, city: &str, new_city: &str) -> LedgerResult<CascadeReport> {
        let report = self.storage.ledger.rename_city(city, new_city)?;
        self.finish("city", city.trim().to_string(), city, new_city, report)
    }

    pub fn rename_neighborhood(
        &mut self,
        city: &str,
        neighborhood: &str,
        new_neighborhood: &str,
    ) -> LedgerResult<CascadeReport> {
        let report = self
            .storage
            .ledger
            .rename_neighborhood(city, neighborhood, new_neighborhood)?;
        let id = format!("{}, {}", neighborhood.trim(), city.trim());
        self.finish("neighborhood", id, neighborhood, new_neighborhood, report)
    }

    pub fn rename_street(
        &mut self,
        city: &str,
        neighborhood: &str,
        street: &str,
        new_street: &str,
    ) -> LedgerResult<CascadeReport> {
        let report = self
            .storage
            .ledger
            .rename_street(city, neighborhood, street, new_street)?;
        let id = format!("{}, {}, {}", street.trim(), neighborhood.trim(), city.trim());
        self.finish("street", id, street, new_street, report)
    }

    fn finish(
        &mut self,
        level: &str,
        id: String,
        old: &str,
        new: &str,
        report: CascadeReport,
    ) -> LedgerResult<CascadeReport> {
        if report.providers_moved == 0 {
            return Ok(report);
        }

        self.storage.save_all()?;
        let entry = AuditEntry::update(
            EntityType::Territory,
            id,
            &component(level, old),
            &component(level, new),
        );
        self.storage.log_batch(&[with_cascade(entry, &report)])?;
        Ok(report)
    }
}

fn component(level: &str, value: &str) -> Value {
    let mut map = Map::new();
    map.insert(level.to_string(), Value::from(value.trim()));
    Value::Object(map)
}
