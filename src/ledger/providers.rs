//! Provider collection
//!
//! Providers never merge: a rename or relocation onto an occupied key is
//! reported as a duplicate and nothing changes.

use crate::collection::{Keyed, OrderedCollection};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Provider, ProviderChange, ProviderKey};

/// Providers ordered by name, then address
#[derive(Debug, Default)]
pub struct ProviderCollection {
    inner: OrderedCollection<Provider>,
}

read_api!(ProviderCollection, Provider, ProviderKey);

impl ProviderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key `change` would give the provider at `key`
    ///
    /// Fails exactly when [`redefine`](Self::redefine) would, without
    /// modifying anything.
    pub fn preview(&self, key: &ProviderKey, change: &ProviderChange) -> LedgerResult<ProviderKey> {
        let provider = self.get(key)?;
        let candidate = provider.preview_key(change)?;
        if candidate != *key {
            if let Ok(existing) = self.inner.search(&candidate) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Provider",
                    identifier: existing.key().to_string(),
                });
            }
        }
        Ok(candidate)
    }

    pub(crate) fn insert(&mut self, provider: Provider) -> LedgerResult<ProviderKey> {
        let key = provider.key();
        self.inner
            .insert(provider)
            .map_err(|e| LedgerError::from_collection(e, &key))?;
        Ok(key)
    }

    pub(crate) fn remove(&mut self, key: &ProviderKey) -> LedgerResult<Provider> {
        self.inner
            .remove(key)
            .map_err(|e| LedgerError::from_collection(e, key))
    }

    pub(crate) fn redefine(&mut self, key: &ProviderKey, change: ProviderChange) -> LedgerResult<ProviderKey> {
        self.inner
            .redefine_key(key, change)
            .map_err(|e| LedgerError::from_collection(e, key))
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn provider(name: &str, street: &str) -> Provider {
        Provider::new(name, Address::new("Lima", "Centro", street).unwrap()).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let mut providers = ProviderCollection::new();
        let key = providers.insert(provider("Bodega", "Jr. Lampa")).unwrap();

        assert_eq!(providers.len(), 1);
        assert_eq!(providers.get(&key).unwrap().name, "Bodega");
    }

    #[test]
    fn test_duplicate_insert() {
        let mut providers = ProviderCollection::new();
        providers.insert(provider("Bodega", "Jr. Lampa")).unwrap();
        let err = providers.insert(provider("Bodega", "Jr. Lampa")).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(providers.len(), 1);
    }

    #[test]
    fn test_preview_detects_collision() {
        let mut providers = ProviderCollection::new();
        let a = providers.insert(provider("Bodega", "Jr. Lampa")).unwrap();
        providers.insert(provider("Bodega", "Jr. Cusco")).unwrap();

        let err = providers
            .preview(&a, &ProviderChange::Street("Jr. Cusco".into()))
            .unwrap_err();
        assert!(err.is_duplicate());

        let err = providers
            .redefine(&a, ProviderChange::Street("Jr. Cusco".into()))
            .unwrap_err();
        assert!(err.is_duplicate());
        assert!(providers.contains(&a));
    }

    #[test]
    fn test_redefine_renames() {
        let mut providers = ProviderCollection::new();
        let a = providers.insert(provider("Bodega", "Jr. Lampa")).unwrap();

        let b = providers
            .redefine(&a, ProviderChange::Name("Bodega Lampa".into()))
            .unwrap();

        assert!(!providers.contains(&a));
        assert_eq!(providers.get(&b).unwrap().name, "Bodega Lampa");
    }

    #[test]
    fn test_get_missing() {
        let providers = ProviderCollection::new();
        let key = provider("Nobody", "Jr. Lampa").key();
        assert!(providers.get(&key).unwrap_err().is_not_found());
    }
}
