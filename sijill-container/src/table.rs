//! Service table mapping names to slots.
//!
//! The table only stores slots. Building and caching happen inside each
//! [`Slot`], so the table lock is never held while a factory runs.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::key::ServiceKey;
use crate::service::Factory;
use crate::slot::Slot;

/// All registrations of one registry.
#[derive(Debug, Default)]
pub(crate) struct ServiceTable {
    slots: HashMap<ServiceKey, Arc<Slot>>,
}

impl ServiceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a fresh, unbuilt slot under `key`.
    ///
    /// Returns `true` if an existing slot (built or not) was replaced.
    pub fn insert(&mut self, key: ServiceKey, factory: Factory) -> bool {
        let slot = Arc::new(Slot::new(key.clone(), factory));
        let replaced = self.slots.insert(key.clone(), slot);

        match &replaced {
            Some(old) if old.is_built() => {
                debug!(service = %key, "Replaced service, cached instance discarded")
            }
            Some(_) => debug!(service = %key, "Replaced service"),
            None => debug!(service = %key, "Registered service"),
        }
        replaced.is_some()
    }

    /// Looks up a slot by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Slot>> {
        self.slots.get(name)
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registered names, sorted.
    pub fn keys(&self) -> Vec<ServiceKey> {
        let mut keys: Vec<_> = self.slots.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_factory() -> Factory {
        Factory::value(42i32)
    }

    #[test]
    fn insert_and_get() {
        let mut table = ServiceTable::new();
        assert!(!table.insert(ServiceKey::new("Db"), dummy_factory()));
        assert!(table.get("Db").is_some());
        assert!(table.get("Cache").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn insert_replaces_slot() {
        let mut table = ServiceTable::new();
        table.insert(ServiceKey::new("Db"), dummy_factory());
        let first = table.get("Db").cloned().unwrap();

        assert!(table.insert(ServiceKey::new("Db"), dummy_factory()));
        let second = table.get("Db").cloned().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn keys_are_sorted() {
        let mut table = ServiceTable::new();
        for name in ["c", "a", "b"] {
            table.insert(ServiceKey::new(name), dummy_factory());
        }
        assert_eq!(table.keys(), vec![ServiceKey::new("a"), ServiceKey::new("b"), ServiceKey::new("c")]);
    }

    #[test]
    fn empty_table() {
        let table = ServiceTable::new();
        assert!(table.is_empty());
        assert!(table.keys().is_empty());
    }
}
