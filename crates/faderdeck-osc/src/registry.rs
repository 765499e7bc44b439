//! Bounded table of subscriber addresses.

use parking_lot::Mutex;
use thiserror::Error;

pub const DEFAULT_CLIENT_CAPACITY: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("client registry is full ({capacity} slots)")]
    Full { capacity: usize },
}

/// Fixed-capacity, deduplicated list of subscriber addresses. Slots are
/// stable: removing a client frees its slot for the next registration
/// without shifting anyone else.
pub struct ClientRegistry {
    slots: Mutex<Vec<Option<String>>>,
}

impl ClientRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; capacity.max(1)]),
        }
    }

    /// Registers an address and returns its slot index. Re-adding an address
    /// that is already present returns its existing index.
    pub fn add_client(&self, address: &str) -> Result<usize, RegistryError> {
        let mut slots = self.slots.lock();
        if let Some(index) = slots
            .iter()
            .position(|slot| slot.as_deref() == Some(address))
        {
            return Ok(index);
        }
        match slots.iter().position(Option::is_none) {
            Some(index) => {
                slots[index] = Some(address.to_owned());
                tracing::info!(%address, index, "osc client registered");
                Ok(index)
            }
            None => Err(RegistryError::Full {
                capacity: slots.len(),
            }),
        }
    }

    /// Removes an address if present; absent addresses are a no-op.
    pub fn remove_client(&self, address: &str) {
        let mut slots = self.slots.lock();
        if let Some(index) = slots
            .iter()
            .position(|slot| slot.as_deref() == Some(address))
        {
            slots[index] = None;
            tracing::info!(%address, index, "osc client removed");
        }
    }

    /// Snapshot of the registered addresses, in slot order.
    pub fn clients(&self) -> Vec<String> {
        self.slots.lock().iter().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn clear(&self) {
        self.slots.lock().fill(None);
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_adding_returns_the_existing_slot() {
        let registry = ClientRegistry::new(4);
        let first = registry.add_client("192.168.1.10").unwrap();
        let second = registry.add_client("192.168.1.10").unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn full_registry_reports_capacity() {
        let registry = ClientRegistry::new(2);
        registry.add_client("a").unwrap();
        registry.add_client("b").unwrap();
        assert_eq!(
            registry.add_client("c"),
            Err(RegistryError::Full { capacity: 2 })
        );
    }

    #[test]
    fn removed_slots_are_reused() {
        let registry = ClientRegistry::new(2);
        registry.add_client("a").unwrap();
        registry.add_client("b").unwrap();

        registry.remove_client("a");
        registry.remove_client("not-there");
        assert_eq!(registry.len(), 1);

        let index = registry.add_client("c").unwrap();
        assert_eq!(index, 0, "freed slot comes back first");
    }

    #[test]
    fn clear_empties_every_slot() {
        let registry = ClientRegistry::default();
        registry.add_client("a").unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.capacity(), DEFAULT_CLIENT_CAPACITY);
    }
}
