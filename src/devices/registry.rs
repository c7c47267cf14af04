//! Sensor registry for resolving REST identifiers to devices

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::{Device, DeviceHandle, DeviceRegistration, IeeeAddress};
use crate::{Error, Result};

/// Lookup seam between the write pipeline and whatever owns device records
pub trait DeviceRegistry: Send + Sync {
    /// Resolve an external identifier, `None` when no device matches
    fn resolve(&self, external_id: &str) -> Option<DeviceHandle>;
}

/// In-memory registry of known devices
#[derive(Debug, Default)]
pub struct SensorRegistry {
    devices: RwLock<BTreeMap<String, Arc<Device>>>,
}

impl SensorRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device and return a handle to it
    ///
    /// # Errors
    ///
    /// Returns error if the IEEE address is malformed, or the id or IEEE
    /// address is already registered
    pub fn register(&self, registration: DeviceRegistration) -> Result<DeviceHandle> {
        let ieee = IeeeAddress::parse(&registration.ieee)?;
        let mut devices = self.devices.write();

        if devices.values().any(|d| d.ieee == ieee) {
            return Err(Error::DuplicateDevice(ieee.to_string()));
        }

        let id = match registration.id {
            Some(id) if devices.contains_key(&id) => return Err(Error::DuplicateDevice(id)),
            Some(id) => id,
            None => next_free_id(&devices),
        };

        let device = Arc::new(Device {
            id: id.clone(),
            name: registration.name,
            ieee,
            nwk: registration.nwk,
            endpoint: registration.endpoint,
        });
        devices.insert(id, Arc::clone(&device));
        Ok(DeviceHandle::new(device))
    }

    /// Remove a device by registry id
    pub fn remove(&self, id: &str) -> Option<Arc<Device>> {
        self.devices.write().remove(id)
    }

    /// Snapshot of all registered devices
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Device>> {
        self.devices.read().values().cloned().collect()
    }

    /// Number of registered devices
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

impl DeviceRegistry for SensorRegistry {
    /// Matches the registry id first, then the unique id, then the IEEE address
    fn resolve(&self, external_id: &str) -> Option<DeviceHandle> {
        let devices = self.devices.read();
        if let Some(device) = devices.get(external_id) {
            return Some(DeviceHandle::new(Arc::clone(device)));
        }

        let ieee = IeeeAddress::parse(external_id).ok();
        devices
            .values()
            .find(|d| {
                d.unique_id().eq_ignore_ascii_case(external_id) || ieee.is_some_and(|a| a == d.ieee)
            })
            .map(|d| DeviceHandle::new(Arc::clone(d)))
    }
}

/// Lowest positive integer id not yet taken
fn next_free_id(devices: &BTreeMap<String, Arc<Device>>) -> String {
    (1_u32..)
        .map(|n| n.to_string())
        .find(|id| !devices.contains_key(id))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(ieee: &str) -> DeviceRegistration {
        DeviceRegistration {
            id: None,
            name: Some("Hallway sensor".to_string()),
            ieee: ieee.to_string(),
            nwk: 0x4a21,
            endpoint: 0x01,
        }
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let registry = SensorRegistry::new();
        let a = registry.register(registration("00:15:8d:00:00:00:00:01")).unwrap();
        let b = registry.register(registration("00:15:8d:00:00:00:00:02")).unwrap();

        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_rejects_duplicates() {
        let registry = SensorRegistry::new();
        registry.register(registration("00:15:8d:00:00:00:00:01")).unwrap();

        assert!(matches!(
            registry.register(registration("00:15:8d:00:00:00:00:01")),
            Err(Error::DuplicateDevice(_))
        ));

        let mut same_id = registration("00:15:8d:00:00:00:00:02");
        same_id.id = Some("1".to_string());
        assert!(registry.register(same_id).is_err());
    }

    #[test]
    fn register_rejects_bad_address() {
        let registry = SensorRegistry::new();
        assert!(matches!(
            registry.register(registration("not-an-address")),
            Err(Error::InvalidAddress(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn resolve_by_id_unique_id_and_ieee() {
        let registry = SensorRegistry::new();
        registry.register(registration("00:15:8d:00:01:02:03:04")).unwrap();

        assert_eq!(registry.resolve("1").unwrap().nwk, 0x4a21);
        assert_eq!(
            registry.resolve("00:15:8D:00:01:02:03:04-01").unwrap().id,
            "1"
        );
        assert_eq!(registry.resolve("00:15:8d:00:01:02:03:04").unwrap().id, "1");
        assert!(registry.resolve("2").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn remove_frees_id() {
        let registry = SensorRegistry::new();
        registry.register(registration("00:15:8d:00:00:00:00:01")).unwrap();
        registry.register(registration("00:15:8d:00:00:00:00:02")).unwrap();

        assert!(registry.remove("1").is_some());
        assert!(registry.resolve("1").is_none());

        let c = registry.register(registration("00:15:8d:00:00:00:00:03")).unwrap();
        assert_eq!(c.id, "1");
    }
}
