//! Shared test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use attribute_gateway::devices::DeviceRegistration;
use attribute_gateway::zcl::AttributeWriteCommand;
use attribute_gateway::{
    AttributeTransport, AttributeWriter, DeviceHandle, DeviceRegistry, DispatchOutcome,
    SensorRegistry,
};
use parking_lot::Mutex;

/// IEEE address of the device registered as id "1"
pub const KNOWN_IEEE: &str = "00:15:8d:00:01:02:03:04";

/// One recorded transport submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub device_id: String,
    pub command: AttributeWriteCommand,
}

/// Transport double that records every submission and answers a fixed outcome
pub struct SpyTransport {
    outcome: DispatchOutcome,
    submissions: Mutex<Vec<Submission>>,
}

impl SpyTransport {
    pub fn new(outcome: DispatchOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            submissions: Mutex::new(Vec::new()),
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(DispatchOutcome::Accepted)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.submissions.lock().len()
    }
}

impl AttributeTransport for SpyTransport {
    fn submit_write(
        &self,
        device: &DeviceHandle,
        command: &AttributeWriteCommand,
    ) -> DispatchOutcome {
        self.submissions.lock().push(Submission {
            device_id: device.id.clone(),
            command: *command,
        });
        self.outcome
    }
}

/// Registry wrapper that counts lookups
pub struct CountingRegistry {
    inner: SensorRegistry,
    lookups: AtomicUsize,
}

impl CountingRegistry {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DeviceRegistry for CountingRegistry {
    fn resolve(&self, external_id: &str) -> Option<DeviceHandle> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(external_id)
    }
}

/// Registry holding a single device with id "1"
pub fn test_registry() -> Arc<CountingRegistry> {
    let inner = SensorRegistry::new();
    inner
        .register(DeviceRegistration {
            id: Some("1".to_string()),
            name: Some("Test sensor".to_string()),
            ieee: KNOWN_IEEE.to_string(),
            nwk: 0x4a21,
            endpoint: 0x01,
        })
        .expect("failed to register test device");
    Arc::new(CountingRegistry {
        inner,
        lookups: AtomicUsize::new(0),
    })
}

/// Writer wired to the given doubles
pub fn test_writer(
    registry: Arc<CountingRegistry>,
    transport: Arc<SpyTransport>,
) -> AttributeWriter {
    AttributeWriter::new(registry, transport)
}
