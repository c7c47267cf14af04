//! Device registry
//!
//! Devices are registered from configuration and looked up by the REST
//! identifier a client puts in the request path

pub mod registry;
pub mod types;

pub use registry::{DeviceRegistry, SensorRegistry};
pub use types::{Device, DeviceHandle, DeviceRegistration, IeeeAddress};
