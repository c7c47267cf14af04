//! Attribute Gateway - REST bridge for writing Zigbee device attributes
//!
//! A client posts `{"key", "value"}` to `/api/{api_key}/attributes/{id}`;
//! the gateway validates it, resolves the device, builds a manufacturer
//! specific ZCL Write Attributes command and queues it for the radio.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     HTTP API                         │
//! │      POST /api/{key}/attributes/{id}  │  /health     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Write pipeline                      │
//! │ validate → resolve → build → dispatch → format       │
//! └──────────┬─────────────────────────────┬────────────┘
//!            │                             │
//! ┌──────────▼──────────┐      ┌───────────▼────────────┐
//! │   Device registry   │      │   Queue transport      │
//! │   id / unique id    │      │   per-device queues    │
//! └─────────────────────┘      └───────────┬────────────┘
//!                                          │
//!                               ┌──────────▼────────────┐
//!                               │  Frame sink (radio)   │
//!                               └───────────────────────┘
//! ```
//!
//! A successful response only means the command was queued. Device-side
//! acknowledgment is outside what the gateway reports.

pub mod api;
pub mod attributes;
pub mod config;
pub mod daemon;
pub mod devices;
pub mod error;
pub mod transport;
pub mod zcl;

pub use attributes::{AttributeWriter, WriteResponse};
pub use config::Config;
pub use daemon::Daemon;
pub use devices::{DeviceHandle, DeviceRegistry, SensorRegistry};
pub use error::{Error, Result};
pub use transport::{AttributeTransport, DispatchOutcome, QueueTransport, RejectReason};
