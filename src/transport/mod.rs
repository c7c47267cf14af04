//! Asynchronous device transport
//!
//! The write pipeline talks to the radio through [`AttributeTransport`].
//! Submission is synchronous and only reports whether the transport took the
//! command; transmission and any device acknowledgment happen later, out of
//! band, and are never reported back through this seam.

mod queue;
mod sink;

use std::fmt;

pub use queue::{DEFAULT_QUEUE_CAPACITY, QueueTransport, RetryPolicy};
pub use sink::{FrameSink, LogSink, SinkError};

use crate::devices::{DeviceHandle, IeeeAddress};
use crate::zcl::AttributeWriteCommand;

/// Result of handing a command to the transport
///
/// `Accepted` means the transport owns the command now. It says nothing about
/// whether the device received or applied the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl DispatchOutcome {
    /// Whether the transport took the command
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Why the transport refused a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No queue is attached for the device
    UnknownDevice,
    /// The device queue is at capacity
    QueueFull,
    /// The device link has gone away
    LinkDown,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnknownDevice => "unknown device",
            Self::QueueFull => "queue full",
            Self::LinkDown => "link down",
        };
        f.write_str(s)
    }
}

/// Submission seam for attribute writes
///
/// Implementations must not block on the device. Ordering between two
/// submissions for the same device is whatever the implementation provides;
/// callers get no FIFO guarantee from this trait.
pub trait AttributeTransport: Send + Sync {
    fn submit_write(&self, device: &DeviceHandle, command: &AttributeWriteCommand)
    -> DispatchOutcome;
}

/// APS data request carrying one ZCL frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApsFrame {
    pub dst_ieee: IeeeAddress,
    pub dst_nwk: u16,
    pub dst_endpoint: u8,
    pub src_endpoint: u8,
    pub profile_id: u16,
    pub cluster_id: u16,
    pub payload: Vec<u8>,
}
