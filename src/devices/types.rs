//! Device registry types

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::Deserialize;

use crate::{Error, Result};

/// IEEE 802.15.4 extended address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IeeeAddress(pub u64);

impl IeeeAddress {
    /// Parse the colon form `00:15:8d:00:01:02:03:04`
    ///
    /// # Errors
    ///
    /// Returns error unless the input is exactly eight colon separated hex bytes
    pub fn parse(s: &str) -> Result<Self> {
        let mut value: u64 = 0;
        let mut count = 0;
        for part in s.split(':') {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(Error::InvalidAddress(s.to_string()));
            }
            let byte =
                u8::from_str_radix(part, 16).map_err(|_| Error::InvalidAddress(s.to_string()))?;
            value = (value << 8) | u64::from(byte);
            count += 1;
        }
        if count != 8 {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for IeeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// A device known to the gateway
#[derive(Debug, Clone)]
pub struct Device {
    /// Registry id used in REST paths (e.g. "1")
    pub id: String,
    pub name: Option<String>,
    pub ieee: IeeeAddress,
    /// Short network address
    pub nwk: u16,
    /// Application endpoint the device exposes
    pub endpoint: u8,
}

impl Device {
    /// Unique id in `<ieee>-<endpoint>` form
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("{}-{:02x}", self.ieee, self.endpoint)
    }
}

/// Borrowed view of a registry device for the duration of one request
///
/// Only the registry hands these out. Holders should drop the handle when
/// the request completes instead of caching it.
#[derive(Debug, Clone)]
pub struct DeviceHandle(Arc<Device>);

impl DeviceHandle {
    /// Wrap a registry-owned record; intended for [`super::DeviceRegistry`] implementations
    #[must_use]
    pub const fn new(device: Arc<Device>) -> Self {
        Self(device)
    }
}

impl Deref for DeviceHandle {
    type Target = Device;

    fn deref(&self) -> &Device {
        &self.0
    }
}

/// Registration entry for a device, as read from configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRegistration {
    /// Explicit registry id; assigned sequentially when absent
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// IEEE address in colon form
    pub ieee: String,
    pub nwk: u16,
    #[serde(default = "default_endpoint")]
    pub endpoint: u8,
}

const fn default_endpoint() -> u8 {
    0x01
}
