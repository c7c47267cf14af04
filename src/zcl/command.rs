//! Attribute write command families
//!
//! A [`CommandFamily`] pins every field of a write command except the
//! attribute id and the value. Supporting another cluster or data type means
//! adding another named family here, not threading new literals through the
//! pipeline.

use super::{AccessMode, DataType, cluster, manufacturer};
use crate::attributes::AttributeWriteRequest;

/// Fixed shape shared by every command of one family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFamily {
    pub endpoint: u8,
    pub cluster_id: u16,
    pub manufacturer_code: u16,
    pub data_type: DataType,
    pub access: AccessMode,
}

/// Manufacturer-specific 8-bit unsigned attributes on the Basic cluster
pub const BASIC_MANUFACTURER_U8: CommandFamily = CommandFamily {
    endpoint: 0x01,
    cluster_id: cluster::BASIC,
    manufacturer_code: manufacturer::DRESDEN_ELEKTRONIK,
    data_type: DataType::Uint8,
    access: AccessMode::Write,
};

/// A protocol-ready attribute write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeWriteCommand {
    pub endpoint: u8,
    pub cluster_id: u16,
    pub manufacturer_code: u16,
    pub attribute_id: u16,
    pub data_type: DataType,
    pub access: AccessMode,
    pub value: u8,
}

impl CommandFamily {
    /// Build the write command for a validated request
    #[must_use]
    pub const fn build(&self, request: &AttributeWriteRequest) -> AttributeWriteCommand {
        AttributeWriteCommand {
            endpoint: self.endpoint,
            cluster_id: self.cluster_id,
            manufacturer_code: self.manufacturer_code,
            attribute_id: request.key,
            data_type: self.data_type,
            access: self.access,
            value: request.value,
        }
    }
}

impl AttributeWriteCommand {
    /// Whether the command targets a manufacturer-specific attribute
    #[must_use]
    pub const fn is_manufacturer_specific(&self) -> bool {
        self.manufacturer_code != 0
    }
}
