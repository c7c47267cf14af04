//! ZCL (Zigbee Cluster Library) definitions
//!
//! Only the pieces the write path needs: cluster and manufacturer
//! constants, attribute data types, and the command families built on them.

pub mod command;
pub mod frame;

pub use command::{AttributeWriteCommand, BASIC_MANUFACTURER_U8, CommandFamily};
pub use frame::{encode_write_attributes, frame_control};

/// ZCL cluster IDs
pub mod cluster {
    pub const BASIC: u16 = 0x0000;
}

/// Manufacturer codes used for proprietary attribute extensions
pub mod manufacturer {
    /// dresden elektronik
    pub const DRESDEN_ELEKTRONIK: u16 = 0x115F;
}

/// Application profiles
pub mod profile {
    /// Zigbee Home Automation
    pub const HOME_AUTOMATION: u16 = 0x0104;
}

/// ZCL global command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GlobalCommand {
    WriteAttributes = 0x02,
}

impl GlobalCommand {
    /// Command identifier byte
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// ZCL attribute data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    Uint8 = 0x20,
}

impl DataType {
    /// Wire tag for this type
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// How a command family touches an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Write,
}

impl AccessMode {
    /// Global command carrying this access on the wire
    #[must_use]
    pub const fn command(self) -> GlobalCommand {
        match self {
            Self::Write => GlobalCommand::WriteAttributes,
        }
    }
}
