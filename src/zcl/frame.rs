//! ZCL frame encoding for Write Attributes

use super::AttributeWriteCommand;

/// Frame control bits
mod fc {
    pub const PROFILE_WIDE: u8 = 0x00;
    pub const MANUFACTURER_SPECIFIC: u8 = 0x04;
    pub const CLIENT_TO_SERVER: u8 = 0x00;
    pub const DISABLE_DEFAULT_RESPONSE: u8 = 0x10;
}

/// Frame control byte for a write command
#[must_use]
pub const fn frame_control(cmd: &AttributeWriteCommand) -> u8 {
    let mut control = fc::PROFILE_WIDE | fc::CLIENT_TO_SERVER | fc::DISABLE_DEFAULT_RESPONSE;
    if cmd.is_manufacturer_specific() {
        control |= fc::MANUFACTURER_SPECIFIC;
    }
    control
}

/// Encode a single-record Write Attributes frame
///
/// Layout: frame control, manufacturer code (LE, only when manufacturer
/// specific), sequence number, command id (from the access mode), attribute
/// id (LE), data type, value.
#[must_use]
pub fn encode_write_attributes(cmd: &AttributeWriteCommand, seq: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(9);
    buf.push(frame_control(cmd));
    if cmd.is_manufacturer_specific() {
        buf.extend_from_slice(&cmd.manufacturer_code.to_le_bytes());
    }
    buf.push(seq);
    buf.push(cmd.access.command().id());
    buf.extend_from_slice(&cmd.attribute_id.to_le_bytes());
    buf.push(cmd.data_type.tag());
    buf.push(cmd.value);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeWriteRequest;
    use crate::zcl::{AccessMode, BASIC_MANUFACTURER_U8, GlobalCommand};

    fn command(key: u16, value: u8) -> AttributeWriteCommand {
        BASIC_MANUFACTURER_U8.build(&AttributeWriteRequest {
            external_id: "7".to_string(),
            key,
            value,
        })
    }

    #[test]
    fn manufacturer_specific_frame_layout() {
        let frame = encode_write_attributes(&command(0x0005, 0x01), 0x2A);
        assert_eq!(
            frame,
            vec![0x14, 0x5F, 0x11, 0x2A, 0x02, 0x05, 0x00, 0x20, 0x01]
        );
    }

    #[test]
    fn attribute_id_is_little_endian() {
        let frame = encode_write_attributes(&command(0xFF0D, 0x80), 0);
        assert_eq!(&frame[5..7], &[0x0D, 0xFF]);
        assert_eq!(frame[8], 0x80);
    }

    #[test]
    fn plain_frame_omits_manufacturer_code() {
        let mut cmd = command(0x0010, 3);
        cmd.manufacturer_code = 0;

        assert_eq!(frame_control(&cmd), 0x10);
        assert_eq!(
            encode_write_attributes(&cmd, 9),
            vec![0x10, 0x09, 0x02, 0x10, 0x00, 0x20, 0x03]
        );
    }

    #[test]
    fn command_byte_follows_access_mode() {
        let cmd = command(0x0005, 0x01);
        assert_eq!(cmd.access, AccessMode::Write);
        assert_eq!(cmd.access.command(), GlobalCommand::WriteAttributes);

        let frame = encode_write_attributes(&cmd, 0);
        assert_eq!(frame[4], GlobalCommand::WriteAttributes.id());
        assert_eq!(frame[4], 0x02);
    }
}
