// src/header.rs
use alloc::string::String;
use alloc::vec::Vec;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::OtaError;

/// The Zigbee OTA upgrade file identifier. Vendors may wrap the standard
/// image in outer container bytes (signing blocks, multi-image bundles), so
/// this sequence is the parse anchor rather than offset 0.
pub const UPGRADE_FILE_IDENTIFIER: [u8; 4] = [0x1e, 0xf1, 0xee, 0x0b];

/// Size of the header with no optional fields present.
pub const FIXED_HEADER_SIZE: usize = 56;

/// Field control bits: which optional header fields this file carries.
pub const FIELD_CTRL_SECURITY_CREDENTIAL: u16 = 0x0001;
pub const FIELD_CTRL_DEVICE_SPECIFIC: u16 = 0x0002;
pub const FIELD_CTRL_HARDWARE_VERSIONS: u16 = 0x0004;

/// Inclusive hardware version range a device must fall inside for this image
/// to apply. Present iff field control bit 2 is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareVersionRange {
    pub minimum: u16,
    pub maximum: u16,
}

/// The OTA file header. Internal Rust representation; the wire format is
/// packed little-endian and does not match C alignment rules, so fields are
/// read and written manually.
///
/// The three optional blocks are materialized strictly from the decoded
/// field control bitmask, never guessed from presence or absence of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaHeader {
    pub header_version: u16,
    /// Byte offset (from the file identifier) where sub-elements begin.
    pub header_length: u16,
    pub field_control: u16,
    pub manufacturer_code: u16,
    pub image_type: u16,
    /// Monotonically-intended version number. Comparison is unsigned
    /// numeric, not semantic.
    pub file_version: u32,
    pub zigbee_stack_version: u16,
    /// Free text, NUL padded. Kept as raw bytes: header text is
    /// informational only and invalid encodings are not a decode error.
    pub header_string: [u8; 32],
    /// Total bytes from the file identifier through the last sub-element,
    /// inclusive.
    pub total_image_size: u32,
    pub security_credential_version: Option<u8>,
    pub upgrade_file_destination: Option<[u8; 8]>,
    pub hardware_version_range: Option<HardwareVersionRange>,
}

/// Finds the start of the upgrade file identifier inside an arbitrary buffer.
pub fn locate_image(buffer: &[u8]) -> Result<usize, OtaError> {
    buffer
        .windows(UPGRADE_FILE_IDENTIFIER.len())
        .position(|window| window == UPGRADE_FILE_IDENTIFIER)
        .ok_or(OtaError::NotAnOtaImage)
}

impl OtaHeader {
    /// Decodes the header from the start of `bytes`, which must begin at the
    /// file identifier (see [`locate_image`]).
    ///
    /// Purely mechanical byte-to-field mapping: no field is trusted as
    /// globally valid until [`crate::validate::validate`] runs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OtaError> {
        if bytes.len() < FIXED_HEADER_SIZE {
            return Err(OtaError::TruncatedHeader);
        }
        if bytes[0..4] != UPGRADE_FILE_IDENTIFIER {
            return Err(OtaError::NotAnOtaImage);
        }

        let header_version = LittleEndian::read_u16(&bytes[4..6]);
        let header_length = LittleEndian::read_u16(&bytes[6..8]);
        let field_control = LittleEndian::read_u16(&bytes[8..10]);
        let manufacturer_code = LittleEndian::read_u16(&bytes[10..12]);
        let image_type = LittleEndian::read_u16(&bytes[12..14]);
        let file_version = LittleEndian::read_u32(&bytes[14..18]);
        let zigbee_stack_version = LittleEndian::read_u16(&bytes[18..20]);

        let mut header_string = [0u8; 32];
        header_string.copy_from_slice(&bytes[20..52]);

        let total_image_size = LittleEndian::read_u32(&bytes[52..56]);

        // Optional blocks follow in field-control order, cursor advancing
        // past each present one.
        let mut cursor = FIXED_HEADER_SIZE;

        let security_credential_version = if field_control & FIELD_CTRL_SECURITY_CREDENTIAL != 0 {
            let byte = *bytes.get(cursor).ok_or(OtaError::TruncatedHeader)?;
            cursor += 1;
            Some(byte)
        } else {
            None
        };

        let upgrade_file_destination = if field_control & FIELD_CTRL_DEVICE_SPECIFIC != 0 {
            if bytes.len() < cursor + 8 {
                return Err(OtaError::TruncatedHeader);
            }
            let mut dest = [0u8; 8];
            dest.copy_from_slice(&bytes[cursor..cursor + 8]);
            cursor += 8;
            Some(dest)
        } else {
            None
        };

        let hardware_version_range = if field_control & FIELD_CTRL_HARDWARE_VERSIONS != 0 {
            if bytes.len() < cursor + 4 {
                return Err(OtaError::TruncatedHeader);
            }
            let minimum = LittleEndian::read_u16(&bytes[cursor..cursor + 2]);
            let maximum = LittleEndian::read_u16(&bytes[cursor + 2..cursor + 4]);
            Some(HardwareVersionRange { minimum, maximum })
        } else {
            None
        };

        Ok(Self {
            header_version,
            header_length,
            field_control,
            manufacturer_code,
            image_type,
            file_version,
            zigbee_stack_version,
            header_string,
            total_image_size,
            security_credential_version,
            upgrade_file_destination,
            hardware_version_range,
        })
    }

    /// Serializes the header exactly as declared, including `header_length`
    /// and `total_image_size` verbatim. Optional blocks are written from the
    /// field control bits; a flagged-but-absent option writes zeroes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());

        buf.extend_from_slice(&UPGRADE_FILE_IDENTIFIER);
        buf.extend_from_slice(&self.header_version.to_le_bytes());
        buf.extend_from_slice(&self.header_length.to_le_bytes());
        buf.extend_from_slice(&self.field_control.to_le_bytes());
        buf.extend_from_slice(&self.manufacturer_code.to_le_bytes());
        buf.extend_from_slice(&self.image_type.to_le_bytes());
        buf.extend_from_slice(&self.file_version.to_le_bytes());
        buf.extend_from_slice(&self.zigbee_stack_version.to_le_bytes());
        buf.extend_from_slice(&self.header_string);
        buf.extend_from_slice(&self.total_image_size.to_le_bytes());

        if self.field_control & FIELD_CTRL_SECURITY_CREDENTIAL != 0 {
            buf.push(self.security_credential_version.unwrap_or(0));
        }
        if self.field_control & FIELD_CTRL_DEVICE_SPECIFIC != 0 {
            buf.extend_from_slice(&self.upgrade_file_destination.unwrap_or([0u8; 8]));
        }
        if self.field_control & FIELD_CTRL_HARDWARE_VERSIONS != 0 {
            let range = self
                .hardware_version_range
                .unwrap_or(HardwareVersionRange { minimum: 0, maximum: 0 });
            buf.extend_from_slice(&range.minimum.to_le_bytes());
            buf.extend_from_slice(&range.maximum.to_le_bytes());
        }

        buf
    }

    /// Byte length of the header as implied by the field control bits.
    /// This is the minimum legal `header_length` for this file.
    pub fn encoded_len(&self) -> usize {
        let mut len = FIXED_HEADER_SIZE;
        if self.field_control & FIELD_CTRL_SECURITY_CREDENTIAL != 0 {
            len += 1;
        }
        if self.field_control & FIELD_CTRL_DEVICE_SPECIFIC != 0 {
            len += 8;
        }
        if self.field_control & FIELD_CTRL_HARDWARE_VERSIONS != 0 {
            len += 4;
        }
        len
    }

    /// Header text with NUL padding stripped, invalid UTF-8 rendered lossily.
    pub fn header_string_lossy(&self) -> String {
        let end = self
            .header_string
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.header_string.len());
        String::from_utf8_lossy(&self.header_string[..end]).into_owned()
    }

    pub const fn has_security_credential(&self) -> bool {
        (self.field_control & FIELD_CTRL_SECURITY_CREDENTIAL) != 0
    }

    pub const fn is_device_specific(&self) -> bool {
        (self.field_control & FIELD_CTRL_DEVICE_SPECIFIC) != 0
    }

    pub const fn has_hardware_versions(&self) -> bool {
        (self.field_control & FIELD_CTRL_HARDWARE_VERSIONS) != 0
    }
}
