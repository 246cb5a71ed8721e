// src/element.rs
use alloc::vec::Vec;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::OtaError;

/// Bytes of tag + length framing around each sub-element's data.
pub const ELEMENT_FRAME_SIZE: usize = 6;

/// Well-known sub-element tags (Zigbee OTA spec, table 11-8).
pub const TAG_UPGRADE_IMAGE: u16 = 0x0000;
pub const TAG_ECDSA_SIGNATURE: u16 = 0x0001;
pub const TAG_ECDSA_SIGNING_CERTIFICATE: u16 = 0x0002;
pub const TAG_IMAGE_INTEGRITY_CODE: u16 = 0x0003;

/// One tagged, length-prefixed chunk of payload following the OTA header
/// (e.g. the firmware binary itself, or an upgrade image signature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: u16,
    pub data: Vec<u8>,
}

impl Element {
    /// On-wire size of this element including its 6-byte framing.
    pub fn encoded_len(&self) -> usize {
        ELEMENT_FRAME_SIZE + self.data.len()
    }
}

/// Decodes the sub-element stream of `buffer`, starting at `header_end` and
/// stopping once exactly `total_image_size - header_end` bytes are consumed.
///
/// Too few or too many bytes is equally an error: a partial or padded image
/// is rejected, never silently truncated.
pub fn decode_elements(
    buffer: &[u8],
    header_end: usize,
    total_image_size: u32,
) -> Result<Vec<Element>, OtaError> {
    let total = total_image_size as usize;
    let expected = total.checked_sub(header_end).ok_or(OtaError::SizeMismatch {
        expected: total_image_size,
        consumed: header_end as u32,
    })? as u32;

    let mut elements = Vec::new();
    let mut position = header_end;
    let mut consumed: u32 = 0;

    while consumed < expected {
        if buffer.len() < position + ELEMENT_FRAME_SIZE {
            return Err(OtaError::TruncatedElementFrame);
        }

        let tag = LittleEndian::read_u16(&buffer[position..position + 2]);
        let length = LittleEndian::read_u32(&buffer[position + 2..position + 6]);
        let data_start = position + ELEMENT_FRAME_SIZE;
        let data_end = data_start
            .checked_add(length as usize)
            .filter(|&end| end <= buffer.len())
            .ok_or(OtaError::ElementOverrun { tag, length })?;

        elements.push(Element {
            tag,
            data: buffer[data_start..data_end].to_vec(),
        });

        position = data_end;
        consumed = consumed
            .saturating_add(ELEMENT_FRAME_SIZE as u32)
            .saturating_add(length);
    }

    if consumed != expected {
        return Err(OtaError::SizeMismatch { expected, consumed });
    }

    Ok(elements)
}
