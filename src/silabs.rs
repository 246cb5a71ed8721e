// src/silabs.rs
//! CRC validation for Silabs firmware containers carried inside sub-elements.
//! EFR32-family images ship their firmware as GBL (newer) or EBL (older)
//! containers; both embed a CRC-32 whose running value over the covered bytes
//! lands on a fixed residue when intact.

use byteorder::{BigEndian, ByteOrder};

use crate::error::OtaError;
use crate::image::OtaImage;

/// CRC-32 residue of an intact Silabs container (CRC computed over the data
/// including the stored checksum).
const VALID_SILABS_CRC: u32 = 0x2144df1c;

const GBL_HEADER_TAG: [u8; 4] = [0xeb, 0x17, 0xa6, 0x03];
/// Contains length + CRC-32 and possibly padding after this.
const GBL_END_TAG: [u8; 4] = [0xfc, 0x04, 0x04, 0xfc];

const EBL_TAG_HEADER: u16 = 0x0000;
const EBL_TAG_ENC_HEADER: u16 = 0xfb05;
const EBL_TAG_END: u16 = 0xfc04;
const EBL_PADDING: u8 = 0xff;
const EBL_IMAGE_SIGNATURE: u16 = 0xe350;

/// Checks every sub-element that looks like a Silabs container; payloads of
/// other vendors pass untouched.
pub fn validate_contents(image: &OtaImage) -> Result<(), OtaError> {
    for element in &image.elements {
        let data = element.data.as_slice();

        if data.starts_with(&GBL_HEADER_TAG) {
            validate_gbl(data)?;
        } else if data.len() >= 8 {
            let tag = BigEndian::read_u16(&data[0..2]);

            if (tag == EBL_TAG_HEADER && BigEndian::read_u16(&data[6..8]) == EBL_IMAGE_SIGNATURE)
                || tag == EBL_TAG_ENC_HEADER
            {
                validate_ebl(data)?;
            }
        }
    }

    Ok(())
}

fn validate_gbl(data: &[u8]) -> Result<(), OtaError> {
    let end_tag_index = data
        .windows(GBL_END_TAG.len())
        .rposition(|window| window == GBL_END_TAG)
        // The end tag must come after the header tag, not overlap it.
        .filter(|&index| index > 16)
        .ok_or(OtaError::GblMissingEndTag)?;

    // tag + length + crc32 (4 * 3); possible padding after is not covered.
    let gbl_end = end_tag_index + 12;
    if data.len() < gbl_end {
        return Err(OtaError::GblMissingEndTag);
    }

    let crc = crc32fast::hash(&data[..gbl_end]);
    if crc != VALID_SILABS_CRC {
        return Err(OtaError::GblCrcMismatch(crc));
    }

    Ok(())
}

fn validate_ebl(data: &[u8]) -> Result<(), OtaError> {
    let mut position = 0usize;

    while position + 4 <= data.len() {
        let tag = BigEndian::read_u16(&data[position..position + 2]);
        let length = BigEndian::read_u16(&data[position + 2..position + 4]) as usize;

        position = match position.checked_add(4 + length) {
            Some(next) if next <= data.len() => next,
            _ => return Err(OtaError::EblTruncated),
        };

        if tag != EBL_TAG_END {
            continue;
        }

        if data[position..].iter().any(|&b| b != EBL_PADDING) {
            return Err(OtaError::EblBadPadding);
        }

        let crc = crc32fast::hash(&data[..position]);
        if crc != VALID_SILABS_CRC {
            return Err(OtaError::EblCrcMismatch(crc));
        }

        return Ok(());
    }

    Err(OtaError::EblTruncated)
}
