// src/image.rs
use alloc::vec::Vec;

use crate::element::{decode_elements, Element};
use crate::error::OtaError;
use crate::header::{locate_image, OtaHeader};

/// A structurally decoded OTA image: one header plus the ordered sub-element
/// stream, and the exact `total_image_size` raw bytes starting at the file
/// identifier (the block-transfer collaborator streams from `raw`).
///
/// Production images always carry at least one sub-element, but an empty
/// stream is syntactically legal and is not rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaImage {
    pub header: OtaHeader,
    pub elements: Vec<Element>,
    pub raw: Vec<u8>,
}

/// Parses an OTA image out of an arbitrary buffer: locates the upgrade file
/// identifier, decodes the header at that anchor, then consumes the
/// sub-element stream up to the header-declared total size.
///
/// Trailing outer-container bytes after `total_image_size` are ignored;
/// wrapper bytes before the identifier are skipped by the locator.
pub fn parse(buffer: &[u8]) -> Result<OtaImage, OtaError> {
    let start = locate_image(buffer)?;
    let data = &buffer[start..];

    log::debug!(
        "parsing OTA image, buffer size {}, identifier at offset {}",
        buffer.len(),
        start
    );

    let header = OtaHeader::from_bytes(data)?;
    let elements = decode_elements(data, header.header_length as usize, header.total_image_size)?;

    let total = header.total_image_size as usize;
    // decode_elements succeeding bounds total by the buffer, except for the
    // degenerate elementless case where total may still exceed it.
    if data.len() < total {
        return Err(OtaError::SizeMismatch {
            expected: header.total_image_size,
            consumed: data.len() as u32,
        });
    }

    Ok(OtaImage {
        header,
        elements,
        raw: data[..total].to_vec(),
    })
}
