// src/pack.rs
//! OTA image serialization (pack). Symmetric to `image::parse`; used by the
//! test fixtures and by callers that re-emit a parsed image. The byte layout
//! is the interoperable wire format of vendor-published `.ota`/`.zigbee`
//! files and must stay bit-for-bit stable.

use alloc::vec::Vec;

use crate::element::Element;
use crate::header::OtaHeader;

/// Packs a header and sub-elements into a complete OTA image byte buffer.
///
/// `header_length` and `total_image_size` are recomputed from the actual
/// field-control bits and element sizes, so the output always satisfies the
/// size-accounting invariant; the declared values in `header` are ignored.
/// For a well-formed parsed image the recomputed values equal the declared
/// ones and `parse(pack(h, e))` is the identity.
pub fn pack(header: &OtaHeader, elements: &[Element]) -> Vec<u8> {
    let header_length = header.encoded_len();
    let total_image_size = header_length
        + elements
            .iter()
            .map(|element| element.encoded_len())
            .sum::<usize>();

    let mut fixed = header.clone();
    fixed.header_length = header_length as u16;
    fixed.total_image_size = total_image_size as u32;

    let mut out = Vec::with_capacity(total_image_size);
    out.extend_from_slice(&fixed.to_bytes());

    for element in elements {
        out.extend_from_slice(&element.tag.to_le_bytes());
        out.extend_from_slice(&(element.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&element.data);
    }

    out
}
