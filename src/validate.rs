// src/validate.rs

use alloc::vec::Vec;

use crate::error::ValidationError;
use crate::image::OtaImage;

/// Checks cross-field invariants of a decoded image, collecting every defect
/// instead of stopping at the first so a rejected image can be reported in
/// full. Pure: depends on nothing but the image itself.
pub fn validate(image: &OtaImage) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let header = &image.header;

    // Size accounting: header length plus all framed sub-elements must equal
    // the declared total, byte for byte.
    let computed = header.header_length as u64
        + image
            .elements
            .iter()
            .map(|e| e.encoded_len() as u64)
            .sum::<u64>();
    if computed != header.total_image_size as u64 {
        errors.push(ValidationError::SizeAccounting {
            declared: header.total_image_size,
            computed: computed.min(u32::MAX as u64) as u32,
        });
    }

    if let Some(range) = header.hardware_version_range {
        if range.minimum > range.maximum {
            errors.push(ValidationError::HardwareRangeInverted {
                min: range.minimum,
                max: range.maximum,
            });
        }
    }

    // A field-control bit claiming a field there is no room for.
    let minimum = header.encoded_len() as u16;
    if header.header_length < minimum {
        errors.push(ValidationError::HeaderLengthTooSmall {
            declared: header.header_length,
            minimum,
        });
    }

    // Version 0 is legal but worth a note in the log; some vendors ship it.
    if header.file_version == 0 {
        log::debug!("image declares file version 0");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
