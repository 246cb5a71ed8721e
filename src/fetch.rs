// src/fetch.rs
//! Integrity-verified fetch: download candidate bytes through an injected
//! function, gate them on the manifest's SHA-512 digest, and only then run
//! the parse/validate pipeline. A corrupted or tampered download must never
//! reach the parser, even if it would otherwise parse successfully.

use alloc::vec::Vec;

use sha2::{Digest, Sha512};

use crate::error::FetchError;
use crate::image::{parse, OtaImage};
use crate::silabs;
use crate::upgrade::UpgradeCandidate;
use crate::validate::validate;

/// Downloads `candidate`'s image through `download`, verifies the SHA-512
/// digest, then parses and validates the bytes into an [`OtaImage`] ready for
/// the block-transfer collaborator.
///
/// The download function is injected so the core stays testable without
/// network access and so retry/backoff and cancellation policy live with the
/// caller. Every error is terminal for this cycle; no retries happen here.
pub fn fetch_and_verify<D, E>(
    candidate: &UpgradeCandidate,
    download: D,
) -> Result<OtaImage, FetchError<E>>
where
    D: FnOnce(&str) -> Result<Vec<u8>, E>,
{
    log::debug!("downloading firmware image from '{}'", candidate.url);

    let bytes = download(&candidate.url).map_err(FetchError::Download)?;

    verify_checksum(&bytes, &candidate.sha512)?;

    log::debug!("image checksum validation succeeded ({} bytes)", bytes.len());

    let image = parse(&bytes)?;

    // The verified bytes must still be the image the manifest promised.
    check_against_candidate(&image, candidate)?;

    validate(&image).map_err(FetchError::Invalid)?;
    silabs::validate_contents(&image)?;

    Ok(image)
}

fn verify_checksum<E>(bytes: &[u8], expected: &str) -> Result<(), FetchError<E>> {
    let digest = Sha512::digest(bytes);
    let found = hex::encode(digest);

    if !found.eq_ignore_ascii_case(expected) {
        return Err(FetchError::ChecksumMismatch {
            expected: expected.into(),
            found,
        });
    }

    Ok(())
}

fn check_against_candidate<E>(
    image: &OtaImage,
    candidate: &UpgradeCandidate,
) -> Result<(), FetchError<E>> {
    let header = &image.header;

    if header.file_version != candidate.file_version {
        return Err(FetchError::FileVersionMismatch {
            meta: candidate.file_version,
            header: header.file_version,
        });
    }

    if let Some(manufacturer_code) = candidate.manufacturer_code {
        if header.manufacturer_code != manufacturer_code {
            return Err(FetchError::ManufacturerCodeMismatch {
                meta: manufacturer_code,
                header: header.manufacturer_code,
            });
        }
    }

    if let Some(image_type) = candidate.image_type {
        if header.image_type != image_type {
            return Err(FetchError::ImageTypeMismatch {
                meta: image_type,
                header: header.image_type,
            });
        }
    }

    if let Some(file_size) = candidate.file_size {
        if header.total_image_size != file_size {
            return Err(FetchError::ImageSizeMismatch {
                meta: file_size,
                header: header.total_image_size,
            });
        }
    }

    Ok(())
}
