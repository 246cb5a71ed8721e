#![no_std]

//! Parsing, validation and integrity verification of Zigbee OTA upgrade
//! images, plus the upgrade-decision gate that runs before any download.
//!
//! The pipeline for one upgrade-check cycle is linear: an external metadata
//! record is gated by [`is_upgrade_available`], then [`fetch_and_verify`]
//! downloads through an injected function, verifies the published SHA-512
//! digest, and runs locate → header → elements → validate over the verified
//! bytes. Only a fully validated [`OtaImage`] is ever handed to the
//! block-transfer collaborator. Every function here is referentially
//! transparent given its inputs; the one I/O call is injected by the caller.

#[cfg(feature = "std")]
extern crate std;

// Needed for Vec
extern crate alloc;

pub mod element;
pub mod error;
pub mod fetch;
pub mod header;
pub mod image;
pub mod pack;
pub mod silabs;
pub mod upgrade;
pub mod validate;

pub use element::{decode_elements, Element};
pub use error::{FetchError, OtaError, ValidationError};
pub use fetch::fetch_and_verify;
pub use header::{locate_image, HardwareVersionRange, OtaHeader, UPGRADE_FILE_IDENTIFIER};
pub use image::{parse, OtaImage};
pub use pack::pack;
pub use upgrade::{is_upgrade_available, FirmwareDescriptor, UpgradeCandidate};
pub use validate::validate;
