// src/upgrade.rs
//! The upgrade decision gate. Runs before any download, so incompatible or
//! already-current devices never trigger network traffic.

use alloc::string::String;

/// The currently-running firmware identity of one physical device, as
/// reported over the OTA cluster's query mechanism.
///
/// `hardware_version` is optional because the QueryNextImageRequest carries
/// it only when the device's field control says so.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FirmwareDescriptor {
    pub manufacturer_code: u16,
    pub image_type: u16,
    pub file_version: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hardware_version: Option<u16>,
}

/// One available-firmware record from an external metadata index. Optional
/// fields act as additional compatibility filters when present; field names
/// follow the published zigbee-OTA `index.json` records.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UpgradeCandidate {
    pub file_version: u32,
    pub url: String,
    pub sha512: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub manufacturer_code: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_type: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_size: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_file_version: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_file_version: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hardware_version_min: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hardware_version_max: Option<u16>,
}

/// Decides whether `candidate` is a valid, newer upgrade for a device
/// currently running `current`.
///
/// Strictly newer only: equal or lower versions are never offered. Forcing a
/// downgrade is a distinct operator-triggered action outside this predicate.
/// Pure; no side effects, no network.
pub fn is_upgrade_available(current: &FirmwareDescriptor, candidate: &UpgradeCandidate) -> bool {
    if let Some(manufacturer_code) = candidate.manufacturer_code {
        if manufacturer_code != current.manufacturer_code {
            return false;
        }
    }

    if let Some(image_type) = candidate.image_type {
        if image_type != current.image_type {
            return false;
        }
    }

    // Hardware range filters only apply when the device reported a hardware
    // version; an index entry without a range matches every revision.
    if let (Some(min), Some(hardware_version)) =
        (candidate.hardware_version_min, current.hardware_version)
    {
        if hardware_version < min {
            return false;
        }
    }
    if let (Some(max), Some(hardware_version)) =
        (candidate.hardware_version_max, current.hardware_version)
    {
        if hardware_version > max {
            return false;
        }
    }

    // Some vendors publish stepping-stone images that only apply from a
    // window of installed versions.
    if let Some(min_file_version) = candidate.min_file_version {
        if current.file_version < min_file_version {
            return false;
        }
    }
    if let Some(max_file_version) = candidate.max_file_version {
        if current.file_version > max_file_version {
            return false;
        }
    }

    let available = candidate.file_version > current.file_version;

    log::debug!(
        "upgrade gate: current {:#010x}, candidate {:#010x}, available: {}",
        current.file_version,
        candidate.file_version,
        available
    );

    available
}
