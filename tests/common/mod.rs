//! Shared fixture builders: synthetic but wire-exact OTA images in the shape
//! of real vendor files (single-element Ikea-style plugs, multi-element
//! Ledvance classic bulbs, Ubisys images with a hardware version range).

#![allow(dead_code)]

use otapack::header::{FIELD_CTRL_HARDWARE_VERSIONS, FIXED_HEADER_SIZE};
use otapack::{pack, Element, HardwareVersionRange, OtaHeader, UpgradeCandidate};
use sha2::{Digest, Sha512};

pub fn header_string(text: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = text.as_bytes();
    out[..bytes.len()].copy_from_slice(bytes);
    out
}

pub fn base_header() -> OtaHeader {
    OtaHeader {
        header_version: 0x0100,
        header_length: FIXED_HEADER_SIZE as u16,
        field_control: 0,
        manufacturer_code: 4476,
        image_type: 40766,
        file_version: 33816645,
        zigbee_stack_version: 2,
        header_string: header_string("GBL inspelning_smart_plug_soc"),
        total_image_size: 0, // recomputed by pack
        security_credential_version: None,
        upgrade_file_destination: None,
        hardware_version_range: None,
    }
}

/// Single-element image in the shape of an Ikea/Ledvance file: field control
/// 0, one upgrade-image sub-element.
pub fn single_element_image() -> Vec<u8> {
    pack(
        &base_header(),
        &[Element {
            tag: 0,
            data: vec![0xEB; 1024],
        }],
    )
}

/// Six-element image in the shape of a Ledvance classic-bulb file.
pub fn six_element_image() -> Vec<u8> {
    let elements: Vec<Element> = (0..6u16)
        .map(|tag| Element {
            tag,
            data: vec![tag as u8; 64 + tag as usize],
        })
        .collect();

    let mut header = base_header();
    header.manufacturer_code = 4489;
    header.image_type = 0x0510;
    header.header_string = header_string("CLASSIC_A60_RGBW");

    pack(&header, &elements)
}

/// Image with a hardware version range, in the shape of a Ubisys file
/// (documented range min=0, max=4).
pub fn hardware_range_image() -> Vec<u8> {
    let mut header = base_header();
    header.field_control = FIELD_CTRL_HARDWARE_VERSIONS;
    header.manufacturer_code = 0x10f2;
    header.image_type = 0x7b09;
    header.file_version = 0x01090206;
    header.header_string = header_string("spo-fmi4");
    header.hardware_version_range = Some(HardwareVersionRange { minimum: 0, maximum: 4 });

    pack(
        &header,
        &[Element {
            tag: 0,
            data: vec![0x55; 512],
        }],
    )
}

pub fn sha512_hex(bytes: &[u8]) -> String {
    hex::encode(Sha512::digest(bytes))
}

/// Candidate record whose digest matches `bytes` exactly.
pub fn candidate_for(bytes: &[u8], file_version: u32) -> UpgradeCandidate {
    UpgradeCandidate {
        file_version,
        url: "https://fw.example.org/image.ota".to_string(),
        sha512: sha512_hex(bytes),
        manufacturer_code: None,
        image_type: None,
        file_size: None,
        min_file_version: None,
        max_file_version: None,
        hardware_version_min: None,
        hardware_version_max: None,
    }
}
