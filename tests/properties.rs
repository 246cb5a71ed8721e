//! Property tests: pack/parse round-trips, the checksum gate under arbitrary
//! single-bit corruption, and monotonicity of the upgrade gate.

mod common;

use std::convert::Infallible;

use proptest::prelude::*;

use otapack::header::{
    FIELD_CTRL_DEVICE_SPECIFIC, FIELD_CTRL_HARDWARE_VERSIONS, FIELD_CTRL_SECURITY_CREDENTIAL,
};
use otapack::{
    fetch_and_verify, is_upgrade_available, pack, parse, validate, Element, FetchError,
    HardwareVersionRange, OtaHeader,
};

prop_compose! {
    fn arb_element()(tag in any::<u16>(), data in proptest::collection::vec(any::<u8>(), 0..64)) -> Element {
        Element { tag, data }
    }
}

prop_compose! {
    fn arb_header()(
        field_control in 0u16..8,
        manufacturer_code in any::<u16>(),
        image_type in any::<u16>(),
        file_version in any::<u32>(),
        credential in any::<u8>(),
        destination in any::<[u8; 8]>(),
        hw_min in 0u16..100,
        hw_span in 0u16..100,
        text in proptest::collection::vec(any::<u8>(), 32),
    ) -> OtaHeader {
        let mut header_string = [0u8; 32];
        header_string.copy_from_slice(&text);

        OtaHeader {
            header_version: 0x0100,
            header_length: 0,     // recomputed by pack
            field_control,
            manufacturer_code,
            image_type,
            file_version,
            zigbee_stack_version: 2,
            header_string,
            total_image_size: 0,  // recomputed by pack
            security_credential_version: (field_control & FIELD_CTRL_SECURITY_CREDENTIAL != 0)
                .then_some(credential),
            upgrade_file_destination: (field_control & FIELD_CTRL_DEVICE_SPECIFIC != 0)
                .then_some(destination),
            hardware_version_range: (field_control & FIELD_CTRL_HARDWARE_VERSIONS != 0)
                .then_some(HardwareVersionRange { minimum: hw_min, maximum: hw_min + hw_span }),
        }
    }
}

proptest! {
    /// parse(pack(h, e)) reproduces header fields, element count and content,
    /// consumes exactly the declared total, and passes validation.
    #[test]
    fn pack_parse_round_trip(
        header in arb_header(),
        elements in proptest::collection::vec(arb_element(), 0..5),
    ) {
        let bytes = pack(&header, &elements);
        let image = parse(&bytes).unwrap();

        prop_assert_eq!(&image.elements, &elements);
        prop_assert_eq!(image.header.field_control, header.field_control);
        prop_assert_eq!(image.header.manufacturer_code, header.manufacturer_code);
        prop_assert_eq!(image.header.file_version, header.file_version);
        prop_assert_eq!(image.header.header_length as usize, header.encoded_len());
        prop_assert_eq!(image.header.total_image_size as usize, bytes.len());
        prop_assert_eq!(&image.raw, &bytes);
        prop_assert_eq!(validate(&image), Ok(()));

        // And re-packing the parsed image is bit-for-bit identical.
        prop_assert_eq!(pack(&image.header, &image.elements), bytes);
    }

    /// Any buffer differing from the expected bytes in at least one bit is
    /// stopped by the checksum gate, never reaching the parser.
    #[test]
    fn flipped_bit_always_fails_checksum(
        seed in any::<u8>(),
        byte_index in 0usize..1086,
        bit in 0u8..8,
    ) {
        let mut bytes = common::single_element_image();
        bytes[56 + 6] = seed; // vary the payload a little
        let candidate = common::candidate_for(&bytes, 33816645);

        let mut corrupted = bytes.clone();
        let index = byte_index % corrupted.len();
        corrupted[index] ^= 1 << bit;

        let result = fetch_and_verify::<_, Infallible>(&candidate, move |_| Ok(corrupted.clone()));
        let gated = matches!(result, Err(FetchError::ChecksumMismatch { .. }));
        prop_assert!(gated, "corruption at byte {} bit {} passed the checksum gate", index, bit);
    }

    /// Equal file versions never produce an upgrade, whatever the rest of the
    /// records look like.
    #[test]
    fn equal_versions_never_upgrade(
        file_version in any::<u32>(),
        manufacturer_code in any::<u16>(),
        image_type in any::<u16>(),
    ) {
        let current = otapack::FirmwareDescriptor {
            manufacturer_code,
            image_type,
            file_version,
            hardware_version: None,
        };
        let candidate = common::candidate_for(b"", file_version);

        prop_assert!(!is_upgrade_available(&current, &candidate));
    }

    /// The gate is consistent with unsigned ordering in both directions.
    #[test]
    fn gate_matches_unsigned_ordering(a in any::<u32>(), b in any::<u32>()) {
        let current = otapack::FirmwareDescriptor {
            manufacturer_code: 1,
            image_type: 1,
            file_version: a,
            hardware_version: None,
        };
        let candidate = common::candidate_for(b"", b);

        prop_assert_eq!(is_upgrade_available(&current, &candidate), b > a);
    }
}
