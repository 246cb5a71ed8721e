// src/error.rs

use alloc::string::String;
use alloc::vec::Vec;

/// Structural decode failures. Any of these means the byte buffer cannot be
/// trusted as an OTA image and must never be forwarded to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtaError {
    /// The OTA upgrade file identifier (1E F1 EE 0B) was not found anywhere
    /// in the buffer. Likely a different file type altogether.
    NotAnOtaImage,

    /// The buffer ended before all header fields flagged present by the
    /// field control could be read.
    TruncatedHeader,

    /// The buffer ended inside a sub-element's 6-byte tag + length frame,
    /// before the frame could even be read.
    TruncatedElementFrame,

    /// A sub-element declared a data length that reads past the end of the
    /// buffer.
    ElementOverrun { tag: u16, length: u32 },

    /// The element stream did not consume exactly the byte count promised by
    /// `total_image_size`. Partial and padded images are both rejected.
    SizeMismatch { expected: u32, consumed: u32 },

    /// A Silabs GBL sub-element has no end tag after its header.
    GblMissingEndTag,

    /// CRC-32 over a Silabs GBL sub-element did not land on the residue
    /// constant.
    GblCrcMismatch(u32),

    /// A Silabs EBL sub-element ended before an end tag was seen.
    EblTruncated,

    /// Bytes after a Silabs EBL end tag were not 0xFF padding.
    EblBadPadding,

    /// CRC-32 over a Silabs EBL sub-element did not land on the residue
    /// constant.
    EblCrcMismatch(u32),
}

impl core::fmt::Display for OtaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAnOtaImage => write!(f, "Not a valid OTA file (upgrade file identifier absent)"),
            Self::TruncatedHeader => write!(f, "Buffer ends inside the OTA header"),
            Self::TruncatedElementFrame => {
                write!(f, "Buffer ends inside a sub-element tag + length frame")
            }
            Self::ElementOverrun { tag, length } => write!(
                f,
                "Sub-element 0x{:04x} declares {} data bytes past the end of the buffer",
                tag, length
            ),
            Self::SizeMismatch { expected, consumed } => write!(
                f,
                "Element stream consumed {} bytes, expected exactly {}",
                consumed, expected
            ),
            Self::GblMissingEndTag => write!(f, "GBL sub-element has no end tag"),
            Self::GblCrcMismatch(crc) => {
                write!(f, "GBL sub-element CRC-32 is invalid (computed {:08x})", crc)
            }
            Self::EblTruncated => {
                write!(f, "EBL sub-element is truncated, not long enough to contain an end tag")
            }
            Self::EblBadPadding => write!(f, "EBL sub-element padding contains invalid bytes"),
            Self::EblCrcMismatch(crc) => {
                write!(f, "EBL sub-element CRC-32 is invalid (computed {:08x})", crc)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OtaError {}

/// Cross-field consistency defects of a structurally decodable image.
/// Collected in batch so an operator sees every defect of a rejected image
/// at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `total_image_size` does not equal header length plus the framed size
    /// of all sub-elements.
    SizeAccounting { declared: u32, computed: u32 },

    /// The hardware version range is inverted (min > max).
    HardwareRangeInverted { min: u16, max: u16 },

    /// `header_length` is smaller than the fixed header plus the optional
    /// fields the field control claims are present.
    HeaderLengthTooSmall { declared: u16, minimum: u16 },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SizeAccounting { declared, computed } => write!(
                f,
                "total image size {} does not match header + elements ({})",
                declared, computed
            ),
            Self::HardwareRangeInverted { min, max } => {
                write!(f, "hardware version range inverted: min {} > max {}", min, max)
            }
            Self::HeaderLengthTooSmall { declared, minimum } => write!(
                f,
                "header length {} too small for flagged optional fields (minimum {})",
                declared, minimum
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

/// Failures of one integrity-verified fetch cycle. `E` is whatever error type
/// the injected download function produces; it is propagated opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError<E> {
    /// The injected download function failed. Transport errors are the
    /// caller's problem; this crate only carries them.
    Download(E),

    /// SHA-512 of the downloaded bytes does not match the digest published
    /// in the candidate record. Always terminal: the bytes never reach the
    /// parser.
    ChecksumMismatch { expected: String, found: String },

    /// The verified bytes failed structural decoding.
    Parse(OtaError),

    /// The decoded image failed cross-field validation.
    Invalid(Vec<ValidationError>),

    /// Header file version does not equal the candidate's.
    FileVersionMismatch { meta: u32, header: u32 },

    /// Header manufacturer code does not equal the candidate's.
    ManufacturerCodeMismatch { meta: u16, header: u16 },

    /// Header image type does not equal the candidate's.
    ImageTypeMismatch { meta: u16, header: u16 },

    /// Header total image size does not equal the candidate's declared
    /// file size.
    ImageSizeMismatch { meta: u32, header: u32 },
}

impl<E> From<OtaError> for FetchError<E> {
    fn from(err: OtaError) -> Self {
        Self::Parse(err)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for FetchError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Download(e) => write!(f, "Download failed: {}", e),
            Self::ChecksumMismatch { expected, found } => write!(
                f,
                "File checksum validation failed: expected {}, found {}",
                expected, found
            ),
            Self::Parse(e) => write!(f, "Image parse failed: {}", e),
            Self::Invalid(errors) => {
                write!(f, "Image validation failed ({} defects):", errors.len())?;
                for err in errors {
                    write!(f, " [{}]", err)?;
                }
                Ok(())
            }
            Self::FileVersionMismatch { meta, header } => {
                write!(f, "File version mismatch: meta {}, header {}", meta, header)
            }
            Self::ManufacturerCodeMismatch { meta, header } => {
                write!(f, "Manufacturer code mismatch: meta {}, header {}", meta, header)
            }
            Self::ImageTypeMismatch { meta, header } => {
                write!(f, "Image type mismatch: meta {}, header {}", meta, header)
            }
            Self::ImageSizeMismatch { meta, header } => {
                write!(f, "Image size mismatch: meta {}, header {}", meta, header)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for FetchError<E> {}
