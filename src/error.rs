use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum GribError {
    #[error("{0}")]
    DecodeError(#[from] DecodeError),
    #[error("{0}")]
    EncodeError(#[from] EncodeError),
}

/// Errors raised while reading Section 5 headers or unpacking Section 7 data.
///
/// All of them are fatal to the field being decoded only; a caller iterating
/// over the fields of a message may report the error and move on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    #[error("Unexpected end of data")]
    TruncatedStream,
    #[error("Data representation template 5.{0} is not supported")]
    UnsupportedTemplate(u16),
    #[error("Group lengths sum up to {actual} while {expected} points are encoded")]
    InvalidGroupLayout { expected: usize, actual: usize },
    #[error("Not supported: {0} = {1}")]
    NotSupported(&'static str, u16),
    #[error("Section {expected} expected but section {actual} found")]
    InvalidSectionNumber { expected: u8, actual: u8 },
    #[error("Length of data does not match the length described in headers")]
    LengthMismatch,
    #[error("Bit-map indicator {0} is not supported")]
    BitMapIndicatorUnsupported(u8),
}

/// Errors raised while packing grid values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum EncodeError {
    #[error("Value {value} does not fit in {width} bits")]
    ValueTooWide { value: u64, width: usize },
    #[error("Range of scaled values is too large to be packed")]
    DynamicRangeTooLarge,
    #[error("Missing value found at index {0} while no missing values are allowed")]
    UnexpectedMissingValue(usize),
    #[error("Non-finite value found at index {0}")]
    NonFiniteValue(usize),
    #[error("Number of values does not match the number of grid points")]
    LengthMismatch,
    #[error("Section {0} does not fit in 4294967295 octets")]
    SectionTooLarge(u8),
    #[error("Invalid packing parameter: {0}")]
    InvalidParameter(&'static str),
}
