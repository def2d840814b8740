use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Code table 5.1 - Type of original field values.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table5_1 {
    FloatingPoint = 0,
    Integer,
    Missing = 255,
}

/// Code table 5.4 - Group splitting method.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table5_4 {
    RowByRowSplitting = 0,
    GeneralGroupSplitting,
    Missing = 255,
}

/// Code table 5.5 - Missing value management for complex packing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table5_5 {
    NoExplicitMissingValues = 0,
    PrimaryMissingValues,
    PrimaryAndSecondaryMissingValues,
    Missing = 255,
}

impl Table5_5 {
    /// Number of codes reserved at the top of each bit width for missing
    /// values.
    pub(crate) fn num_reserved_codes(&self) -> u64 {
        match self {
            Self::PrimaryMissingValues => 1,
            Self::PrimaryAndSecondaryMissingValues => 2,
            Self::NoExplicitMissingValues | Self::Missing => 0,
        }
    }
}

/// Code table 5.6 - Order of spatial differencing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table5_6 {
    FirstOrderSpatialDifferencing = 1,
    SecondOrderSpatialDifferencing,
    Missing = 255,
}

impl Table5_6 {
    /// Number of leading values stored as extra descriptors.
    pub(crate) fn num_first_values(&self) -> usize {
        match self {
            Self::FirstOrderSpatialDifferencing => 1,
            Self::SecondOrderSpatialDifferencing => 2,
            Self::Missing => 0,
        }
    }
}
