//! Fixed-layout parts of Sections 5, 6 and 7.

use grib_template_derive::{TryFromSlice, WriteToBuf};

#[derive(Debug, Clone, PartialEq, Eq, TryFromSlice, WriteToBuf)]
pub struct SectionHeader {
    /// Length of section in octets (nn).
    pub len: u32,
    /// Number of section.
    pub sect_num: u8,
}

impl SectionHeader {
    pub const SIZE: usize = 5;
}

/// Octets 6-11 of Section 5 - Data representation section.
#[derive(Debug, Clone, PartialEq, Eq, TryFromSlice, WriteToBuf)]
pub struct Section5Payload {
    /// Number of data points where one or more values are specified in Section
    /// 7 when a bit map is present, total number of data points when a bit map
    /// is absent.
    pub num_encoded_points: u32,
    /// Data representation template number (see Code table 5.0).
    pub template_num: u16,
}

/// Octet 6 of Section 6 - Bit-map section.
#[derive(Debug, Clone, PartialEq, Eq, TryFromSlice, WriteToBuf)]
pub struct Section6Payload {
    /// Bit-map indicator (see Code table 6.0).
    pub bitmap_indicator: u8,
}

impl Section6Payload {
    /// A bit map applies to this product and is specified in this section.
    pub const BITMAP_FOLLOWS: u8 = 0;
    /// A bit map does not apply to this product.
    pub const NO_BITMAP: u8 = 255;
}

pub mod template {
    //! GRIB2 template definitions.

    pub use super::template5::*;

    pub mod param_set {
        //! Definitions of parameter sets used in GRIB2 templates.

        pub use super::super::template5::param_set::*;
    }
}

mod template5;
