use grib_template_derive::{TryFromSlice, WriteToBuf};

/// Data representation template 5.0 - Grid point data - simple packing.
#[derive(Debug, Clone, PartialEq, TryFromSlice, WriteToBuf)]
pub struct Template5_0 {
    pub simple: param_set::SimplePacking,
    /// Type of original field values (see Code table 5.1).
    pub orig_field_type: u8,
}

/// Data representation template 5.3 - Grid point data - complex packing and
/// spatial differencing.
#[derive(Debug, Clone, PartialEq, TryFromSlice, WriteToBuf)]
pub struct Template5_3 {
    pub simple: param_set::SimplePacking,
    /// Type of original field values (see Code table 5.1).
    pub orig_field_type: u8,
    pub complex: param_set::ComplexPacking,
    /// Order of spatial differencing (see Code table 5.6).
    pub spatial_diff_order: u8,
    /// Number of octets required in the data section to specify extra
    /// descriptors needed for spatial differencing (octets 6-ww in data
    /// template 7.3).
    pub num_extra_desc_octets: u8,
}

pub mod param_set {
    use grib_template_derive::{TryFromSlice, WriteToBuf};

    #[derive(Debug, Clone, PartialEq, TryFromSlice, WriteToBuf)]
    pub struct SimplePacking {
        /// Reference value (R) (IEEE 32-bit floating-point value).
        pub ref_val: f32,
        /// Binary scale factor (E).
        pub exp: i16,
        /// Decimal scale factor (D).
        pub dec: i16,
        /// Number of bits used for each packed value for simple packing, or for
        /// each group reference value for complex packing or spatial
        /// differencing.
        pub num_bits: u8,
    }

    impl SimplePacking {
        /// Converts a packed integer into a physical value:
        /// `Y = (R + X * 2^E) / 10^D`.
        pub(crate) fn scale(&self, encoded: f64) -> f32 {
            let diff = encoded * 2_f64.powi(self.exp.into());
            ((f64::from(self.ref_val) + diff) / 10_f64.powi(self.dec.into())) as f32
        }

        pub(crate) fn zero_bit_reference_value(&self) -> f32 {
            self.scale(0.0)
        }
    }

    #[derive(Debug, Clone, PartialEq, TryFromSlice, WriteToBuf)]
    pub struct ComplexPacking {
        /// Group splitting method used (see Code table 5.4).
        pub group_splitting_method: u8,
        /// Missing value management used (see Code table 5.5).
        pub missing_value_management: u8,
        /// Primary missing value substitute.
        pub primary_missing_value: f32,
        /// Secondary missing value substitute.
        pub secondary_missing_value: f32,
        /// NG - number of groups of data values into which field is split.
        pub num_groups: u32,
        /// Reference for group widths.
        pub group_width_ref: u8,
        /// Number of bits used for the group widths (after the reference value
        /// in octet 36 has been removed).
        pub num_group_width_bits: u8,
        /// Reference for group lengths.
        pub group_len_ref: u32,
        /// Length increment for the group lengths.
        pub group_len_inc: u8,
        /// True length of last group.
        pub group_len_last: u32,
        /// Number of bits used for the scaled group lengths (after subtraction
        /// of the reference value given in octets 38-41 and division by
        /// the length increment given in octet 42).
        pub num_group_len_bits: u8,
    }
}
