use log::{debug, trace};

use self::diff::spatial_differencing;
use crate::{
    codetables::grib2::{Table5_1, Table5_4, Table5_5, Table5_6},
    decoder::complex::missing::{
        DecodedValue::{self, Missing1, Missing2, Normal},
        MissingCodes,
    },
    def::grib2::template::{
        Template5_3,
        param_set::{ComplexPacking, SimplePacking},
    },
    encoder::simple::{check_scale_factors, scale_values},
    error::EncodeError,
    helpers::{grib_int_to_bytes, num_bits_for, num_octets_for_grib_ints},
    stream::BitWriter,
};

/// Number of values per group used by [`ComplexPackingConfig::default`].
pub const DEFAULT_GROUP_LEN: u32 = 16;

/// Substitute for missing values used by [`ComplexPackingConfig::default`].
pub const DEFAULT_MISSING_VALUE: f32 = 9.999e20;

/// How values are split into groups before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupSplitting {
    /// Runs of the given number of consecutive values, the last one possibly
    /// shorter (general group splitting).
    FixedLength(u32),
    /// One group per grid row of the given number of points (row by row
    /// splitting).
    RowByRow(u32),
}

impl GroupSplitting {
    pub fn group_len(&self) -> u32 {
        match self {
            Self::FixedLength(len) | Self::RowByRow(len) => *len,
        }
    }

    pub fn method(&self) -> Table5_4 {
        match self {
            Self::FixedLength(_) => Table5_4::GeneralGroupSplitting,
            Self::RowByRow(_) => Table5_4::RowByRowSplitting,
        }
    }
}

impl Default for GroupSplitting {
    fn default() -> Self {
        Self::FixedLength(DEFAULT_GROUP_LEN)
    }
}

/// Parameters of complex packing and spatial differencing.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPackingConfig {
    /// Decimal scale factor (D).
    pub dec: i16,
    /// Binary scale factor (E).
    pub exp: i16,
    pub spatial_diff_order: Table5_6,
    pub missing_value_management: Table5_5,
    /// Values equal to this one, as well as NaN, are packed as primary missing
    /// values when missing value management is enabled.
    pub primary_missing_value: f32,
    /// Values equal to this one are packed as secondary missing values when
    /// both kinds of missing values are managed.
    pub secondary_missing_value: f32,
    pub group_splitting: GroupSplitting,
}

impl Default for ComplexPackingConfig {
    fn default() -> Self {
        Self {
            dec: 0,
            exp: 0,
            spatial_diff_order: Table5_6::SecondOrderSpatialDifferencing,
            missing_value_management: Table5_5::NoExplicitMissingValues,
            primary_missing_value: DEFAULT_MISSING_VALUE,
            secondary_missing_value: DEFAULT_MISSING_VALUE,
            group_splitting: GroupSplitting::default(),
        }
    }
}

impl ComplexPackingConfig {
    fn validate(&self) -> Result<(), EncodeError> {
        check_scale_factors(self.dec, self.exp)?;
        if self.spatial_diff_order == Table5_6::Missing {
            return Err(EncodeError::InvalidParameter(
                "order of spatial differencing must be 1 or 2",
            ));
        }
        if self.missing_value_management == Table5_5::Missing {
            return Err(EncodeError::InvalidParameter(
                "missing value management must be 0, 1 or 2",
            ));
        }
        if self.group_splitting.group_len() == 0 {
            return Err(EncodeError::InvalidParameter(
                "group length must be positive",
            ));
        }
        Ok(())
    }

    fn classify(&self, index: usize, value: f32) -> Result<DecodedValue<f32>, EncodeError> {
        let num_reserved = self.missing_value_management.num_reserved_codes();
        if num_reserved >= 1 && (value.is_nan() || value == self.primary_missing_value) {
            return Ok(Missing1);
        }
        if num_reserved == 2 && value == self.secondary_missing_value {
            return Ok(Missing2);
        }
        if value.is_nan() {
            return Err(EncodeError::UnexpectedMissingValue(index));
        }
        if value.is_infinite() {
            return Err(EncodeError::NonFiniteValue(index));
        }
        Ok(Normal(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupRef {
    Value(u64),
    Missing1,
    Missing2,
}

#[derive(Debug)]
struct Group<'a> {
    values: &'a [DecodedValue<u64>],
    reference: GroupRef,
    width: usize,
}

impl<'a> Group<'a> {
    fn new(values: &'a [DecodedValue<u64>], num_reserved: u64) -> Result<Self, EncodeError> {
        let (min, max) = values
            .iter()
            .filter_map(|v| match v {
                Normal(v) => Some(*v),
                _ => None,
            })
            .fold((None, 0), |(min, max), v| {
                (Some(min.map_or(v, |m: u64| m.min(v))), max.max(v))
            });
        let has_missing1 = values.iter().any(|v| *v == Missing1);
        let has_missing2 = values.iter().any(|v| *v == Missing2);

        let (reference, width) = match (min, has_missing1, has_missing2) {
            (Some(min), false, false) if min == max => (GroupRef::Value(min), 0),
            // reserved codes are kept free in every group holding data
            (Some(min), _, _) => (GroupRef::Value(min), num_bits_for(max - min + num_reserved)),
            (None, true, false) => (GroupRef::Missing1, 0),
            (None, false, true) => (GroupRef::Missing2, 0),
            (None, _, _) => (GroupRef::Value(0), num_bits_for(num_reserved)),
        };
        if width > 32 {
            return Err(EncodeError::DynamicRangeTooLarge);
        }
        Ok(Self {
            values,
            reference,
            width,
        })
    }

    fn write_values(&self, writer: &mut BitWriter, num_reserved: u64) -> Result<(), EncodeError> {
        if self.width == 0 {
            return Ok(());
        }
        let reference = match self.reference {
            GroupRef::Value(v) => v,
            GroupRef::Missing1 | GroupRef::Missing2 => 0,
        };
        let codes = MissingCodes::new(num_reserved, self.width);
        let packed = self.values.iter().map(|v| {
            let code = match v {
                Normal(v) => v - reference,
                Missing1 => codes.primary(),
                Missing2 => codes.secondary(),
            };
            code as u32
        });
        writer.write_uints(packed, self.width)
    }
}

/// Packs values with data template 7.3.
pub(crate) fn pack(
    values: &[f32],
    config: &ComplexPackingConfig,
) -> Result<(Template5_3, Vec<u8>), EncodeError> {
    config.validate()?;
    let management = config.missing_value_management;
    let num_reserved = management.num_reserved_codes();
    let order = config.spatial_diff_order;

    let classified = values
        .iter()
        .enumerate()
        .map(|(i, v)| config.classify(i, *v))
        .collect::<Result<Vec<_>, _>>()?;
    let scaled = scale_values(
        classified.iter().map(|v| match v {
            Normal(v) => Some(*v),
            Missing1 | Missing2 => None,
        }),
        config.dec,
        config.exp,
    )?;

    let normal_vals = scaled
        .ints
        .iter()
        .flatten()
        .map(|v| i64::from(*v))
        .collect::<Vec<_>>();
    let spdiff = spatial_differencing(&normal_vals, order);

    let mut residuals = spdiff.residuals.iter();
    let codes = classified
        .iter()
        .map(|v| match v {
            Normal(_) => Normal(residuals.next().copied().unwrap_or(0)),
            Missing1 => Missing1,
            Missing2 => Missing2,
        })
        .collect::<Vec<_>>();

    let group_len = config.group_splitting.group_len() as usize;
    let groups = codes
        .chunks(group_len)
        .map(|chunk| Group::new(chunk, num_reserved))
        .collect::<Result<Vec<_>, _>>()?;

    let max_ref = groups
        .iter()
        .filter_map(|g| match g.reference {
            GroupRef::Value(v) => Some(v),
            GroupRef::Missing1 | GroupRef::Missing2 => None,
        })
        .max()
        .unwrap_or(0);
    let nbit = num_bits_for(max_ref + num_reserved);
    if nbit > 32 {
        return Err(EncodeError::DynamicRangeTooLarge);
    }
    let ref_codes = MissingCodes::new(num_reserved, nbit);
    let group_refs = groups.iter().map(|g| match g.reference {
        GroupRef::Value(v) => v as u32,
        GroupRef::Missing1 => ref_codes.primary() as u32,
        GroupRef::Missing2 => ref_codes.secondary() as u32,
    });

    let widths = groups.iter().map(|g| g.width).collect::<Vec<_>>();
    let group_width_ref = widths.iter().min().copied().unwrap_or(0);
    let width_codes = widths
        .iter()
        .map(|w| (w - group_width_ref) as u32)
        .collect::<Vec<_>>();
    let num_group_width_bits = num_bits_for(width_codes.iter().max().copied().unwrap_or(0).into());

    let lens = groups.iter().map(|g| g.values.len() as u32).collect::<Vec<_>>();
    let group_len_last = lens.last().copied().unwrap_or(0);
    let non_last_lens = &lens[..lens.len().saturating_sub(1)];
    let group_len_ref = non_last_lens.iter().min().copied().unwrap_or(group_len_last);
    let len_codes = non_last_lens
        .iter()
        .map(|len| len - group_len_ref)
        .chain(lens.last().map(|_| 0))
        .collect::<Vec<_>>();
    let num_group_len_bits = num_bits_for(len_codes.iter().max().copied().unwrap_or(0).into());

    let num_extra_desc_octets = num_octets_for_grib_ints(
        spdiff
            .first_values
            .iter()
            .copied()
            .chain(std::iter::once(spdiff.minimum)),
    );
    if num_extra_desc_octets > 4 {
        return Err(EncodeError::DynamicRangeTooLarge);
    }

    trace!(
        "{} groups, group reference values of {} bits, widths {:?}, lengths {:?}",
        groups.len(),
        nbit,
        widths,
        lens
    );

    let mut descriptors = Vec::new();
    for val in spdiff
        .first_values
        .iter()
        .chain(std::iter::once(&spdiff.minimum))
    {
        grib_int_to_bytes(*val, num_extra_desc_octets, &mut descriptors)?;
    }
    let mut writer = BitWriter::new();
    writer.write_bytes(&descriptors);
    writer.write_uints(group_refs, nbit)?;
    writer.align_to_byte();
    writer.write_uints(width_codes, num_group_width_bits)?;
    writer.align_to_byte();
    writer.write_uints(len_codes, num_group_len_bits)?;
    writer.align_to_byte();
    for group in groups.iter() {
        group.write_values(&mut writer, num_reserved)?;
    }

    debug!(
        "complex packing: {} values in {} groups, R = {}, E = {}, D = {}, {} octets",
        values.len(),
        groups.len(),
        scaled.ref_val,
        config.exp,
        config.dec,
        writer.byte_len()
    );

    let template = Template5_3 {
        simple: SimplePacking {
            ref_val: scaled.ref_val,
            exp: config.exp,
            dec: config.dec,
            num_bits: nbit as u8,
        },
        orig_field_type: Table5_1::FloatingPoint.into(),
        complex: ComplexPacking {
            group_splitting_method: config.group_splitting.method().into(),
            missing_value_management: management.into(),
            primary_missing_value: config.primary_missing_value,
            secondary_missing_value: config.secondary_missing_value,
            num_groups: groups.len() as u32,
            group_width_ref: group_width_ref as u8,
            num_group_width_bits: num_group_width_bits as u8,
            group_len_ref,
            group_len_inc: 1,
            group_len_last,
            num_group_len_bits: num_group_len_bits as u8,
        },
        spatial_diff_order: order.into(),
        num_extra_desc_octets: num_extra_desc_octets as u8,
    };
    Ok((template, writer.into_bytes()))
}

mod diff;
