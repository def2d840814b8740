use log::debug;

use crate::{
    codetables::grib2::Table5_1,
    def::grib2::template::{Template5_0, param_set::SimplePacking},
    error::EncodeError,
    helpers::num_bits_for,
    stream::BitWriter,
};

/// Parameters of simple packing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SimplePackingConfig {
    /// Decimal scale factor (D). Values are kept to `10^-D` precision.
    pub dec: i16,
    /// Binary scale factor (E). Scaled values are divided by `2^E` before
    /// packing.
    pub exp: i16,
}

impl SimplePackingConfig {
    pub fn new(dec: i16, exp: i16) -> Self {
        Self { dec, exp }
    }

    fn validate(&self) -> Result<(), EncodeError> {
        check_scale_factors(self.dec, self.exp)
    }
}

/// Scale factors are written as 16-bit sign-magnitude integers, which cannot
/// hold `i16::MIN`.
pub(crate) fn check_scale_factors(dec: i16, exp: i16) -> Result<(), EncodeError> {
    if dec == i16::MIN {
        return Err(EncodeError::InvalidParameter(
            "decimal scale factor must be within -32767..=32767",
        ));
    }
    if exp == i16::MIN {
        return Err(EncodeError::InvalidParameter(
            "binary scale factor must be within -32767..=32767",
        ));
    }
    Ok(())
}

/// Integers produced by decimal and binary scaling, relative to a common
/// reference value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScaledValues {
    pub(crate) ref_val: f32,
    pub(crate) ints: Vec<Option<u32>>,
}

/// Applies `X = round((round(Y * 10^D) - R) / 2^E)`, where `R` is the minimum
/// of the decimally scaled values. `None` entries are carried through and do
/// not take part in choosing `R`.
pub(crate) fn scale_values<I>(values: I, dec: i16, exp: i16) -> Result<ScaledValues, EncodeError>
where
    I: IntoIterator<Item = Option<f32>>,
{
    let dec_factor = 10_f64.powi(dec.into());
    let scaled = values
        .into_iter()
        .map(|v| v.map(|v| (f64::from(v) * dec_factor).round()))
        .collect::<Vec<_>>();
    if scaled.iter().flatten().any(|v| !v.is_finite()) {
        return Err(EncodeError::DynamicRangeTooLarge);
    }

    let min = scaled
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let ref_val = if min.is_finite() { f32_at_or_below(min) } else { 0.0 };
    if !ref_val.is_finite() {
        return Err(EncodeError::DynamicRangeTooLarge);
    }

    let bin_factor = 2_f64.powi(-i32::from(exp));
    let ints = scaled
        .into_iter()
        .map(|v| {
            v.map(|v| {
                let x = ((v - f64::from(ref_val)) * bin_factor).round().max(0.0);
                if x > f64::from(u32::MAX) {
                    Err(EncodeError::DynamicRangeTooLarge)
                } else {
                    Ok(x as u32)
                }
            })
            .transpose()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ScaledValues { ref_val, ints })
}

/// Largest f32 not greater than `val`, so that no scaled value lies below the
/// reference value.
fn f32_at_or_below(val: f64) -> f32 {
    let nearest = val as f32;
    if f64::from(nearest) <= val {
        nearest
    } else if nearest > 0.0 {
        f32::from_bits(nearest.to_bits() - 1)
    } else if nearest < 0.0 {
        f32::from_bits(nearest.to_bits() + 1)
    } else {
        -f32::from_bits(1)
    }
}

/// Rejects NaN and infinite values, reporting the index of the first one.
pub(crate) fn check_finite(values: &[f32]) -> Result<(), EncodeError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) if values[i].is_nan() => Err(EncodeError::UnexpectedMissingValue(i)),
        Some(i) => Err(EncodeError::NonFiniteValue(i)),
        None => Ok(()),
    }
}

/// Packs values with data template 7.0.
pub(crate) fn pack(
    values: &[f32],
    config: &SimplePackingConfig,
) -> Result<(Template5_0, Vec<u8>), EncodeError> {
    config.validate()?;
    check_finite(values)?;
    let scaled = scale_values(values.iter().map(|v| Some(*v)), config.dec, config.exp)?;
    let ints = scaled.ints.into_iter().flatten().collect::<Vec<_>>();
    let max = ints.iter().max().copied().unwrap_or(0);
    let num_bits = num_bits_for(max.into());

    let mut writer = BitWriter::new();
    writer.write_uints(ints, num_bits)?;
    debug!(
        "simple packing: {} values, R = {}, E = {}, D = {}, {} bits per value",
        values.len(),
        scaled.ref_val,
        config.exp,
        config.dec,
        num_bits
    );

    let template = Template5_0 {
        simple: SimplePacking {
            ref_val: scaled.ref_val,
            exp: config.exp,
            dec: config.dec,
            num_bits: num_bits as u8,
        },
        orig_field_type: Table5_1::FloatingPoint.into(),
    };
    Ok((template, writer.into_bytes()))
}
