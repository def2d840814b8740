use crate::error::{DecodeError, EncodeError};

/// Number of octets needed to hold `num_bits` bits.
#[inline]
pub(crate) fn num_octets<N>(num_bits: N) -> usize
where
    usize: From<N>,
{
    usize::from(num_bits).div_ceil(8)
}

/// Number of bits needed to represent `val` as an unsigned integer; 0 for 0.
#[inline]
pub(crate) fn num_bits_for(val: u64) -> usize {
    (u64::BITS - val.leading_zeros()) as usize
}

/// Reads a sign-magnitude integer stored in 1 to 4 octets.
pub(crate) fn grib_int_from_bytes(bytes: &[u8]) -> Result<i64, DecodeError> {
    if bytes.is_empty() || bytes.len() > 4 {
        return Err(DecodeError::NotSupported(
            "number of octets of a signed integer",
            bytes.len() as u16,
        ));
    }
    let mut buf = [0_u8; 4];
    buf[4 - bytes.len()..].copy_from_slice(bytes);
    let raw = u32::from_be_bytes(buf);
    let sign_bit = 1_u32 << (bytes.len() * 8 - 1);
    let val = if raw & sign_bit != 0 {
        -i64::from(raw & !sign_bit)
    } else {
        i64::from(raw)
    };
    Ok(val)
}

/// Writes `val` as a sign-magnitude integer occupying `num_octets` octets.
pub(crate) fn grib_int_to_bytes(
    val: i64,
    num_octets: usize,
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if num_octets == 0 || num_octets > 4 {
        return Err(EncodeError::InvalidParameter(
            "signed integers must occupy 1 to 4 octets",
        ));
    }
    let abs = val.unsigned_abs();
    let magnitude_bits = num_octets * 8 - 1;
    if num_bits_for(abs) > magnitude_bits {
        return Err(EncodeError::ValueTooWide {
            value: abs,
            width: magnitude_bits,
        });
    }
    let mut raw = abs as u32;
    if val < 0 {
        raw |= 1 << magnitude_bits;
    }
    buf.extend_from_slice(&raw.to_be_bytes()[4 - num_octets..]);
    Ok(())
}

/// Smallest number of octets (at least 1) holding every value in `vals` as a
/// sign-magnitude integer.
pub(crate) fn num_octets_for_grib_ints<I>(vals: I) -> usize
where
    I: IntoIterator<Item = i64>,
{
    let max_abs = vals.into_iter().map(i64::unsigned_abs).max().unwrap_or(0);
    num_octets(num_bits_for(max_abs) + 1).max(1)
}
