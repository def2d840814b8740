use num::ToPrimitive;

use crate::{
    codetables::grib2::Table5_1,
    def::grib2::template::{Template5_0, param_set::SimplePacking},
    error::DecodeError,
    stream::{BitReader, FixedValueIterator},
};

pub(crate) enum SimplePackingDecoder<I> {
    // Based on the implementation of wgrib2, if nbits equals 0, return a constant
    // field where the data value at each grid point is the reference value.
    ZeroLength(FixedValueIterator<f32>),
    NonZeroLength(NonZeroSimplePackingDecoder<I>),
}

impl<I, N> Iterator for SimplePackingDecoder<I>
where
    I: Iterator<Item = N>,
    N: ToPrimitive,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::ZeroLength(inner) => inner.next(),
            Self::NonZeroLength(inner) => inner.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::ZeroLength(inner) => inner.size_hint(),
            Self::NonZeroLength(inner) => inner.size_hint(),
        }
    }
}

/// Unpacks data template 7.0.
pub(crate) fn unpack(
    template: &Template5_0,
    num_encoded_points: usize,
    sect7_payload: &[u8],
) -> Result<Vec<f32>, DecodeError> {
    check_orig_field_type(template.orig_field_type)?;
    let param = &template.simple;

    let decoder = if param.num_bits == 0 {
        SimplePackingDecoder::ZeroLength(FixedValueIterator::new(
            param.zero_bit_reference_value(),
            num_encoded_points,
        ))
    } else {
        let mut reader = BitReader::new(sect7_payload);
        let encoded = reader.read_uints(param.num_bits.into(), num_encoded_points)?;
        SimplePackingDecoder::NonZeroLength(NonZeroSimplePackingDecoder::new(
            encoded.into_iter(),
            param,
        ))
    };
    Ok(decoder.collect())
}

pub(crate) fn check_orig_field_type(orig_field_type: u8) -> Result<Table5_1, DecodeError> {
    match Table5_1::try_from(orig_field_type) {
        Ok(t) => Ok(t),
        Err(_) => Err(DecodeError::NotSupported(
            "GRIB2 code table 5.1 (type of original field values)",
            orig_field_type.into(),
        )),
    }
}

pub(crate) struct NonZeroSimplePackingDecoder<I> {
    iter: I,
    param: SimplePacking,
}

impl<I> NonZeroSimplePackingDecoder<I> {
    pub(crate) fn new(iter: I, param: &SimplePacking) -> Self {
        Self {
            iter,
            param: param.clone(),
        }
    }
}

impl<I: Iterator<Item = N>, N: ToPrimitive> Iterator for NonZeroSimplePackingDecoder<I> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let encoded = self.iter.next()?;
        let value = match encoded.to_f64() {
            Some(encoded) => self.param.scale(encoded),
            None => f32::NAN,
        };
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}
