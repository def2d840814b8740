use std::iter;

use log::{trace, warn};

use self::{
    diff::{
        SpatialDiff1stOrderDecodeIterator, SpatialDiff2ndOrderDecodeIterator,
        SpatialDiffDecodeIterator, SpatialDifferencingExtraDescriptors,
    },
    missing::{DecodedValue, MissingCodes},
};
use crate::{
    codetables::grib2::{Table5_4, Table5_5, Table5_6},
    decoder::simple::{NonZeroSimplePackingDecoder, check_orig_field_type},
    def::grib2::template::{Template5_3, param_set::ComplexPacking},
    error::DecodeError,
    stream::BitReader,
};

/// Unpacks data template 7.3.
pub(crate) fn unpack(
    template: &Template5_3,
    num_encoded_points: usize,
    sect7_payload: &[u8],
) -> Result<Vec<f32>, DecodeError> {
    check_orig_field_type(template.orig_field_type)?;
    let complex = &template.complex;
    let (_, missing, spdiff_order) = check_code_table_entries(template)?;

    let descriptors = SpatialDifferencingExtraDescriptors::new(
        sect7_payload,
        spdiff_order.num_first_values(),
        template.num_extra_desc_octets,
    )?;
    let unpacked = decode_complex_packing(
        complex,
        missing,
        template.simple.num_bits,
        num_encoded_points,
        &sect7_payload[descriptors.len()..],
        descriptors.minimum()?,
    )?;

    let first_values = descriptors.first_values()?.into_iter();
    let spdiff_unpacked = match spdiff_order {
        Table5_6::FirstOrderSpatialDifferencing => SpatialDiffDecodeIterator::FirstOrder(
            SpatialDiff1stOrderDecodeIterator::new(unpacked.into_iter(), first_values),
        ),
        Table5_6::SecondOrderSpatialDifferencing => SpatialDiffDecodeIterator::SecondOrder(
            SpatialDiff2ndOrderDecodeIterator::new(unpacked.into_iter(), first_values),
        ),
        Table5_6::Missing => {
            return Err(DecodeError::NotSupported(
                "GRIB2 code table 5.6 (order of spatial differencing)",
                spdiff_order as u16,
            ));
        }
    };
    let decoder = NonZeroSimplePackingDecoder::new(spdiff_unpacked, &template.simple);
    Ok(decoder.collect())
}

fn check_code_table_entries(
    template: &Template5_3,
) -> Result<(Table5_4, Table5_5, Table5_6), DecodeError> {
    let complex = &template.complex;
    let splitting = Table5_4::try_from(complex.group_splitting_method)
        .ok()
        .filter(|t| *t != Table5_4::Missing)
        .ok_or(DecodeError::NotSupported(
            "GRIB2 code table 5.4 (group splitting method)",
            complex.group_splitting_method.into(),
        ))?;
    let missing = Table5_5::try_from(complex.missing_value_management)
        .ok()
        .filter(|t| *t != Table5_5::Missing)
        .ok_or(DecodeError::NotSupported(
            "GRIB2 code table 5.5 (missing value management for complex packing)",
            complex.missing_value_management.into(),
        ))?;
    let spdiff_order = Table5_6::try_from(template.spatial_diff_order)
        .ok()
        .filter(|t| *t != Table5_6::Missing)
        .ok_or(DecodeError::NotSupported(
            "GRIB2 code table 5.6 (order of spatial differencing)",
            template.spatial_diff_order.into(),
        ))?;
    Ok((splitting, missing, spdiff_order))
}

/// Reads group descriptors and group values, returning values with the group
/// reference and the overall minimum of the differences added.
fn decode_complex_packing(
    complex: &ComplexPacking,
    missing: Table5_5,
    nbit: u8,
    num_encoded_points: usize,
    data: &[u8],
    z_min: i64,
) -> Result<Vec<DecodedValue<i64>>, DecodeError> {
    let ngroup = complex.num_groups as usize;
    if ngroup > num_encoded_points {
        return Err(DecodeError::InvalidGroupLayout {
            expected: num_encoded_points,
            actual: ngroup,
        });
    }
    if nbit > 32 {
        return Err(DecodeError::NotSupported(
            "number of bits for group reference values",
            nbit.into(),
        ));
    }

    let mut reader = BitReader::new(data);
    let group_refs = reader.read_uints(nbit.into(), ngroup)?;
    reader.align_to_byte();
    let group_widths = reader
        .read_uints(complex.num_group_width_bits.into(), ngroup)?
        .into_iter()
        .map(|w| u64::from(w) + u64::from(complex.group_width_ref))
        .collect::<Vec<_>>();
    reader.align_to_byte();
    let group_len_codes = reader.read_uints(complex.num_group_len_bits.into(), ngroup)?;
    let group_lens = group_lengths(complex, group_len_codes);
    reader.align_to_byte();

    let total = group_lens
        .iter()
        .fold(0_u64, |acc, len| acc.saturating_add(*len));
    if total != num_encoded_points as u64 {
        return Err(DecodeError::InvalidGroupLayout {
            expected: num_encoded_points,
            actual: usize::try_from(total).unwrap_or(usize::MAX),
        });
    }
    trace!(
        "{} groups, group reference values of {} bits, widths {:?}, lengths {:?}",
        ngroup, nbit, group_widths, group_lens
    );

    let num_reserved = missing.num_reserved_codes();
    let ref_codes = MissingCodes::new(num_reserved, nbit.into());
    let mut values = Vec::with_capacity(num_encoded_points);
    for ((group_ref, width), len) in group_refs.into_iter().zip(group_widths).zip(group_lens) {
        let group_ref = u64::from(group_ref);
        let len = len as usize;
        if width == 0 {
            // Groups with a constant value have no data physically present.
            let value = ref_codes.classify(group_ref, |r| r as i64 + z_min);
            values.extend(iter::repeat_n(value, len));
            continue;
        }

        let width = usize::try_from(width)
            .ok()
            .filter(|w| *w <= 32)
            .ok_or(DecodeError::NotSupported(
                "group width",
                u16::try_from(width).unwrap_or(u16::MAX),
            ))?;
        let codes = MissingCodes::new(num_reserved, width);
        for _ in 0..len {
            let packed = u64::from(reader.read_uint(width)?);
            values.push(codes.classify(packed, |v| (v + group_ref) as i64 + z_min));
        }
    }

    if reader.byte_len() < data.len() {
        warn!(
            "{} octets at the end of Section 7 are ignored",
            data.len() - reader.byte_len()
        );
    }
    Ok(values)
}

// The last group length is given explicitly; the code written for it is
// ignored.
fn group_lengths(complex: &ComplexPacking, codes: Vec<u32>) -> Vec<u64> {
    let ngroup = codes.len();
    if ngroup == 0 {
        return Vec::new();
    }
    codes
        .into_iter()
        .take(ngroup - 1)
        .map(|c| {
            u64::from(complex.group_len_ref) + u64::from(c) * u64::from(complex.group_len_inc)
        })
        .chain(iter::once(u64::from(complex.group_len_last)))
        .collect()
}

mod diff;
pub(crate) mod missing;

#[cfg(test)]
mod tests {
    use super::{
        missing::DecodedValue::{Missing1, Missing2, Normal},
        *,
    };
    use crate::def::grib2::template::param_set::SimplePacking;

    fn complex_param(num_groups: u32, group_len_last: u32) -> ComplexPacking {
        ComplexPacking {
            group_splitting_method: 1,
            missing_value_management: 0,
            primary_missing_value: 0.0,
            secondary_missing_value: 0.0,
            num_groups,
            group_width_ref: 0,
            num_group_width_bits: 2,
            group_len_ref: 3,
            group_len_inc: 1,
            group_len_last,
            num_group_len_bits: 1,
        }
    }

    // group refs (4 bits): 5, 2, 9 | widths (2 bits): 0, 2, 1 |
    // lengths (1 bit): 0, 1, x -> 3, 4, 2 | values: -, [0, 3, 1, 2], [1, 0]
    const GROUPED: [u8; 5] = [0x52, 0x90, 0b0010_0100, 0b0100_0000, 0b0011_0110];

    fn grouped_data() -> Vec<u8> {
        let mut data = GROUPED.to_vec();
        data.push(0b1000_0000);
        data
    }

    #[test]
    fn decoding_groups() {
        let actual = decode_complex_packing(
            &complex_param(3, 2),
            Table5_5::NoExplicitMissingValues,
            4,
            9,
            &grouped_data(),
            -1,
        );
        let expected = vec![4, 4, 4, 1, 4, 2, 3, 9, 8]
            .into_iter()
            .map(Normal)
            .collect::<Vec<_>>();
        assert_eq!(actual, Ok(expected));
    }

    #[test]
    fn decoding_groups_with_missing_values() {
        let mut param = complex_param(3, 2);
        param.missing_value_management = 2;
        let mut data = grouped_data();
        // reference of the first group set to the primary missing value code
        data[0] = 0xf2;
        let actual = decode_complex_packing(
            &param,
            Table5_5::PrimaryAndSecondaryMissingValues,
            4,
            9,
            &data,
            0,
        );
        let expected = vec![
            Missing1,
            Missing1,
            Missing1,
            Normal(2),
            Missing1,
            Normal(3),
            Missing2,
            Missing1,
            Missing2,
        ];
        assert_eq!(actual, Ok(expected));
    }

    #[test]
    fn decoding_groups_with_inconsistent_lengths() {
        let actual = decode_complex_packing(
            &complex_param(3, 3),
            Table5_5::NoExplicitMissingValues,
            4,
            9,
            &grouped_data(),
            0,
        );
        assert_eq!(
            actual,
            Err(DecodeError::InvalidGroupLayout {
                expected: 9,
                actual: 10
            })
        );
    }

    #[test]
    fn decoding_truncated_groups() {
        let actual = decode_complex_packing(
            &complex_param(3, 2),
            Table5_5::NoExplicitMissingValues,
            4,
            9,
            &GROUPED[..4],
            0,
        );
        assert_eq!(actual, Err(DecodeError::TruncatedStream));
    }

    #[test]
    fn decoding_zero_groups() {
        let actual = decode_complex_packing(
            &complex_param(0, 0),
            Table5_5::NoExplicitMissingValues,
            0,
            0,
            &[],
            0,
        );
        assert_eq!(actual, Ok(vec![]));
    }

    fn template(
        spatial_diff_order: u8,
        complex: ComplexPacking,
        num_bits: u8,
    ) -> Template5_3 {
        Template5_3 {
            simple: SimplePacking {
                ref_val: 0.0,
                exp: 0,
                dec: 0,
                num_bits,
            },
            orig_field_type: 0,
            complex,
            spatial_diff_order,
            num_extra_desc_octets: 1,
        }
    }

    #[test]
    fn unpacking_with_first_order_spatial_differencing() {
        // first value 20, minimum -1
        let mut payload = vec![0x14, 0x81];
        payload.extend(grouped_data());
        let actual = unpack(&template(1, complex_param(3, 2), 4), 9, &payload);
        // residuals: 4, 4, 4, 1, 4, 2, 3, 9, 8
        let expected = vec![20., 24., 28., 29., 33., 35., 38., 47., 55.];
        assert_eq!(actual, Ok(expected));
    }

    #[test]
    fn unpacking_with_unsupported_spatial_differencing_order() {
        let payload = vec![0x14, 0x00, 0x81];
        let actual = unpack(&template(3, complex_param(3, 2), 4), 9, &payload);
        assert_eq!(
            actual,
            Err(DecodeError::NotSupported(
                "GRIB2 code table 5.6 (order of spatial differencing)",
                3
            ))
        );
    }

    #[test]
    fn unpacking_with_unsupported_missing_value_management() {
        let mut param = complex_param(3, 2);
        param.missing_value_management = 3;
        let actual = unpack(&template(1, param, 4), 9, &[0x14, 0x81]);
        assert!(matches!(actual, Err(DecodeError::NotSupported(_, 3))));
    }
}
