use super::missing::DecodedValue::{self, Normal};
use crate::{error::DecodeError, helpers::grib_int_from_bytes};

/// Octets 6-ww of data template 7.3: the first values of the original field
/// followed by the overall minimum of the differences.
pub(crate) struct SpatialDifferencingExtraDescriptors<'a> {
    slice: &'a [u8],
    num_octets: usize,
}

impl<'a> SpatialDifferencingExtraDescriptors<'a> {
    pub(crate) fn new(
        parent_slice: &'a [u8],
        num_first_values: usize,
        num_octets: u8,
    ) -> Result<Self, DecodeError> {
        if num_octets == 0 || num_octets > 4 {
            return Err(DecodeError::NotSupported(
                "number of octets for extra descriptors",
                num_octets.into(),
            ));
        }
        let num_octets = usize::from(num_octets);
        let byte_length = (num_first_values + 1) * num_octets;
        let slice = parent_slice
            .get(..byte_length)
            .ok_or(DecodeError::TruncatedStream)?;

        Ok(Self { slice, num_octets })
    }

    // total number of octets for descriptors
    pub(crate) fn len(&self) -> usize {
        self.slice.len()
    }

    // overall minimum of the differences
    pub(crate) fn minimum(&self) -> Result<i64, DecodeError> {
        grib_int_from_bytes(&self.slice[self.first_value_end_pos()..])
    }

    pub(crate) fn first_values(&self) -> Result<Vec<i64>, DecodeError> {
        self.slice[..self.first_value_end_pos()]
            .chunks_exact(self.num_octets)
            .map(grib_int_from_bytes)
            .collect()
    }

    fn first_value_end_pos(&self) -> usize {
        self.len() - self.num_octets
    }
}

pub(crate) enum SpatialDiffDecodeIterator<I, J> {
    FirstOrder(SpatialDiff1stOrderDecodeIterator<I, J>),
    SecondOrder(SpatialDiff2ndOrderDecodeIterator<I, J>),
}

impl<I, J> Iterator for SpatialDiffDecodeIterator<I, J>
where
    I: Iterator<Item = DecodedValue<i64>>,
    J: Iterator<Item = i64>,
{
    type Item = DecodedValue<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::FirstOrder(iter) => iter.next(),
            Self::SecondOrder(iter) => iter.next(),
        }
    }
}

// Missing values are passed through and do not take part in the
// reconstruction. Sums wrap so that corrupted input cannot cause a panic.
pub(crate) struct SpatialDiff1stOrderDecodeIterator<I, J> {
    iter: I,
    first_values: J,
    count: u32,
    prev: i64,
}

impl<I, J> SpatialDiff1stOrderDecodeIterator<I, J> {
    pub(crate) fn new(iter: I, first_values: J) -> Self {
        Self {
            iter,
            first_values,
            count: 0,
            prev: 0,
        }
    }
}

impl<I, J> Iterator for SpatialDiff1stOrderDecodeIterator<I, J>
where
    I: Iterator<Item = DecodedValue<i64>>,
    J: Iterator<Item = i64>,
{
    type Item = DecodedValue<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            None => None,
            Some(Normal(v)) => match self.count {
                0 => {
                    self.prev = self.first_values.next().unwrap_or(v);
                    self.count += 1;
                    Some(Normal(self.prev))
                }
                _ => {
                    let v = v.wrapping_add(self.prev);
                    self.prev = v;
                    Some(Normal(v))
                }
            },
            Some(missing) => Some(missing),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

pub(crate) struct SpatialDiff2ndOrderDecodeIterator<I, J> {
    iter: I,
    first_values: J,
    count: u32,
    prev1: i64,
    prev2: i64,
}

impl<I, J> SpatialDiff2ndOrderDecodeIterator<I, J> {
    pub(crate) fn new(iter: I, first_values: J) -> Self {
        Self {
            iter,
            first_values,
            count: 0,
            prev1: 0,
            prev2: 0,
        }
    }
}

impl<I, J> Iterator for SpatialDiff2ndOrderDecodeIterator<I, J>
where
    I: Iterator<Item = DecodedValue<i64>>,
    J: Iterator<Item = i64>,
{
    type Item = DecodedValue<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            None => None,
            Some(Normal(v)) => match self.count {
                0 => {
                    self.prev2 = self.first_values.next().unwrap_or(v);
                    self.count += 1;
                    Some(Normal(self.prev2))
                }
                1 => {
                    self.prev1 = self.first_values.next().unwrap_or(v);
                    self.count += 1;
                    Some(Normal(self.prev1))
                }
                _ => {
                    let v = v
                        .wrapping_add(self.prev1.wrapping_mul(2))
                        .wrapping_sub(self.prev2);
                    self.prev2 = self.prev1;
                    self.prev1 = v;
                    Some(Normal(v))
                }
            },
            Some(missing) => Some(missing),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::missing::DecodedValue::{Missing1, Missing2},
        *,
    };

    macro_rules! test_spdiff_minimum_value {
        ($(($name:ident, $num_octets:expr, $input:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                let input = $input;
                let descriptors =
                    SpatialDifferencingExtraDescriptors::new(&input, 2, $num_octets).unwrap();
                assert_eq!(descriptors.len(), 3 * $num_octets);
                assert_eq!(descriptors.minimum(), Ok($expected));
            }
        )*);
    }

    test_spdiff_minimum_value! {
        (
            spdiff_minimum_value_when_num_octets_is_1,
            1,
            vec![0x00, 0x00, 0x81, 0xff],
            -1
        ),
        (
            spdiff_minimum_value_when_num_octets_is_2,
            2,
            vec![0x00, 0x00, 0x00, 0x00, 0x80, 0x10, 0xff],
            -0x10
        ),
        (
            spdiff_minimum_value_when_num_octets_is_3,
            3,
            vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0xff],
            0x100
        ),
        (
            spdiff_minimum_value_when_num_octets_is_4,
            4,
            vec![0; 8].into_iter().chain(vec![0x80, 0x00, 0x10, 0x00, 0xff]).collect::<Vec<_>>(),
            -0x1000
        ),
    }

    #[test]
    fn spdiff_first_values() {
        let input = [0x00, 0x0a, 0x80, 0x05, 0x00, 0x02];
        let descriptors = SpatialDifferencingExtraDescriptors::new(&input, 2, 2).unwrap();
        assert_eq!(descriptors.first_values(), Ok(vec![10, -5]));
        assert_eq!(descriptors.minimum(), Ok(2));
    }

    #[test]
    fn spdiff_descriptors_with_unsupported_octets() {
        let input = [0; 20];
        assert!(SpatialDifferencingExtraDescriptors::new(&input, 1, 0).is_err());
        assert!(SpatialDifferencingExtraDescriptors::new(&input, 1, 5).is_err());
    }

    #[test]
    fn spdiff_descriptors_from_too_short_slice() {
        let input = [0; 5];
        assert_eq!(
            SpatialDifferencingExtraDescriptors::new(&input, 2, 2).map(|d| d.len()),
            Err(DecodeError::TruncatedStream)
        );
    }

    #[test]
    fn first_order_spatial_differencing_decoding() {
        let input = vec![Normal(0), Normal(3), Missing1, Normal(-2), Normal(4)];
        let iter = SpatialDiff1stOrderDecodeIterator::new(input.into_iter(), vec![100].into_iter());
        let actual = iter.collect::<Vec<_>>();
        assert_eq!(
            actual,
            vec![Normal(100), Normal(103), Missing1, Normal(101), Normal(105)]
        );
    }

    #[test]
    fn second_order_spatial_differencing_decoding() {
        let input = vec![
            Normal(0),
            Missing2,
            Normal(0),
            Normal(1),
            Normal(0),
            Missing1,
            Normal(-3),
        ];
        let iter =
            SpatialDiff2ndOrderDecodeIterator::new(input.into_iter(), vec![10, 12].into_iter());
        let actual = iter.collect::<Vec<_>>();
        assert_eq!(
            actual,
            vec![
                Normal(10),
                Missing2,
                Normal(12),
                Normal(15),
                Normal(18),
                Missing1,
                Normal(18),
            ]
        );
    }
}
