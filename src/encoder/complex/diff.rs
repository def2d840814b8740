use crate::codetables::grib2::Table5_6;

/// Result of spatial differencing: the leading values kept as extra
/// descriptors, the overall minimum of the differences, and the differences
/// with the minimum removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpatialDifferences {
    pub(crate) first_values: Vec<i64>,
    pub(crate) minimum: i64,
    /// Non-negative residuals. The slots of the first values are zero.
    pub(crate) residuals: Vec<u64>,
}

/// Takes differences of `order` over `vals`, which must not contain missing
/// values.
pub(crate) fn spatial_differencing(vals: &[i64], order: Table5_6) -> SpatialDifferences {
    let num_first_values = order.num_first_values();
    let diffs = match order {
        Table5_6::FirstOrderSpatialDifferencing => vals
            .iter()
            .enumerate()
            .map(|(i, v)| if i < 1 { 0 } else { v - vals[i - 1] })
            .collect::<Vec<_>>(),
        Table5_6::SecondOrderSpatialDifferencing => vals
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if i < 2 {
                    0
                } else {
                    v - 2 * vals[i - 1] + vals[i - 2]
                }
            })
            .collect::<Vec<_>>(),
        Table5_6::Missing => vec![0; vals.len()],
    };

    let minimum = diffs
        .iter()
        .skip(num_first_values)
        .min()
        .copied()
        .unwrap_or(0);
    let residuals = diffs
        .iter()
        .enumerate()
        .map(|(i, d)| {
            if i < num_first_values {
                0
            } else {
                (d - minimum) as u64
            }
        })
        .collect();

    let mut first_values = vals
        .iter()
        .take(num_first_values)
        .copied()
        .collect::<Vec<_>>();
    first_values.resize(num_first_values, 0);

    SpatialDifferences {
        first_values,
        minimum,
        residuals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_order_differencing() {
        let actual = spatial_differencing(
            &[20, 24, 28, 29, 33],
            Table5_6::FirstOrderSpatialDifferencing,
        );
        let expected = SpatialDifferences {
            first_values: vec![20],
            minimum: 1,
            residuals: vec![0, 3, 3, 0, 3],
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn second_order_differencing() {
        let actual = spatial_differencing(
            &[10, 12, 15, 18, 18],
            Table5_6::SecondOrderSpatialDifferencing,
        );
        let expected = SpatialDifferences {
            first_values: vec![10, 12],
            minimum: -3,
            residuals: vec![0, 0, 4, 3, 0],
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn differencing_fewer_values_than_order() {
        let actual = spatial_differencing(&[7], Table5_6::SecondOrderSpatialDifferencing);
        let expected = SpatialDifferences {
            first_values: vec![7, 0],
            minimum: 0,
            residuals: vec![0],
        };
        assert_eq!(actual, expected);
    }
}
