use num::ToPrimitive;

use self::DecodedValue::{Missing1, Missing2, Normal};

/// A value read from a group, before or after spatial differencing is undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodedValue<N: ToPrimitive> {
    Normal(N),
    Missing1,
    Missing2,
}

impl<N: ToPrimitive> ToPrimitive for DecodedValue<N> {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Normal(v) => v.to_i64(),
            Missing1 => None,
            Missing2 => None,
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            Normal(v) => v.to_u64(),
            Missing1 => None,
            Missing2 => None,
        }
    }

    fn to_f32(&self) -> Option<f32> {
        match self {
            Normal(v) => v.to_f32(),
            Missing1 => Some(f32::NAN),
            Missing2 => Some(f32::NAN),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            Normal(v) => v.to_f64(),
            Missing1 => Some(f64::NAN),
            Missing2 => Some(f64::NAN),
        }
    }
}

/// Codes reserved for missing values in a field `width` bits wide.
///
/// With missing value management 1 the largest code means "primary missing";
/// with management 2 the one just below it additionally means "secondary
/// missing". `width` must be 64 or less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MissingCodes {
    num_reserved: u64,
    max: u64,
}

impl MissingCodes {
    pub(crate) fn new(num_reserved: u64, width: usize) -> Self {
        let max = if width >= 64 {
            u64::MAX
        } else {
            (1_u64 << width).wrapping_sub(1)
        };
        Self { num_reserved, max }
    }

    pub(crate) fn primary(&self) -> u64 {
        self.max
    }

    pub(crate) fn secondary(&self) -> u64 {
        self.max.wrapping_sub(1)
    }

    /// Classifies a raw code; codes that are not reserved are passed to
    /// `normal`.
    pub(crate) fn classify<N, F>(&self, code: u64, normal: F) -> DecodedValue<N>
    where
        N: ToPrimitive,
        F: FnOnce(u64) -> N,
    {
        if self.num_reserved >= 1 && code == self.primary() {
            Missing1
        } else if self.num_reserved == 2 && code == self.secondary() {
            Missing2
        } else {
            Normal(normal(code))
        }
    }
}
