/// The bit map of Section 6: one bit per grid point, most significant bit
/// first, 1 meaning that a value is present in Section 7.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    bytes: Box<[u8]>,
}

const MASK: u8 = 0b1000_0000;

impl Bitmap {
    /// Wraps the octets following the bit-map indicator in Section 6.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Builds a bit map from per-point presence flags.
    pub fn from_presence<I>(presence: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bytes = Vec::new();
        for (i, present) in presence.into_iter().enumerate() {
            if i % 8 == 0 {
                bytes.push(0);
            }
            if present {
                bytes[i / 8] |= MASK >> (i % 8);
            }
        }
        Self::from_bytes(bytes)
    }

    /// Builds a bit map marking NaN values as absent.
    pub fn from_values(values: &[f32]) -> Self {
        Self::from_presence(values.iter().map(|v| !v.is_nan()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of grid points this bit map can describe.
    pub fn num_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Returns `false` for points beyond the end of the bit map.
    pub fn is_present(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .is_some_and(|byte| byte & (MASK >> (index % 8)) != 0)
    }

    /// Presence flags of the first `num_points` grid points.
    pub fn iter(&self, num_points: usize) -> impl Iterator<Item = bool> + '_ {
        (0..num_points).map(|i| self.is_present(i))
    }

    /// Number of present values among the first `num_points` grid points.
    pub fn count_present(&self, num_points: usize) -> usize {
        let full_octets = (num_points / 8).min(self.bytes.len());
        let counted = self.bytes[..full_octets]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum::<usize>();
        counted + self.iter(num_points).skip(full_octets * 8).filter(|p| *p).count()
    }
}
