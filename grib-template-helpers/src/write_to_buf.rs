use crate::as_grib_signed::AsGribUnsigned;

/// A serializer that appends the GRIB2 octet representation of a value to a
/// buffer. This is the counterpart of [`TryFromSlice`](crate::TryFromSlice).
///
/// ```
/// use grib_template_helpers::{TryFromSlice, WriteToBuf};
///
/// let mut buf = Vec::new();
/// (-3_i16).write_to_buf(&mut buf);
/// 100.0_f32.write_to_buf(&mut buf);
/// assert_eq!(buf, vec![0x80, 0x03, 0x42, 0xc8, 0x00, 0x00]);
///
/// let mut pos = 0;
/// assert_eq!(i16::try_from_slice(&buf, &mut pos), Ok(-3));
/// assert_eq!(f32::try_from_slice(&buf, &mut pos), Ok(100.0));
/// ```
pub trait WriteToBuf {
    fn write_to_buf(&self, buf: &mut Vec<u8>);
}

macro_rules! add_impl_for_unsigned_integer_and_float_types {
    ($($ty:ty,)*) => ($(
        impl WriteToBuf for $ty {
            fn write_to_buf(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_be_bytes());
            }
        }
    )*);
}

add_impl_for_unsigned_integer_and_float_types![u8, u16, u32, u64, f64,];

impl WriteToBuf for f32 {
    fn write_to_buf(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&crate::ieee_f32_to_be_bytes(*self));
    }
}

macro_rules! add_impl_for_signed_integer_types {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl WriteToBuf for $ty_src {
            fn write_to_buf(&self, buf: &mut Vec<u8>) {
                let n: $ty_dst = self.as_grib_unsigned();
                buf.extend_from_slice(&n.to_be_bytes());
            }
        }
    )*);
}

add_impl_for_signed_integer_types![(i8, u8), (i16, u16), (i32, u32), (i64, u64),];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_numbers() {
        let mut buf = Vec::new();
        49_u32.write_to_buf(&mut buf);
        5_u8.write_to_buf(&mut buf);
        3_u16.write_to_buf(&mut buf);
        (-1_i8).write_to_buf(&mut buf);
        assert_eq!(buf, vec![0, 0, 0, 49, 5, 0, 3, 0x81]);
    }
}
