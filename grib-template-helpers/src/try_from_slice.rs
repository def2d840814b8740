use crate::as_grib_signed::AsGribSigned;

/// A deserializer that reads a slice and stores output data in a struct.
///
/// # Examples
///
/// ```
/// use grib_template_helpers::{TryFromSlice, TryFromSliceResult};
///
/// #[derive(Debug, PartialEq)]
/// struct Header {
///     len: u32,
///     sect_num: u8,
/// }
///
/// impl TryFromSlice for Header {
///     fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self> {
///         let len = u32::try_from_slice(slice, pos)?;
///         let sect_num = u8::try_from_slice(slice, pos)?;
///         Ok(Self { len, sect_num })
///     }
/// }
///
/// let mut pos = 0;
/// let actual = Header::try_from_slice(&[0, 0, 0, 21, 5], &mut pos);
/// assert_eq!(actual, Ok(Header { len: 21, sect_num: 5 }));
/// assert_eq!(pos, 5);
///
/// let mut pos = 0;
/// assert!(Header::try_from_slice(&[0, 0, 0], &mut pos).is_err());
/// ```
pub trait TryFromSlice {
    /// Performs reading. The `pos` argument is a variable storing the starting
    /// position for reading within the slice.
    ///
    /// As reading proceeds, this `pos` changes, allowing the user to track how
    /// far they have read.
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self>
    where
        Self: Sized;
}

pub type TryFromSliceResult<T> = Result<T, &'static str>;

impl<const N: usize> TryFromSlice for [u8; N] {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<[u8; N]> {
        let start = *pos;
        let end = start + N;
        let bytes = slice
            .get(start..end)
            .ok_or("slice length is too short")?
            .try_into()
            .map_err(|_| "slice length is too short")?;
        *pos = end;
        Ok(bytes)
    }
}

macro_rules! add_impl_for_unsigned_integer_types {
    ($($ty:ty,)*) => ($(
        impl TryFromSlice for $ty {
            fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<$ty> {
                let n = <$ty>::from_be_bytes(TryFromSlice::try_from_slice(slice, pos)?);
                Ok(n)
            }
        }
    )*);
}

add_impl_for_unsigned_integer_types![u8, u16, u32, u64,];

macro_rules! add_impl_for_signed_integer_types {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl TryFromSlice for $ty_dst {
            fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<$ty_dst> {
                let n = <$ty_src>::from_be_bytes(TryFromSlice::try_from_slice(slice, pos)?)
                    .as_grib_signed();
                Ok(n)
            }
        }
    )*);
}

add_impl_for_signed_integer_types![(u8, i8), (u16, i16), (u32, i32), (u64, i64),];

impl TryFromSlice for f32 {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<f32> {
        let bytes: [u8; 4] = TryFromSlice::try_from_slice(slice, pos)?;
        crate::ieee_f32_from_be_bytes(&bytes)
    }
}

impl TryFromSlice for f64 {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<f64> {
        Ok(f64::from_be_bytes(TryFromSlice::try_from_slice(slice, pos)?))
    }
}
