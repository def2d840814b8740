/// Interprets an unsigned integer as a GRIB sign-magnitude signed integer.
pub trait AsGribSigned<I> {
    fn as_grib_signed(&self) -> I;
}

/// Inverse of [`AsGribSigned`].
pub trait AsGribUnsigned<U> {
    fn as_grib_unsigned(&self) -> U;
}

macro_rules! add_impl_for_ints {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl AsGribSigned<$ty_dst> for $ty_src {
            fn as_grib_signed(&self) -> $ty_dst {
                if self.leading_zeros() == 0 {
                    let abs = (self << 1 >> 1) as $ty_dst;
                    -abs
                } else {
                    *self as $ty_dst
                }
            }
        }

        impl AsGribUnsigned<$ty_src> for $ty_dst {
            fn as_grib_unsigned(&self) -> $ty_src {
                let abs = self.unsigned_abs();
                if *self < 0 {
                    abs | (1 << (<$ty_src>::BITS - 1))
                } else {
                    abs
                }
            }
        }
    )*);
}

add_impl_for_ints! {
    (u8, i8),
    (u16, i16),
    (u32, i32),
    (u64, i64),
}
