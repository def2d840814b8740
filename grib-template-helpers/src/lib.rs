//! Building blocks for fixed-layout GRIB2 template parameter blocks.
//!
//! Every multi-octet number in GRIB2 is big-endian. Signed integers use the
//! GRIB sign-magnitude convention (the most significant bit is the sign, the
//! remaining bits are the absolute value) rather than two's complement, and
//! floating-point numbers are IEEE 754 single precision.

pub use as_grib_signed::{AsGribSigned, AsGribUnsigned};
pub use ieee::{ieee_f32_from_be_bytes, ieee_f32_to_be_bytes};
pub use try_from_slice::{TryFromSlice, TryFromSliceResult};
pub use write_to_buf::WriteToBuf;

mod as_grib_signed;
mod ieee;
mod try_from_slice;
mod write_to_buf;
