//! Definitions of parameters contained in GRIB2 data.

pub mod grib2;
