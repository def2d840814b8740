//! Code tables referenced by data representation templates 5.0 and 5.3.

pub mod grib2;
