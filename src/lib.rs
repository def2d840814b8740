//! Packing and unpacking of GRIB2 grid point data.
//!
//! This crate reads and writes the Data Representation Section (Section 5)
//! and the data it describes in the Data Section (Section 7), optionally
//! combined with the bit map of Section 6. Two data representation templates
//! are supported: 5.0 (simple packing) and 5.3 (complex packing and spatial
//! differencing).
//!
//! ```
//! use grib_packing::{ComplexPackingConfig, Grib2SubmessageDecoder, PackingConfig, encode};
//!
//! let values = (0..100).map(|i| (i as f32 * 0.1).sin() * 10.0).collect::<Vec<_>>();
//! let config = PackingConfig::from(ComplexPackingConfig {
//!     dec: 2,
//!     ..Default::default()
//! });
//! let encoded = encode(&values, values.len(), None, &config)?;
//!
//! let decoder = Grib2SubmessageDecoder::new(
//!     values.len(),
//!     encoded.sect5_bytes(),
//!     encoded.sect6_bytes(),
//!     encoded.sect7_bytes(),
//! )?;
//! let decoded = decoder.dispatch()?;
//! assert!(decoded.iter().zip(&values).all(|(a, b)| (a - b).abs() <= 0.0051));
//! # Ok::<(), grib_packing::GribError>(())
//! ```

mod bitmap;
pub mod codetables;
mod decoder;
pub mod def;
mod drs;
mod encoder;
mod error;
mod helpers;
mod stream;

pub use crate::{
    bitmap::Bitmap,
    decoder::{Grib2SubmessageDecoder, decode},
    drs::*,
    encoder::{
        ComplexPackingConfig, DEFAULT_GROUP_LEN, DEFAULT_MISSING_VALUE, EncodedSubmessage,
        GroupSplitting, PackingConfig, SimplePackingConfig, encode,
    },
    error::*,
};
