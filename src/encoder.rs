use grib_template_helpers::WriteToBuf;
use log::debug;

pub use self::{
    complex::{ComplexPackingConfig, DEFAULT_GROUP_LEN, DEFAULT_MISSING_VALUE, GroupSplitting},
    simple::SimplePackingConfig,
};
use crate::{
    bitmap::Bitmap,
    def::grib2::{SectionHeader, Section6Payload},
    drs::{DataRepresentationSection, DataRepresentationTemplate},
    error::*,
};

/// Packing algorithm and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum PackingConfig {
    Simple(SimplePackingConfig),
    ComplexSpatial(ComplexPackingConfig),
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self::Simple(SimplePackingConfig::default())
    }
}

impl From<SimplePackingConfig> for PackingConfig {
    fn from(value: SimplePackingConfig) -> Self {
        Self::Simple(value)
    }
}

impl From<ComplexPackingConfig> for PackingConfig {
    fn from(value: ComplexPackingConfig) -> Self {
        Self::ComplexSpatial(value)
    }
}

/// Sections 5, 6 and 7 produced by [`encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSubmessage {
    drs: DataRepresentationSection,
    bitmap: Option<Bitmap>,
    sect7_payload: Box<[u8]>,
    sect5: Box<[u8]>,
    sect6_len: u32,
    sect7_len: u32,
}

impl EncodedSubmessage {
    pub fn drs(&self) -> &DataRepresentationSection {
        &self.drs
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Octets of Section 7 following its section header.
    pub fn sect7_payload(&self) -> &[u8] {
        &self.sect7_payload
    }

    pub fn sect5_bytes(&self) -> Vec<u8> {
        self.sect5.to_vec()
    }

    pub fn sect6_bytes(&self) -> Vec<u8> {
        let (indicator, bitmap) = match &self.bitmap {
            Some(bitmap) => (Section6Payload::BITMAP_FOLLOWS, bitmap.as_bytes()),
            None => (Section6Payload::NO_BITMAP, &[][..]),
        };
        let mut buf = section_header(6, self.sect6_len);
        Section6Payload {
            bitmap_indicator: indicator,
        }
        .write_to_buf(&mut buf);
        buf.extend_from_slice(bitmap);
        buf
    }

    pub fn sect7_bytes(&self) -> Vec<u8> {
        let mut buf = section_header(7, self.sect7_len);
        buf.extend_from_slice(&self.sect7_payload);
        buf
    }
}

fn section_header(sect_num: u8, len: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    SectionHeader { len, sect_num }.write_to_buf(&mut buf);
    buf
}

fn section_len(sect_num: u8, payload_len: usize) -> Result<u32, EncodeError> {
    SectionHeader::SIZE
        .checked_add(payload_len)
        .and_then(|len| u32::try_from(len).ok())
        .ok_or(EncodeError::SectionTooLarge(sect_num))
}

/// Packs `num_points_total` grid values.
///
/// Points the bit map marks as absent are not packed and their values are
/// ignored.
pub fn encode(
    values: &[f32],
    num_points_total: usize,
    bitmap: Option<&Bitmap>,
    config: &PackingConfig,
) -> Result<EncodedSubmessage, GribError> {
    if values.len() != num_points_total {
        return Err(EncodeError::LengthMismatch.into());
    }
    let present = match bitmap {
        Some(bitmap) => {
            if bitmap.num_bits() < num_points_total {
                return Err(EncodeError::LengthMismatch.into());
            }
            bitmap
                .iter(num_points_total)
                .zip(values)
                .filter_map(|(present, v)| present.then_some(*v))
                .collect::<Vec<_>>()
        }
        None => values.to_vec(),
    };
    let num_encoded_points =
        u32::try_from(present.len()).map_err(|_| EncodeError::LengthMismatch)?;

    debug!(
        "encoding {} of {} grid points with {:?}",
        num_encoded_points, num_points_total, config
    );
    let (template, sect7_payload) = DataRepresentationTemplate::pack(&present, config)?;
    let drs = DataRepresentationSection::new(num_encoded_points, template);
    let sect5 = drs.pack()?;
    let sect6_len = section_len(6, 1 + bitmap.map_or(0, |b| b.as_bytes().len()))?;
    let sect7_len = section_len(7, sect7_payload.len())?;
    Ok(EncodedSubmessage {
        drs,
        bitmap: bitmap.cloned(),
        sect7_payload: sect7_payload.into_boxed_slice(),
        sect5: sect5.into_boxed_slice(),
        sect6_len,
        sect7_len,
    })
}

pub(crate) mod complex;
pub(crate) mod simple;
