use grib_template_helpers::TryFromSlice;
use log::debug;

use self::bitmap::BitmapDecodeIterator;
use crate::{
    bitmap::Bitmap,
    def::grib2::{SectionHeader, Section6Payload},
    drs::DataRepresentationSection,
    error::*,
};

/// Decodes the payload of Section 7 into `num_points_total` grid values.
///
/// When `bitmap` is given, points marked absent are yielded as NaN and the
/// number of present points must equal the number of encoded points declared
/// in Section 5.
pub fn decode(
    drs: &DataRepresentationSection,
    sect7_payload: &[u8],
    num_points_total: usize,
    bitmap: Option<&Bitmap>,
) -> Result<Box<[f32]>, GribError> {
    let num_points_encoded = drs.num_encoded_points as usize;
    let num_points_present = match bitmap {
        Some(bitmap) => {
            if bitmap.num_bits() < num_points_total {
                return Err(DecodeError::LengthMismatch.into());
            }
            bitmap.count_present(num_points_total)
        }
        None => num_points_total,
    };
    if num_points_present != num_points_encoded {
        return Err(DecodeError::LengthMismatch.into());
    }

    debug!(
        "decoding {} of {} grid points with template 5.{}",
        num_points_encoded,
        num_points_total,
        drs.template_num()
    );
    let values = drs.template.unpack(num_points_encoded, sect7_payload)?;
    let decoded = match bitmap {
        Some(bitmap) => {
            BitmapDecodeIterator::new(bitmap, values.into_iter(), num_points_total)?.collect()
        }
        None => values,
    };
    Ok(decoded.into_boxed_slice())
}

/// Raw Sections 5, 6 and 7 of a submessage, ready to be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Grib2SubmessageDecoder {
    num_points_total: usize,
    drs: DataRepresentationSection,
    bitmap: Option<Bitmap>,
    sect7_bytes: Box<[u8]>,
}

impl Grib2SubmessageDecoder {
    /// Creates a decoder from the complete bytes of Sections 5, 6 and 7, each
    /// starting with its section header.
    pub fn new(
        num_points_total: usize,
        sect5_bytes: Vec<u8>,
        sect6_bytes: Vec<u8>,
        sect7_bytes: Vec<u8>,
    ) -> Result<Self, GribError> {
        let (drs, _) = DataRepresentationSection::unpack(&sect5_bytes)?;
        let bitmap = read_bitmap(&sect6_bytes)?;
        section_payload(&sect7_bytes, 7)?;
        Ok(Self {
            num_points_total,
            drs,
            bitmap,
            sect7_bytes: sect7_bytes.into_boxed_slice(),
        })
    }

    /// Decodes the grid values.
    pub fn dispatch(&self) -> Result<Box<[f32]>, GribError> {
        decode(
            &self.drs,
            self.sect7_payload(),
            self.num_points_total,
            self.bitmap.as_ref(),
        )
    }

    pub fn num_points_encoded(&self) -> usize {
        self.drs.num_encoded_points as usize
    }

    pub fn num_points_total(&self) -> usize {
        self.num_points_total
    }

    pub fn drs(&self) -> &DataRepresentationSection {
        &self.drs
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub(crate) fn sect7_payload(&self) -> &[u8] {
        &self.sect7_bytes[SectionHeader::SIZE..]
    }
}

/// Returns the octets following the section header, checking the section
/// number and the declared length.
fn section_payload(bytes: &[u8], sect_num: u8) -> Result<&[u8], DecodeError> {
    let mut pos = 0;
    let header =
        SectionHeader::try_from_slice(bytes, &mut pos).map_err(|_| DecodeError::TruncatedStream)?;
    if header.sect_num != sect_num {
        return Err(DecodeError::InvalidSectionNumber {
            expected: sect_num,
            actual: header.sect_num,
        });
    }
    if header.len as usize != bytes.len() {
        return Err(DecodeError::LengthMismatch);
    }
    Ok(&bytes[pos..])
}

fn read_bitmap(sect6_bytes: &[u8]) -> Result<Option<Bitmap>, DecodeError> {
    let payload = section_payload(sect6_bytes, 6)?;
    let mut pos = 0;
    let Section6Payload { bitmap_indicator } = Section6Payload::try_from_slice(payload, &mut pos)
        .map_err(|_| DecodeError::TruncatedStream)?;
    match bitmap_indicator {
        Section6Payload::BITMAP_FOLLOWS => Ok(Some(Bitmap::from_bytes(&payload[pos..]))),
        Section6Payload::NO_BITMAP => Ok(None),
        _ => Err(DecodeError::BitMapIndicatorUnsupported(bitmap_indicator)),
    }
}

mod bitmap;
pub(crate) mod complex;
pub(crate) mod simple;

#[cfg(test)]
mod tests {
    use super::*;

    const SECT5: [u8; 21] = [
        0x00, 0x00, 0x00, 0x15, 0x05, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x42, 0xc8, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00,
    ];
    const SECT7: [u8; 7] = [0x00, 0x00, 0x00, 0x07, 0x07, 0x0a, 0x80];

    fn sect6_with_bitmap(bitmap: &[u8]) -> Vec<u8> {
        let mut sect6 = vec![0x00, 0x00, 0x00, 6 + bitmap.len() as u8, 0x06, 0x00];
        sect6.extend_from_slice(bitmap);
        sect6
    }

    #[test]
    fn dispatching_without_bitmap() {
        let decoder = Grib2SubmessageDecoder::new(
            5,
            SECT5.to_vec(),
            vec![0x00, 0x00, 0x00, 0x06, 0x06, 0xff],
            SECT7.to_vec(),
        )
        .unwrap();
        assert_eq!(decoder.num_points_encoded(), 5);
        assert_eq!(decoder.bitmap(), None);
        let actual = decoder.dispatch().unwrap();
        assert_eq!(actual.to_vec(), vec![10.0, 10.0, 10.2, 10.2, 10.2]);
    }

    #[test]
    fn dispatching_with_bitmap() {
        let decoder = Grib2SubmessageDecoder::new(
            8,
            SECT5.to_vec(),
            sect6_with_bitmap(&[0b1011_0101]),
            SECT7.to_vec(),
        )
        .unwrap();
        let actual = decoder.dispatch().unwrap();
        let expected = [10.0, f32::NAN, 10.0, 10.2, f32::NAN, 10.2, f32::NAN, 10.2];
        assert!(
            actual
                .iter()
                .zip(expected.iter())
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || (a == b))
        );
    }

    #[test]
    fn dispatching_with_bitmap_inconsistent_with_section_5() {
        let decoder = Grib2SubmessageDecoder::new(
            8,
            SECT5.to_vec(),
            sect6_with_bitmap(&[0b1011_0111]),
            SECT7.to_vec(),
        )
        .unwrap();
        assert_eq!(
            decoder.dispatch(),
            Err(GribError::DecodeError(DecodeError::LengthMismatch))
        );
    }

    #[test]
    fn creating_decoder_with_unsupported_bitmap_indicator() {
        let actual = Grib2SubmessageDecoder::new(
            5,
            SECT5.to_vec(),
            vec![0x00, 0x00, 0x00, 0x06, 0x06, 0xfe],
            SECT7.to_vec(),
        );
        assert_eq!(
            actual,
            Err(GribError::DecodeError(
                DecodeError::BitMapIndicatorUnsupported(254)
            ))
        );
    }

    #[test]
    fn creating_decoder_with_sections_swapped() {
        let actual = Grib2SubmessageDecoder::new(
            5,
            SECT5.to_vec(),
            SECT7.to_vec(),
            vec![0x00, 0x00, 0x00, 0x06, 0x06, 0xff],
        );
        assert_eq!(
            actual,
            Err(GribError::DecodeError(DecodeError::InvalidSectionNumber {
                expected: 6,
                actual: 7
            }))
        );
    }
}
