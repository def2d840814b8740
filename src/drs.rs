use grib_template_helpers::{TryFromSlice, WriteToBuf};
use log::{debug, warn};

use crate::{
    decoder,
    def::grib2::{
        SectionHeader, Section5Payload,
        template::{Template5_0, Template5_3},
    },
    encoder::{self, ComplexPackingConfig, PackingConfig, SimplePackingConfig},
    error::{DecodeError, EncodeError},
};

/// Code table 5.0 - Grid point data - simple packing.
pub const SIMPLE_PACKING: u16 = 0;
/// Code table 5.0 - Grid point data - complex packing and spatial
/// differencing.
pub const COMPLEX_PACKING_AND_SPATIAL_DIFFERENCING: u16 = 3;

/// A data representation template: a fixed-layout header holding the
/// parameters of one packing algorithm, and the algorithm itself.
pub trait DataRepresentation: TryFromSlice + WriteToBuf + Sized {
    /// Encoder parameters chosen by the caller.
    type Config;

    /// Template number (see Code table 5.0).
    const TEMPLATE_NUM: u16;

    /// Number of octets of the template, i.e. octets 12-nn of Section 5.
    const HEADER_SIZE: usize;

    fn header_unpack(slice: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        Self::try_from_slice(slice, pos).map_err(|_| DecodeError::TruncatedStream)
    }

    fn header_pack(&self, buf: &mut Vec<u8>) {
        self.write_to_buf(buf)
    }

    /// Unpacks `num_encoded_points` values from the payload of Section 7.
    fn unpack(
        &self,
        num_encoded_points: usize,
        sect7_payload: &[u8],
    ) -> Result<Vec<f32>, DecodeError>;

    /// Packs `values` and returns the template describing them together with
    /// the payload of Section 7.
    fn pack(values: &[f32], config: &Self::Config) -> Result<(Self, Vec<u8>), EncodeError>;
}

impl DataRepresentation for Template5_0 {
    type Config = SimplePackingConfig;
    const TEMPLATE_NUM: u16 = SIMPLE_PACKING;
    const HEADER_SIZE: usize = 10;

    fn unpack(
        &self,
        num_encoded_points: usize,
        sect7_payload: &[u8],
    ) -> Result<Vec<f32>, DecodeError> {
        decoder::simple::unpack(self, num_encoded_points, sect7_payload)
    }

    fn pack(values: &[f32], config: &Self::Config) -> Result<(Self, Vec<u8>), EncodeError> {
        encoder::simple::pack(values, config)
    }
}

impl DataRepresentation for Template5_3 {
    type Config = ComplexPackingConfig;
    const TEMPLATE_NUM: u16 = COMPLEX_PACKING_AND_SPATIAL_DIFFERENCING;
    const HEADER_SIZE: usize = 38;

    fn unpack(
        &self,
        num_encoded_points: usize,
        sect7_payload: &[u8],
    ) -> Result<Vec<f32>, DecodeError> {
        decoder::complex::unpack(self, num_encoded_points, sect7_payload)
    }

    fn pack(values: &[f32], config: &Self::Config) -> Result<(Self, Vec<u8>), EncodeError> {
        encoder::complex::pack(values, config)
    }
}

/// Data representation templates supported by this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum DataRepresentationTemplate {
    Simple(Template5_0),
    ComplexSpatial(Template5_3),
}

impl DataRepresentationTemplate {
    pub fn template_num(&self) -> u16 {
        match self {
            Self::Simple(_) => Template5_0::TEMPLATE_NUM,
            Self::ComplexSpatial(_) => Template5_3::TEMPLATE_NUM,
        }
    }

    pub fn header_size(&self) -> usize {
        match self {
            Self::Simple(_) => Template5_0::HEADER_SIZE,
            Self::ComplexSpatial(_) => Template5_3::HEADER_SIZE,
        }
    }

    /// Reads the template identified by `template_num`.
    pub fn header_unpack(
        template_num: u16,
        slice: &[u8],
        pos: &mut usize,
    ) -> Result<Self, DecodeError> {
        let template = match template_num {
            SIMPLE_PACKING => Self::Simple(Template5_0::header_unpack(slice, pos)?),
            COMPLEX_PACKING_AND_SPATIAL_DIFFERENCING => {
                Self::ComplexSpatial(Template5_3::header_unpack(slice, pos)?)
            }
            _ => return Err(DecodeError::UnsupportedTemplate(template_num)),
        };
        Ok(template)
    }

    pub fn header_pack(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Simple(t) => t.header_pack(buf),
            Self::ComplexSpatial(t) => t.header_pack(buf),
        }
    }

    pub fn unpack(
        &self,
        num_encoded_points: usize,
        sect7_payload: &[u8],
    ) -> Result<Vec<f32>, DecodeError> {
        match self {
            Self::Simple(t) => t.unpack(num_encoded_points, sect7_payload),
            Self::ComplexSpatial(t) => t.unpack(num_encoded_points, sect7_payload),
        }
    }

    pub fn pack(values: &[f32], config: &PackingConfig) -> Result<(Self, Vec<u8>), EncodeError> {
        let packed = match config {
            PackingConfig::Simple(config) => {
                let (template, payload) = Template5_0::pack(values, config)?;
                (Self::Simple(template), payload)
            }
            PackingConfig::ComplexSpatial(config) => {
                let (template, payload) = Template5_3::pack(values, config)?;
                (Self::ComplexSpatial(template), payload)
            }
        };
        Ok(packed)
    }
}

/// Section 5 - Data representation section.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRepresentationSection {
    /// Number of data points where one or more values are specified in Section
    /// 7 when a bit map is present, total number of data points when a bit map
    /// is absent.
    pub num_encoded_points: u32,
    pub template: DataRepresentationTemplate,
}

impl DataRepresentationSection {
    pub const SECTION_NUM: u8 = 5;
    /// Octets 1-11: section length, section number, number of encoded points
    /// and template number.
    pub const FIXED_HEADER_SIZE: usize = 11;

    pub fn new(num_encoded_points: u32, template: DataRepresentationTemplate) -> Self {
        Self {
            num_encoded_points,
            template,
        }
    }

    pub fn template_num(&self) -> u16 {
        self.template.template_num()
    }

    /// Length of the section in octets.
    pub fn section_len(&self) -> usize {
        Self::FIXED_HEADER_SIZE + self.template.header_size()
    }

    /// Reads Section 5 from the start of `bytes` and returns it with the number
    /// of octets it occupies.
    pub fn unpack(bytes: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut pos = 0;
        let header = SectionHeader::try_from_slice(bytes, &mut pos)
            .map_err(|_| DecodeError::TruncatedStream)?;
        if header.sect_num != Self::SECTION_NUM {
            return Err(DecodeError::InvalidSectionNumber {
                expected: Self::SECTION_NUM,
                actual: header.sect_num,
            });
        }

        let sect_len = header.len as usize;
        let section = bytes.get(..sect_len).ok_or(DecodeError::TruncatedStream)?;
        let payload = Section5Payload::try_from_slice(section, &mut pos)
            .map_err(|_| DecodeError::LengthMismatch)?;
        debug!(
            "Section 5: {} octets, template 5.{}, {} encoded points",
            sect_len, payload.template_num, payload.num_encoded_points
        );

        let template =
            DataRepresentationTemplate::header_unpack(payload.template_num, section, &mut pos)
                .map_err(|e| match e {
                    DecodeError::TruncatedStream => DecodeError::LengthMismatch,
                    e => e,
                })?;
        if pos < sect_len {
            warn!(
                "{} octets at the end of Section 5 are ignored",
                sect_len - pos
            );
        }

        let sect5 = Self {
            num_encoded_points: payload.num_encoded_points,
            template,
        };
        Ok((sect5, sect_len))
    }

    /// Serializes the section, the length field included.
    pub fn pack(&self) -> Result<Vec<u8>, EncodeError> {
        let mut body = Vec::with_capacity(self.section_len());
        Section5Payload {
            num_encoded_points: self.num_encoded_points,
            template_num: self.template_num(),
        }
        .write_to_buf(&mut body);
        self.template.header_pack(&mut body);

        let len = SectionHeader::SIZE + body.len();
        let mut buf = Vec::with_capacity(len);
        SectionHeader {
            len: u32::try_from(len)
                .map_err(|_| EncodeError::SectionTooLarge(Self::SECTION_NUM))?,
            sect_num: Self::SECTION_NUM,
        }
        .write_to_buf(&mut buf);
        buf.extend_from_slice(&body);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::grib2::template::param_set::{ComplexPacking, SimplePacking};

    const SIMPLE_SECT5: [u8; 21] = [
        0x00, 0x00, 0x00, 0x15, 0x05, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x42, 0xc8, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00,
    ];

    fn simple_sect5() -> DataRepresentationSection {
        DataRepresentationSection::new(
            5,
            DataRepresentationTemplate::Simple(Template5_0 {
                simple: SimplePacking {
                    ref_val: 100.0,
                    exp: 0,
                    dec: 1,
                    num_bits: 2,
                },
                orig_field_type: 0,
            }),
        )
    }

    fn complex_sect5() -> DataRepresentationSection {
        DataRepresentationSection::new(
            1000,
            DataRepresentationTemplate::ComplexSpatial(Template5_3 {
                simple: SimplePacking {
                    ref_val: -12.5,
                    exp: -3,
                    dec: 2,
                    num_bits: 9,
                },
                orig_field_type: 0,
                complex: ComplexPacking {
                    group_splitting_method: 1,
                    missing_value_management: 1,
                    primary_missing_value: 9.999e20,
                    secondary_missing_value: 9.999e20,
                    num_groups: 63,
                    group_width_ref: 0,
                    num_group_width_bits: 4,
                    group_len_ref: 16,
                    group_len_inc: 1,
                    group_len_last: 8,
                    num_group_len_bits: 0,
                },
                spatial_diff_order: 2,
                num_extra_desc_octets: 2,
            }),
        )
    }

    #[test]
    fn unpacking_simple_packing_section() {
        let actual = DataRepresentationSection::unpack(&SIMPLE_SECT5);
        assert_eq!(actual, Ok((simple_sect5(), 21)));
    }

    #[test]
    fn packing_simple_packing_section() {
        let sect5 = simple_sect5();
        assert_eq!(sect5.section_len(), 21);
        assert_eq!(sect5.pack(), Ok(SIMPLE_SECT5.to_vec()));
    }

    #[test]
    fn complex_packing_section_is_49_octets_long() {
        let sect5 = complex_sect5();
        let bytes = sect5.pack().unwrap();
        assert_eq!(bytes.len(), 49);
        assert_eq!(sect5.section_len(), 49);
        assert_eq!(&bytes[..11], &[0, 0, 0, 49, 5, 0, 0, 0x03, 0xe8, 0, 3]);
        assert_eq!(DataRepresentationSection::unpack(&bytes), Ok((sect5, 49)));
    }

    #[test]
    fn unpacking_section_followed_by_other_data() {
        let mut bytes = SIMPLE_SECT5.to_vec();
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x07, 0x07]);
        let actual = DataRepresentationSection::unpack(&bytes);
        assert_eq!(actual, Ok((simple_sect5(), 21)));
    }

    #[test]
    fn unpacking_unsupported_template() {
        let mut bytes = SIMPLE_SECT5.to_vec();
        bytes[10] = 40;
        let actual = DataRepresentationSection::unpack(&bytes);
        assert_eq!(actual, Err(DecodeError::UnsupportedTemplate(40)));
    }

    #[test]
    fn unpacking_wrong_section() {
        let mut bytes = SIMPLE_SECT5.to_vec();
        bytes[4] = 6;
        let actual = DataRepresentationSection::unpack(&bytes);
        assert_eq!(
            actual,
            Err(DecodeError::InvalidSectionNumber {
                expected: 5,
                actual: 6
            })
        );
    }

    #[test]
    fn unpacking_truncated_section() {
        let actual = DataRepresentationSection::unpack(&SIMPLE_SECT5[..20]);
        assert_eq!(actual, Err(DecodeError::TruncatedStream));
    }

    #[test]
    fn unpacking_section_with_too_small_length() {
        let mut bytes = SIMPLE_SECT5.to_vec();
        bytes[3] = 0x14;
        let actual = DataRepresentationSection::unpack(&bytes);
        assert_eq!(actual, Err(DecodeError::LengthMismatch));
    }

    #[test]
    fn unpacking_section_with_extra_octets() {
        let mut bytes = SIMPLE_SECT5.to_vec();
        bytes[3] = 0x17;
        bytes.extend_from_slice(&[0xff, 0xff]);
        let actual = DataRepresentationSection::unpack(&bytes);
        assert_eq!(actual, Ok((simple_sect5(), 23)));
    }
}
