use crate::error::{DecodeError, EncodeError};

const MAX_UNIT_SIZE: usize = 32;

/// Reads unsigned integers of 0 to 32 bits, most significant bit first.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn read_uint(&mut self, size: usize) -> Result<u32, DecodeError> {
        if size == 0 {
            return Ok(0);
        }
        if size > MAX_UNIT_SIZE {
            return Err(DecodeError::NotSupported(
                "bit width of a packed value",
                size as u16,
            ));
        }
        let end = self.pos + size;
        if end > self.data.len() * 8 {
            return Err(DecodeError::TruncatedStream);
        }

        let mut val = 0_u64;
        let mut pos = self.pos;
        while pos < end {
            let byte = self.data[pos / 8];
            let available = 8 - pos % 8;
            let taken = available.min(end - pos);
            let bits = (byte >> (available - taken)) & (0xff_u8 >> (8 - taken));
            val = (val << taken) | u64::from(bits);
            pos += taken;
        }
        self.pos = end;
        Ok(val as u32)
    }

    /// Reads `count` values of `size` bits each.
    pub(crate) fn read_uints(&mut self, size: usize, count: usize) -> Result<Vec<u32>, DecodeError> {
        if size.saturating_mul(count) > self.bits_remaining() {
            return Err(DecodeError::TruncatedStream);
        }
        (0..count).map(|_| self.read_uint(size)).collect()
    }

    pub(crate) fn align_to_byte(&mut self) {
        self.pos = self.byte_len() * 8;
    }

    /// Number of octets consumed so far, with a partially read octet counted.
    pub(crate) fn byte_len(&self) -> usize {
        self.pos.div_ceil(8)
    }

    pub(crate) fn bits_remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.pos)
    }
}

/// Writes unsigned integers of 0 to 32 bits, most significant bit first.
///
/// Unused bits in the last octet are always zero.
#[derive(Debug, Clone, Default)]
pub(crate) struct BitWriter {
    buf: Vec<u8>,
    pos: usize,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_uint(&mut self, val: u32, size: usize) -> Result<(), EncodeError> {
        if size > MAX_UNIT_SIZE || u64::from(val) >> size != 0 {
            return Err(EncodeError::ValueTooWide {
                value: val.into(),
                width: size,
            });
        }

        let mut remaining = size;
        while remaining > 0 {
            let offset = self.pos % 8;
            if offset == 0 {
                self.buf.push(0);
            }
            let available = 8 - offset;
            let taken = available.min(remaining);
            let bits = (u64::from(val) >> (remaining - taken)) as u8 & (0xff_u8 >> (8 - taken));
            if let Some(last) = self.buf.last_mut() {
                *last |= bits << (available - taken);
            }
            self.pos += taken;
            remaining -= taken;
        }
        Ok(())
    }

    pub(crate) fn write_uints<I>(&mut self, vals: I, size: usize) -> Result<(), EncodeError>
    where
        I: IntoIterator<Item = u32>,
    {
        vals.into_iter().try_for_each(|v| self.write_uint(v, size))
    }

    pub(crate) fn align_to_byte(&mut self) {
        self.pos = self.buf.len() * 8;
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.align_to_byte();
        self.buf.extend_from_slice(bytes);
        self.pos = self.buf.len() * 8;
    }

    pub(crate) fn byte_len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub(crate) struct FixedValueIterator<T> {
    val: T,
    length: usize,
    pos: usize,
}

impl<T> FixedValueIterator<T> {
    pub(crate) fn new(val: T, length: usize) -> Self {
        Self {
            val,
            length,
            pos: 0,
        }
    }
}

impl<T> Iterator for FixedValueIterator<T>
where
    T: Copy,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.length {
            self.pos += 1;
            Some(self.val)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.length - self.pos;
        (size, Some(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLICE: [u8; 5] = [0, 255, 255, 0, 0];

    fn read_all(slice: &[u8], size: usize) -> Vec<u32> {
        let mut reader = BitReader::new(slice);
        let mut out = Vec::new();
        while let Ok(v) = reader.read_uint(size) {
            out.push(v);
        }
        out
    }

    macro_rules! test_reading_n_bits {
        ($(($name:ident, $size:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                assert_eq!(read_all(&SLICE, $size), $expected);
            }
        )*);
    }

    test_reading_n_bits! {
        (
            reading_u2,
            2,
            vec![0b00, 0b00, 0b00, 0b00, 0b11, 0b11, 0b11, 0b11, 0b11, 0b11, 0b11, 0b11,
                 0b00, 0b00, 0b00, 0b00, 0b00, 0b00, 0b00, 0b00]
        ),
        (
            reading_u5,
            5,
            vec![0b00000, 0b00011, 0b11111, 0b11111, 0b11110, 0b00000, 0b00000, 0b00000]
        ),
        (
            reading_u9,
            9,
            vec![0b000000001, 0b111111111, 0b111111000, 0b000000000]
        ),
        (
            reading_u13,
            13,
            vec![0b0000000011111, 0b1111111111100, 0b0000000000000]
        ),
        (
            reading_u32,
            32,
            vec![0x00ff_ff00]
        ),
    }

    #[test]
    fn reading_past_end_is_an_error() {
        let mut reader = BitReader::new(&SLICE);
        assert_eq!(reader.read_uint(32), Ok(0x00ff_ff00));
        assert_eq!(reader.read_uint(9), Err(DecodeError::TruncatedStream));
        assert_eq!(reader.read_uint(8), Ok(0));
        assert_eq!(reader.read_uint(1), Err(DecodeError::TruncatedStream));
    }

    #[test]
    fn reading_zero_bits() {
        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.read_uint(0), Ok(0));
        assert_eq!(reader.read_uints(0, 3), Ok(vec![0, 0, 0]));
        assert_eq!(reader.byte_len(), 0);
    }

    #[test]
    fn reading_with_alignment() {
        let mut reader = BitReader::new(&SLICE);
        assert_eq!(reader.read_uint(7), Ok(0));
        assert_eq!(reader.byte_len(), 1);
        reader.align_to_byte();
        assert_eq!(reader.read_uint(2), Ok(0b11));
        reader.align_to_byte();
        assert_eq!(reader.byte_len(), 2);
        assert_eq!(reader.bits_remaining(), 24);
    }

    #[test]
    fn reading_many_values_from_too_short_slice() {
        let mut reader = BitReader::new(&SLICE);
        assert_eq!(reader.read_uints(8, 6), Err(DecodeError::TruncatedStream));
    }

    #[test]
    fn writing_values_of_various_widths() {
        let mut writer = BitWriter::new();
        writer.write_uint(0b00000, 5).unwrap();
        writer.write_uint(0b00011, 5).unwrap();
        writer.write_uint(0b1111111111, 10).unwrap();
        writer.write_uint(0b1111, 4).unwrap();
        assert_eq!(writer.byte_len(), 3);
        writer.write_uint(0, 0).unwrap();
        writer.write_uint(0, 16).unwrap();
        assert_eq!(writer.into_bytes(), SLICE.to_vec());
    }

    #[test]
    fn writing_pads_last_octet_with_zeros() {
        let mut writer = BitWriter::new();
        writer.write_uints(vec![0, 0, 2, 2, 2], 2).unwrap();
        assert_eq!(writer.byte_len(), 2);
        assert_eq!(writer.into_bytes(), vec![0b0000_1010, 0b1000_0000]);
    }

    #[test]
    fn writing_too_wide_values() {
        let mut writer = BitWriter::new();
        assert_eq!(
            writer.write_uint(4, 2),
            Err(EncodeError::ValueTooWide { value: 4, width: 2 })
        );
        assert_eq!(
            writer.write_uint(1, 0),
            Err(EncodeError::ValueTooWide { value: 1, width: 0 })
        );
        assert!(writer.write_uint(u32::MAX, 32).is_ok());
    }

    #[test]
    fn writing_bytes_after_bits() {
        let mut writer = BitWriter::new();
        writer.write_uint(1, 1).unwrap();
        writer.write_bytes(&[0xab]);
        writer.write_uint(0b101, 3).unwrap();
        assert_eq!(writer.into_bytes(), vec![0x80, 0xab, 0xa0]);
    }

    #[test]
    fn written_values_are_read_back() {
        let vals = vec![0, 1, 0x1ffff, 12345, 0x1_0000];
        let mut writer = BitWriter::new();
        writer.write_uints(vals.clone(), 17).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_uints(17, vals.len()), Ok(vals));
    }

    #[test]
    fn fixed_value_iterator() {
        let iter = FixedValueIterator::new(1.5_f32, 3);
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.collect::<Vec<_>>(), vec![1.5, 1.5, 1.5]);
    }
}
