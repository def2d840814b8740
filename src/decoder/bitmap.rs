use crate::{bitmap::Bitmap, error::DecodeError};

/// Spreads decoded values over the grid, yielding NaN where the bit map marks
/// a point as absent.
pub(crate) struct BitmapDecodeIterator<'b, I> {
    bitmap: &'b Bitmap,
    values: I,
    len: usize,
    pos: usize,
}

impl<'b, I> BitmapDecodeIterator<'b, I> {
    pub(crate) fn new(bitmap: &'b Bitmap, values: I, len: usize) -> Result<Self, DecodeError> {
        if bitmap.num_bits() < len {
            return Err(DecodeError::LengthMismatch);
        }
        Ok(Self {
            bitmap,
            values,
            len,
            pos: 0,
        })
    }
}

impl<I> Iterator for BitmapDecodeIterator<'_, I>
where
    I: Iterator<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.len {
            return None;
        }
        let present = self.bitmap.is_present(self.pos);
        self.pos += 1;
        if present {
            self.values.next()
        } else {
            Some(f32::NAN)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.len - self.pos;
        (size, Some(size))
    }
}
