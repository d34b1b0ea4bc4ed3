use alloc::vec::Vec;

use rgb::{RGB, RGBA};

use crate::channel::Channel;
use crate::error::ReduceError;

/// A width×height grid of pixels in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelField<P> {
    width: usize,
    height: usize,
    pixels: Vec<P>,
}

impl<P> PixelField<P> {
    /// Wrap a row-major pixel buffer. Zero-sized fields are allowed.
    pub fn new(pixels: Vec<P>, width: usize, height: usize) -> Result<Self, ReduceError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(ReduceError::DimensionMismatch {
                len: pixels.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&P> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[P]> {
        // chunks_exact panics on 0
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// Same dimensions, pixels transformed one by one.
    pub(crate) fn map<Q>(&self, f: impl FnMut(&P) -> Q) -> PixelField<Q> {
        PixelField {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(f).collect(),
        }
    }
}

impl<T: Channel> PixelField<RGB<T>> {
    /// Attach a fully opaque alpha channel.
    pub fn to_rgba(&self) -> PixelField<RGBA<T>> {
        self.map(|p| RGBA {
            r: p.r,
            g: p.g,
            b: p.b,
            a: T::OPAQUE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = PixelField::new(vec![0u8; 10], 4, 4).unwrap_err();
        assert!(matches!(
            err,
            ReduceError::DimensionMismatch {
                len: 10,
                width: 4,
                height: 4
            }
        ));
    }

    #[test]
    fn empty_fields_are_valid() {
        assert!(PixelField::<u8>::new(Vec::new(), 0, 5).unwrap().is_empty());
        assert!(PixelField::<u8>::new(Vec::new(), 7, 0).unwrap().is_empty());
        assert_eq!(PixelField::<u8>::new(Vec::new(), 0, 5).unwrap().rows().count(), 0);
    }

    #[test]
    fn indexing_is_row_major() {
        let field = PixelField::new((0..6).collect::<Vec<u32>>(), 3, 2).unwrap();
        assert_eq!(field.get(2, 0), Some(&2));
        assert_eq!(field.get(0, 1), Some(&3));
        assert_eq!(field.get(3, 0), None);
        let rows: Vec<&[u32]> = field.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
    }

    #[test]
    fn rgb_to_rgba_is_opaque() {
        let field = PixelField::new(vec![RGB { r: 1u8, g: 2, b: 3 }], 1, 1).unwrap();
        assert_eq!(field.to_rgba().pixels()[0], RGBA { r: 1, g: 2, b: 3, a: 255 });
    }
}
