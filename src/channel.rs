use core::fmt::Debug;

use rgb::{RGB, RGBA};

/// Numeric representation of one color channel.
///
/// A call works entirely in one representation: `f32` samples live in [0, 1],
/// `u8` samples in [0, 255]. Clustering normalizes to [0, 1] internally,
/// dithering works in channel units.
pub trait Channel: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Largest representable value, as `f32`.
    const MAX: f32;
    /// Alpha value for a fully opaque pixel.
    const OPAQUE: Self;

    fn to_f32(self) -> f32;

    /// Convert a channel-unit value back into this representation.
    fn from_f32(v: f32) -> Self;

    /// Snap an error-diffusion accumulator onto the representable range.
    fn quantize(v: f32) -> f32;

    /// Gray level `(index + 1) / (k + 1)` scaled to the channel range.
    fn filler(index: usize, k: usize) -> Self;

    #[inline]
    fn to_unit(self) -> f32 {
        self.to_f32() / Self::MAX
    }

    #[inline]
    fn from_unit(v: f32) -> Self {
        Self::from_f32(v * Self::MAX)
    }
}

impl Channel for f32 {
    const MAX: f32 = 1.0;
    const OPAQUE: Self = 1.0;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn quantize(v: f32) -> f32 {
        v.clamp(0.0, 1.0)
    }

    fn filler(index: usize, k: usize) -> Self {
        (index + 1) as f32 / (k + 1) as f32
    }
}

impl Channel for u8 {
    const MAX: f32 = 255.0;
    const OPAQUE: Self = 255;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v.round().clamp(0.0, 255.0) as u8
    }

    #[inline]
    fn quantize(v: f32) -> f32 {
        v.round().clamp(0.0, 255.0)
    }

    // Integer division truncates, matching how 8-bit fillers are produced
    // by the image tooling.
    fn filler(index: usize, k: usize) -> Self {
        (255 * (index + 1) / (k + 1)).min(255) as u8
    }
}

/// Color in channel units as `f32`, alpha dropped.
#[inline]
pub fn to_working<T: Channel>(c: RGB<T>) -> RGB<f32> {
    RGB {
        r: c.r.to_f32(),
        g: c.g.to_f32(),
        b: c.b.to_f32(),
    }
}

/// Color normalized to [0, 1].
#[inline]
pub fn to_unit<T: Channel>(c: RGB<T>) -> RGB<f32> {
    RGB {
        r: c.r.to_unit(),
        g: c.g.to_unit(),
        b: c.b.to_unit(),
    }
}

#[inline]
pub fn from_unit<T: Channel>(c: RGB<f32>) -> RGB<T> {
    RGB {
        r: T::from_unit(c.r),
        g: T::from_unit(c.g),
        b: T::from_unit(c.b),
    }
}

/// Drop the alpha channel.
#[inline]
pub fn rgb_of<T: Copy>(p: RGBA<T>) -> RGB<T> {
    RGB {
        r: p.r,
        g: p.g,
        b: p.b,
    }
}

/// Squared Euclidean distance in RGB.
#[inline]
pub fn distance_sq(a: RGB<f32>, b: RGB<f32>) -> f32 {
    let dr = a.r - b.r;
    let dg = a.g - b.g;
    let db = a.b - b.b;
    dr * dr + dg * dg + db * db
}

/// Rec. 601 luma of a normalized color.
#[inline]
pub fn luma(c: RGB<f32>) -> f32 {
    0.299 * c.r + 0.587 * c.g + 0.114 * c.b
}

/// Uniform gray filler for palette slot `index` of `k`.
pub fn gray<T: Channel>(index: usize, k: usize) -> RGB<T> {
    let v = T::filler(index, k);
    RGB { r: v, g: v, b: v }
}
