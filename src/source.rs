//! Producers of one color per clustering unit.
//!
//! Clustering only sees the colors; where they came from (per-corner colors,
//! material slots, a flat list) is decided here. Every adapter enumerates
//! units by index, which keeps stride seeding reproducible.

use alloc::vec::Vec;

use rgb::RGB;

use crate::channel::Channel;

/// Color used for faces with no color information at all.
pub const MID_GRAY: RGB<f32> = RGB {
    r: 0.5,
    g: 0.5,
    b: 0.5,
};

/// Produces one color for unit `index`.
pub trait SampleSource<T: Channel> {
    fn sample_count(&self) -> usize;

    fn sample(&self, index: usize) -> RGB<T>;

    fn collect_samples(&self) -> Vec<RGB<T>> {
        (0..self.sample_count()).map(|i| self.sample(i)).collect()
    }
}

impl<T: Channel> SampleSource<T> for [RGB<T>] {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn sample(&self, index: usize) -> RGB<T> {
        self[index]
    }

    fn collect_samples(&self) -> Vec<RGB<T>> {
        self.to_vec()
    }
}

/// Per-face lists of per-corner colors; a face's color is the unweighted mean.
#[derive(Debug, Clone, Copy)]
pub struct CornerColors<'a> {
    corners: &'a [Vec<RGB<f32>>],
}

impl<'a> CornerColors<'a> {
    pub fn new(corners: &'a [Vec<RGB<f32>>]) -> Self {
        Self { corners }
    }
}

impl SampleSource<f32> for CornerColors<'_> {
    fn sample_count(&self) -> usize {
        self.corners.len()
    }

    fn sample(&self, index: usize) -> RGB<f32> {
        let corners = &self.corners[index];
        if corners.is_empty() {
            return MID_GRAY;
        }
        let n = corners.len() as f32;
        let (r, g, b) = corners
            .iter()
            .fold((0.0, 0.0, 0.0), |(r, g, b), c| (r + c.r, g + c.g, b + c.b));
        RGB {
            r: r / n,
            g: g / n,
            b: b / n,
        }
    }
}

/// Per-face material slot plus the base color of each material.
///
/// A face without a slot, with a slot past the table, or pointing at a
/// material without a base color gets [`MID_GRAY`].
#[derive(Debug, Clone, Copy)]
pub struct MaterialColors<'a> {
    face_materials: &'a [Option<usize>],
    base_colors: &'a [Option<RGB<f32>>],
}

impl<'a> MaterialColors<'a> {
    pub fn new(face_materials: &'a [Option<usize>], base_colors: &'a [Option<RGB<f32>>]) -> Self {
        Self {
            face_materials,
            base_colors,
        }
    }
}

impl SampleSource<f32> for MaterialColors<'_> {
    fn sample_count(&self) -> usize {
        self.face_materials.len()
    }

    fn sample(&self, index: usize) -> RGB<f32> {
        self.face_materials[index]
            .and_then(|slot| self.base_colors.get(slot).copied().flatten())
            .unwrap_or(MID_GRAY)
    }
}

/// Face colors from whichever source a mesh actually has.
#[derive(Debug, Clone, Copy)]
pub enum FaceColors<'a> {
    Corners(CornerColors<'a>),
    Materials(MaterialColors<'a>),
}

impl<'a> FaceColors<'a> {
    /// Prefer explicit corner colors, fall back to materials.
    pub fn select(corners: Option<&'a [Vec<RGB<f32>>]>, materials: MaterialColors<'a>) -> Self {
        match corners {
            Some(corners) => Self::Corners(CornerColors::new(corners)),
            None => Self::Materials(materials),
        }
    }
}

impl SampleSource<f32> for FaceColors<'_> {
    fn sample_count(&self) -> usize {
        match self {
            Self::Corners(c) => c.sample_count(),
            Self::Materials(m) => m.sample_count(),
        }
    }

    fn sample(&self, index: usize) -> RGB<f32> {
        match self {
            Self::Corners(c) => c.sample(index),
            Self::Materials(m) => m.sample(index),
        }
    }
}
