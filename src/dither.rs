use alloc::vec::Vec;

use rgb::{RGB, RGBA};

use crate::channel::{Channel, rgb_of, to_working};
use crate::field::PixelField;
use crate::palette::Palette;

/// Dithering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Nearest color only.
    None,
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,
}

impl From<bool> for DitherMode {
    fn from(use_dither: bool) -> Self {
        if use_dither {
            Self::FloydSteinberg
        } else {
            Self::None
        }
    }
}

/// Floyd-Steinberg kernel as `(dx, dy, weight)`:
/// right 7/16, bottom-left 3/16, bottom 5/16, bottom-right 1/16.
pub const FLOYD_STEINBERG: [(isize, usize, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// In-bounds kernel targets of pixel (x, y) as `(index, weight)`.
fn diffusion_targets(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, f32)> {
    FLOYD_STEINBERG.into_iter().filter_map(move |(dx, dy, weight)| {
        let tx = x.checked_add_signed(dx)?;
        let ty = y + dy;
        if tx >= width || ty >= height {
            return None;
        }
        Some((ty * width + tx, weight))
    })
}

/// Fraction of pixel (x, y)'s error that lands inside the grid.
///
/// Weight pointing outside is dropped, not redistributed, so this is 1.0
/// for interior pixels and less along the right, left and bottom edges.
pub fn retained_weight(x: usize, y: usize, width: usize, height: usize) -> f32 {
    diffusion_targets(x, y, width, height).map(|(_, w)| w).sum()
}

/// Map every pixel to a palette index.
///
/// With [`DitherMode::FloydSteinberg`] pixels are visited row-major and each
/// one sees the error pushed into it by earlier pixels; the order is part of
/// the result and must stay sequential.
///
/// # Panics
/// If the palette is empty and the field is not.
pub fn dither_indices<T: Channel>(
    field: &PixelField<RGBA<T>>,
    palette: &Palette<T>,
    mode: DitherMode,
) -> Vec<usize> {
    if field.is_empty() {
        return Vec::new();
    }
    assert!(!palette.is_empty(), "cannot remap onto an empty palette");

    if mode == DitherMode::None {
        return simple_remap(field.pixels(), palette);
    }

    let width = field.width();
    let height = field.height();

    // Working buffer in channel units; error diffusion accumulates here.
    let mut buf: Vec<RGB<f32>> = field
        .pixels()
        .iter()
        .map(|&p| to_working(rgb_of(p)))
        .collect();

    let mut indices = Vec::with_capacity(buf.len());

    for y in 0..height {
        for x in 0..width {
            let acc = buf[y * width + x];
            let current = RGB {
                r: T::quantize(acc.r),
                g: T::quantize(acc.g),
                b: T::quantize(acc.b),
            };

            let best = palette.nearest(current);
            indices.push(best);

            let chosen = palette.working(best);
            let err_r = current.r - chosen.r;
            let err_g = current.g - chosen.g;
            let err_b = current.b - chosen.b;

            for (ti, fraction) in diffusion_targets(x, y, width, height) {
                buf[ti].r += err_r * fraction;
                buf[ti].g += err_g * fraction;
                buf[ti].b += err_b * fraction;
            }
        }
    }

    indices
}

/// Remap a field onto `palette`, keeping each pixel's alpha.
///
/// Every output color is exactly one palette entry.
pub fn dither_image<T: Channel>(
    field: &PixelField<RGBA<T>>,
    palette: &Palette<T>,
    mode: DitherMode,
) -> PixelField<RGBA<T>> {
    let indices = dither_indices(field, palette, mode);
    colorize(field, palette, &indices)
}

/// Replace each pixel's color with its palette entry, keeping alpha.
pub(crate) fn colorize<T: Channel>(
    field: &PixelField<RGBA<T>>,
    palette: &Palette<T>,
    indices: &[usize],
) -> PixelField<RGBA<T>> {
    let mut indices = indices.iter();
    field.map(|p| {
        let c = palette.entries()[indices.next().copied().unwrap_or(0)];
        RGBA {
            r: c.r,
            g: c.g,
            b: c.b,
            a: p.a,
        }
    })
}

/// Simple nearest-color remap without error propagation.
pub(crate) fn simple_remap<T: Channel>(pixels: &[RGBA<T>], palette: &Palette<T>) -> Vec<usize> {
    pixels
        .iter()
        .map(|&p| palette.nearest(to_working(rgb_of(p))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_palette() -> Palette<u8> {
        Palette::new(vec![
            RGB { r: 0, g: 0, b: 0 },
            RGB { r: 85, g: 85, b: 85 },
            RGB { r: 170, g: 170, b: 170 },
            RGB { r: 255, g: 255, b: 255 },
        ])
    }

    fn gradient(width: usize, height: usize) -> PixelField<RGBA<u8>> {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 255 / (width + height)) as u8;
                pixels.push(RGBA { r: v, g: v, b: v, a: (x * 16) as u8 });
            }
        }
        PixelField::new(pixels, width, height).unwrap()
    }

    #[test]
    fn kernel_weights_sum_to_one() {
        let total: f32 = FLOYD_STEINBERG.iter().map(|&(_, _, w)| w).sum();
        assert_eq!(total, 1.0);
        assert_eq!(retained_weight(1, 1, 4, 4), 1.0);
    }

    #[test]
    fn kernel_targets_land_on_neighbors() {
        // 4x2 grid: a row is 4 pixels, so below-left of (1, 0) is index 4.
        let targets: Vec<(usize, f32)> = diffusion_targets(1, 0, 4, 2).collect();
        assert_eq!(
            targets,
            vec![(2, 7.0 / 16.0), (4, 3.0 / 16.0), (5, 5.0 / 16.0), (6, 1.0 / 16.0)]
        );

        let left_edge: Vec<(usize, f32)> = diffusion_targets(0, 0, 4, 2).collect();
        assert_eq!(left_edge, vec![(1, 7.0 / 16.0), (4, 5.0 / 16.0), (5, 1.0 / 16.0)]);

        let right_edge: Vec<(usize, f32)> = diffusion_targets(3, 0, 4, 2).collect();
        assert_eq!(right_edge, vec![(6, 3.0 / 16.0), (7, 5.0 / 16.0)]);

        assert_eq!(diffusion_targets(2, 1, 4, 2).count(), 1);
    }

    #[test]
    fn error_carries_into_next_row() {
        let gray = |v: u8| RGBA { r: v, g: v, b: v, a: 255 };
        let field = PixelField::new(vec![gray(100), gray(0), gray(0), gray(0)], 2, 2).unwrap();
        let palette = Palette::new(vec![
            RGB { r: 0u8, g: 0, b: 0 },
            RGB { r: 40, g: 40, b: 40 },
        ]);

        // (0,0): 100 -> 40, +60.        (1,0): 60 * 7/16 = 26.25 -> 26 -> 40, -14
        // (0,1): 60 * 5/16 - 14 * 3/16 = 16.125 -> 16 -> 0
        // (1,1): 60 * 1/16 - 14 * 5/16 + 16 * 7/16 = 6.375 -> 6 -> 0
        assert_eq!(
            dither_indices(&field, &palette, DitherMode::FloydSteinberg),
            vec![1, 1, 0, 0]
        );
        assert_eq!(dither_indices(&field, &palette, DitherMode::None), vec![1, 0, 0, 0]);
    }

    #[test]
    fn no_dither_produces_valid_indices() {
        let palette = gray_palette();
        let field = gradient(64, 1);
        let indices = dither_indices(&field, &palette, DitherMode::None);
        assert_eq!(indices.len(), 64);
        assert!(indices.iter().all(|&i| i < palette.len()));
    }

    #[test]
    fn dithered_pixels_are_palette_members() {
        let palette = gray_palette();
        let field = gradient(16, 16);
        let out = dither_image(&field, &palette, DitherMode::FloydSteinberg);
        assert_eq!(out.width(), 16);
        assert_eq!(out.height(), 16);
        for (src, dst) in field.pixels().iter().zip(out.pixels()) {
            assert!(palette.contains(rgb_of(*dst)));
            assert_eq!(src.a, dst.a);
        }
    }

    #[test]
    fn dithering_mixes_entries_for_midtones() {
        // 128 sits between 85 and 170: diffusion must alternate the two.
        let pixels = vec![RGBA { r: 128u8, g: 128, b: 128, a: 255 }; 32];
        let field = PixelField::new(pixels, 32, 1).unwrap();
        let palette = gray_palette();

        let plain = dither_indices(&field, &palette, DitherMode::None);
        assert!(plain.iter().all(|&i| i == 2));

        let dithered = dither_indices(&field, &palette, DitherMode::FloydSteinberg);
        assert!(dithered.contains(&1));
        assert!(dithered.contains(&2));
    }

    #[test]
    fn error_carries_right_along_a_row() {
        let pixels = vec![
            RGBA { r: 100u8, g: 100, b: 100, a: 255 },
            RGBA { r: 120, g: 120, b: 120, a: 255 },
        ];
        let field = PixelField::new(pixels, 2, 1).unwrap();

        // 100 -> 85 leaves +15; 120 + 15 * 7/16 = 126.56 -> 127 -> 128
        let palette = Palette::new(vec![
            RGB { r: 85u8, g: 85, b: 85 },
            RGB { r: 128, g: 128, b: 128 },
        ]);
        assert_eq!(
            dither_indices(&field, &palette, DitherMode::FloydSteinberg),
            vec![0, 1]
        );

        // 100 -> 110 leaves -10; 120 - 10 * 7/16 = 115.63 -> 116 -> 110 instead of 126
        let palette = Palette::new(vec![
            RGB { r: 85u8, g: 85, b: 85 },
            RGB { r: 110, g: 110, b: 110 },
            RGB { r: 126, g: 126, b: 126 },
        ]);
        assert_eq!(dither_indices(&field, &palette, DitherMode::None), vec![1, 2]);
        assert_eq!(
            dither_indices(&field, &palette, DitherMode::FloydSteinberg),
            vec![1, 1]
        );
    }

    #[test]
    fn empty_field_gives_empty_output() {
        let field = PixelField::<RGBA<u8>>::new(Vec::new(), 0, 3).unwrap();
        let out = dither_image(&field, &gray_palette(), DitherMode::FloydSteinberg);
        assert!(out.is_empty());
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn float_channels_clamp_accumulator() {
        let pixels = vec![
            RGBA { r: 1.0f32, g: 1.0, b: 1.0, a: 0.5 },
            RGBA { r: 1.0, g: 1.0, b: 1.0, a: 0.25 },
        ];
        let field = PixelField::new(pixels, 2, 1).unwrap();
        let palette = Palette::new(vec![
            RGB { r: 0.0f32, g: 0.0, b: 0.0 },
            RGB { r: 0.9, g: 0.9, b: 0.9 },
        ]);
        let out = dither_image(&field, &palette, DitherMode::FloydSteinberg);
        for p in out.pixels() {
            assert_eq!(rgb_of(*p), RGB { r: 0.9, g: 0.9, b: 0.9 });
        }
        assert_eq!(out.pixels()[1].a, 0.25);
    }

    #[test]
    fn use_dither_flag_maps_to_mode() {
        assert_eq!(DitherMode::from(true), DitherMode::FloydSteinberg);
        assert_eq!(DitherMode::from(false), DitherMode::None);
    }
}
