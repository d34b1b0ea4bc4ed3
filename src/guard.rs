//! Replacement of degenerate palettes.
//!
//! k-means over a near-uniform input (an unpainted surface, a flat
//! background) converges to k colors nobody can tell apart. When the luma
//! spread of a palette is that small and it sits at either end of the
//! brightness range, it is swapped for a fixed set of distinct colors.

use alloc::vec::Vec;

use rgb::RGB;

use crate::channel::{Channel, from_unit, luma, to_unit};
use crate::palette::Palette;

/// Substitute for light palettes.
pub const BRIGHT_SET: [[f32; 3]; 4] = [
    [0.9, 0.2, 0.2],
    [0.2, 0.5, 0.9],
    [0.2, 0.75, 0.3],
    [0.9, 0.85, 0.2],
];

/// Substitute for dark palettes.
pub const DARK_SET: [[f32; 3]; 4] = [
    [0.9, 0.25, 0.25],
    [0.25, 0.5, 0.9],
    [0.25, 0.8, 0.35],
    [0.95, 0.9, 0.25],
];

/// Luma statistics that mark a palette as degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistinctnessThresholds {
    /// Luma variance below this counts as "all entries look the same".
    pub max_variance: f32,
    /// Mean luma above this selects [`BRIGHT_SET`].
    pub bright_luma: f32,
    /// Mean luma below this selects [`DARK_SET`].
    pub dark_luma: f32,
}

impl Default for DistinctnessThresholds {
    fn default() -> Self {
        Self {
            max_variance: 0.02,
            bright_luma: 0.8,
            dark_luma: 0.25,
        }
    }
}

/// What the guard did to a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Kept,
    Bright,
    Dark,
}

/// Mean and population variance of entry luma, on normalized channels.
pub fn luma_stats<T: Channel>(entries: &[RGB<T>]) -> (f32, f32) {
    if entries.is_empty() {
        return (0.0, 0.0);
    }
    let n = entries.len() as f32;
    let lumas: Vec<f32> = entries.iter().map(|&c| luma(to_unit(c))).collect();
    let mean = lumas.iter().sum::<f32>() / n;
    let variance = lumas.iter().map(|l| (l - mean) * (l - mean)).sum::<f32>() / n;
    (mean, variance)
}

/// Normalize `palette` to `k` entries and replace it if it is degenerate.
pub fn guard_palette<T: Channel>(
    palette: Palette<T>,
    k: usize,
    thresholds: &DistinctnessThresholds,
) -> (Palette<T>, GuardOutcome) {
    let palette = Palette::with_len(palette.into_entries(), k);
    let (mean, variance) = luma_stats(palette.entries());

    let outcome = if variance >= thresholds.max_variance {
        GuardOutcome::Kept
    } else if mean > thresholds.bright_luma {
        GuardOutcome::Bright
    } else if mean < thresholds.dark_luma {
        GuardOutcome::Dark
    } else {
        GuardOutcome::Kept
    };

    let replacement = match outcome {
        GuardOutcome::Kept => return (palette, outcome),
        GuardOutcome::Bright => &BRIGHT_SET,
        GuardOutcome::Dark => &DARK_SET,
    };

    log::debug!(
        "palette collapsed (luma mean {mean:.3}, variance {variance:.4}), using {outcome:?} set"
    );

    let entries = replacement
        .iter()
        .cycle()
        .take(k)
        .map(|&[r, g, b]| from_unit(RGB { r, g, b }))
        .collect();
    (Palette::new(entries), outcome)
}
