use alloc::vec::Vec;

use rgb::{RGB, RGBA};

use crate::channel::{Channel, rgb_of};

/// Pick the pixels a palette is built from.
///
/// Pixels with opacity below `alpha_cutoff` (normalized, 0..=1) are left out
/// so transparent regions don't pull palette entries toward whatever color
/// they happen to store. If nothing is opaque enough, every pixel is used.
/// When more than `max_samples` remain, every `len / max_samples`-th one is
/// kept.
pub fn palette_samples<T: Channel>(
    pixels: &[RGBA<T>],
    alpha_cutoff: f32,
    max_samples: usize,
) -> Vec<RGB<T>> {
    let mut samples: Vec<RGB<T>> = pixels
        .iter()
        .filter(|p| p.a.to_unit() >= alpha_cutoff)
        .map(|&p| rgb_of(p))
        .collect();

    if samples.is_empty() {
        samples = pixels.iter().map(|&p| rgb_of(p)).collect();
    }

    if max_samples > 0 && samples.len() > max_samples {
        let step = samples.len() / max_samples;
        samples = samples.into_iter().step_by(step).collect();
    }

    samples
}
