//! Fixed-iteration k-means palette construction.
//!
//! Seeding is a fixed stride over the input order, so results are
//! reproducible as long as the caller enumerates samples in a stable order.

use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::channel::{Channel, distance_sq, from_unit, to_unit};
use crate::error::ReduceError;
use crate::palette::Palette;

/// Palette plus the cluster index of every input sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering<T: Channel> {
    pub palette: Palette<T>,
    pub assignment: Vec<usize>,
}

/// Running sums for one iteration's centroid update.
#[derive(Debug, Clone, Copy, Default)]
struct ClusterAccumulator {
    r: f64,
    g: f64,
    b: f64,
    count: u32,
}

impl ClusterAccumulator {
    fn add(&mut self, c: RGB<f32>) {
        self.r += c.r as f64;
        self.g += c.g as f64;
        self.b += c.b as f64;
        self.count += 1;
    }

    fn mean(&self) -> Option<RGB<f32>> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(RGB {
            r: (self.r / n) as f32,
            g: (self.g / n) as f32,
            b: (self.b / n) as f32,
        })
    }
}

/// Cluster `samples` into exactly `k` colors with `iterations` rounds of k-means.
///
/// With fewer than `k` samples no clustering happens: the samples themselves
/// become the palette, padded with gray fillers, and every sample maps to 0.
pub fn build_palette<T: Channel>(
    samples: &[RGB<T>],
    k: usize,
    iterations: usize,
) -> Result<Clustering<T>, ReduceError> {
    if k < 2 {
        return Err(ReduceError::InvalidPaletteSize(k));
    }
    if iterations == 0 {
        return Err(ReduceError::InvalidIterations);
    }

    if samples.len() < k {
        return Ok(Clustering {
            palette: Palette::with_len(samples.to_vec(), k),
            assignment: vec![0; samples.len()],
        });
    }

    let points: Vec<RGB<f32>> = samples.iter().map(|&c| to_unit(c)).collect();
    let mut centroids = seed_centroids(&points, k);
    let mut assignment = vec![0usize; points.len()];

    for _ in 0..iterations {
        assign(&points, &centroids, &mut assignment);

        let mut acc = vec![ClusterAccumulator::default(); k];
        for (&p, &cluster) in points.iter().zip(assignment.iter()) {
            acc[cluster].add(p);
        }
        for (centroid, a) in centroids.iter_mut().zip(acc.iter()) {
            if let Some(mean) = a.mean() {
                *centroid = mean;
            }
        }
    }

    log::debug!(
        "k-means: {} samples -> {} colors in {} iterations",
        points.len(),
        k,
        iterations
    );

    Ok(Clustering {
        palette: Palette::new(centroids.into_iter().map(from_unit).collect()),
        assignment,
    })
}

/// Take every `max(1, n / k)`-th sample, first `k` of them, padding with black.
fn seed_centroids(points: &[RGB<f32>], k: usize) -> Vec<RGB<f32>> {
    let step = (points.len() / k).max(1);
    let mut centroids: Vec<RGB<f32>> = points.iter().step_by(step).take(k).copied().collect();
    centroids.resize(k, RGB { r: 0.0, g: 0.0, b: 0.0 });
    centroids
}

fn nearest_centroid(p: RGB<f32>, centroids: &[RGB<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (j, &c) in centroids.iter().enumerate() {
        let d = distance_sq(p, c);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    best
}

#[cfg(not(feature = "parallel"))]
fn assign(points: &[RGB<f32>], centroids: &[RGB<f32>], out: &mut [usize]) {
    for (slot, &p) in out.iter_mut().zip(points.iter()) {
        *slot = nearest_centroid(p, centroids);
    }
}

#[cfg(feature = "parallel")]
fn assign(points: &[RGB<f32>], centroids: &[RGB<f32>], out: &mut [usize]) {
    out.par_iter_mut()
        .zip(points.par_iter())
        .for_each(|(slot, &p)| *slot = nearest_centroid(p, centroids));
}
