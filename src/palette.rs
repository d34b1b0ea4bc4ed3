use alloc::vec::Vec;

use rgb::RGB;

use crate::channel::{Channel, distance_sq, gray, to_working};

/// A fixed-size color palette.
///
/// Entries are kept in channel units; a working `f32` copy backs the
/// nearest-entry search so lookups do not reconvert on every pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette<T: Channel> {
    entries: Vec<RGB<T>>,
    working: Vec<RGB<f32>>,
}

impl<T: Channel> Palette<T> {
    pub fn new(entries: Vec<RGB<T>>) -> Self {
        let working = entries.iter().map(|&c| to_working(c)).collect();
        Self { entries, working }
    }

    /// Truncate or pad `entries` to exactly `k`, padding with gray fillers.
    pub fn with_len(mut entries: Vec<RGB<T>>, k: usize) -> Self {
        entries.truncate(k);
        while entries.len() < k {
            entries.push(gray(entries.len(), k));
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[RGB<T>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RGB<T>> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RGB<T>> {
        self.entries.get(index).copied()
    }

    pub fn contains(&self, color: RGB<T>) -> bool {
        self.entries.contains(&color)
    }

    /// Nearest entry for a color in channel units. Ties resolve to the
    /// lowest index. Returns 0 for an empty palette.
    pub fn nearest(&self, color: RGB<f32>) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::MAX;

        for (i, &entry) in self.working.iter().enumerate() {
            let d = distance_sq(color, entry);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }

        best_idx
    }

    /// Working-space value of entry `index`.
    pub(crate) fn working(&self, index: usize) -> RGB<f32> {
        self.working[index]
    }
}
