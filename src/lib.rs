#![forbid(unsafe_code)]

extern crate alloc;

pub mod channel;
pub mod dither;
pub mod error;
pub mod field;
pub mod guard;
pub mod kmeans;
pub mod palette;
pub mod partition;
pub mod sampling;
pub mod source;

pub use channel::Channel;
pub use dither::DitherMode;
pub use error::ReduceError;
pub use field::PixelField;
pub use guard::{DistinctnessThresholds, GuardOutcome};
pub use kmeans::{Clustering, build_palette};
pub use palette::Palette;
pub use partition::{Mesh, Partition, SubMesh, partition};
pub use source::{CornerColors, FaceColors, MaterialColors, SampleSource};

use alloc::vec::Vec;

use rgb::{RGB, RGBA};

/// Configuration for palette reduction.
#[derive(Debug, Clone)]
pub struct ReduceConfig {
    /// Number of palette entries (k, at least 2).
    pub palette_size: usize,
    /// k-means rounds. Always run in full; there is no convergence check.
    pub max_iterations: usize,
    /// Dithering mode for images.
    pub dither: DitherMode,
    /// Replace palettes that collapsed to indistinguishable colors.
    pub guard_distinctness: bool,
    /// When a palette counts as collapsed.
    pub distinctness: DistinctnessThresholds,
    /// Minimum normalized opacity for a pixel to feed the palette.
    pub alpha_cutoff: f32,
    /// Upper bound on pixels fed to k-means (0 = no bound).
    pub max_palette_samples: usize,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            palette_size: 4,
            max_iterations: 30,
            dither: DitherMode::FloydSteinberg,
            guard_distinctness: true,
            distinctness: DistinctnessThresholds::default(),
            alpha_cutoff: 128.0 / 255.0,
            max_palette_samples: 500_000,
        }
    }
}

impl ReduceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn palette_size(mut self, k: usize) -> Self {
        self.palette_size = k;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn dither(mut self, mode: DitherMode) -> Self {
        self.dither = mode;
        self
    }

    pub fn use_dither(mut self, enabled: bool) -> Self {
        self.dither = DitherMode::from(enabled);
        self
    }

    pub fn guard_distinctness(mut self, enabled: bool) -> Self {
        self.guard_distinctness = enabled;
        self
    }

    pub fn distinctness(mut self, thresholds: DistinctnessThresholds) -> Self {
        self.distinctness = thresholds;
        self
    }

    pub fn alpha_cutoff(mut self, cutoff: f32) -> Self {
        self.alpha_cutoff = cutoff;
        self
    }

    pub fn max_palette_samples(mut self, n: usize) -> Self {
        self.max_palette_samples = n;
        self
    }

    pub fn validate(&self) -> Result<(), ReduceError> {
        if self.palette_size < 2 {
            return Err(ReduceError::InvalidPaletteSize(self.palette_size));
        }
        if self.max_iterations == 0 {
            return Err(ReduceError::InvalidIterations);
        }
        Ok(())
    }

    /// Cluster, then run the distinctness guard if enabled.
    fn cluster<T: Channel>(
        &self,
        samples: &[RGB<T>],
    ) -> Result<(Clustering<T>, GuardOutcome), ReduceError> {
        let mut clustering = build_palette(samples, self.palette_size, self.max_iterations)?;
        let mut outcome = GuardOutcome::Kept;
        if self.guard_distinctness {
            let (palette, o) =
                guard::guard_palette(clustering.palette, self.palette_size, &self.distinctness);
            clustering.palette = palette;
            outcome = o;
        }
        Ok((clustering, outcome))
    }
}

/// Image reduction result.
#[derive(Debug, Clone)]
pub struct ImageReduction<T: Channel> {
    palette: Palette<T>,
    image: PixelField<RGBA<T>>,
    indices: Vec<usize>,
    guard: GuardOutcome,
}

impl<T: Channel> ImageReduction<T> {
    pub fn palette(&self) -> &Palette<T> {
        &self.palette
    }

    /// Output pixels: palette colors with the input alpha.
    pub fn image(&self) -> &PixelField<RGBA<T>> {
        &self.image
    }

    pub fn into_image(self) -> PixelField<RGBA<T>> {
        self.image
    }

    /// Palette index of each pixel, row-major.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn guard_outcome(&self) -> GuardOutcome {
        self.guard
    }
}

/// Reduce an RGBA image to `config.palette_size` colors.
///
/// Alpha never takes part in clustering or dithering; it is copied to the
/// output unchanged.
pub fn reduce_image<T: Channel>(
    field: &PixelField<RGBA<T>>,
    config: &ReduceConfig,
) -> Result<ImageReduction<T>, ReduceError> {
    config.validate()?;

    let samples =
        sampling::palette_samples(field.pixels(), config.alpha_cutoff, config.max_palette_samples);
    let (clustering, guard) = config.cluster(&samples)?;
    let palette = clustering.palette;

    let indices = dither::dither_indices(field, &palette, config.dither);
    let image = dither::colorize(field, &palette, &indices);

    log::debug!(
        "reduced {}x{} image to {} colors from {} samples ({:?}, guard {:?})",
        field.width(),
        field.height(),
        palette.len(),
        samples.len(),
        config.dither,
        guard
    );

    Ok(ImageReduction {
        palette,
        image,
        indices,
        guard,
    })
}

/// Reduce an opaque RGB image. The output carries a fully opaque alpha.
pub fn reduce_image_rgb<T: Channel>(
    field: &PixelField<RGB<T>>,
    config: &ReduceConfig,
) -> Result<ImageReduction<T>, ReduceError> {
    reduce_image(&field.to_rgba(), config)
}

/// Mesh reduction result.
#[derive(Debug, Clone)]
pub struct MeshReduction<T: Channel> {
    palette: Palette<T>,
    assignment: Vec<usize>,
    partition: Partition<T>,
    guard: GuardOutcome,
}

impl<T: Channel> MeshReduction<T> {
    pub fn palette(&self) -> &Palette<T> {
        &self.palette
    }

    /// Cluster index per face.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// One sub-mesh per non-empty cluster.
    pub fn partition(&self) -> &Partition<T> {
        &self.partition
    }

    pub fn into_partition(self) -> Partition<T> {
        self.partition
    }

    pub fn guard_outcome(&self) -> GuardOutcome {
        self.guard
    }
}

/// Reduce a mesh to `config.palette_size` colors and split it per color.
///
/// `source` supplies one color per face, in face order.
pub fn reduce_mesh<T: Channel, S: SampleSource<T> + ?Sized>(
    mesh: &Mesh,
    source: &S,
    config: &ReduceConfig,
) -> Result<MeshReduction<T>, ReduceError> {
    config.validate()?;

    if source.sample_count() != mesh.face_count() {
        return Err(ReduceError::SampleCountMismatch {
            samples: source.sample_count(),
            faces: mesh.face_count(),
        });
    }

    let samples = source.collect_samples();
    let (clustering, guard) = config.cluster(&samples)?;
    let partition = partition::partition(mesh, &clustering.assignment, &clustering.palette);

    Ok(MeshReduction {
        palette: clustering.palette,
        assignment: clustering.assignment,
        partition,
        guard,
    })
}
