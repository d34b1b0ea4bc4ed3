use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("palette size must be at least 2, got {0}")]
    InvalidPaletteSize(usize),

    #[error("max_iterations must be at least 1")]
    InvalidIterations,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("sample source yields {samples} colors for a mesh with {faces} faces")]
    SampleCountMismatch { samples: usize, faces: usize },
}
