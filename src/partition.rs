//! Splitting a mesh into one single-color sub-mesh per palette cluster.

use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::channel::Channel;
use crate::error::ReduceError;
use crate::palette::Palette;

/// Conditionally parallel iterator over a slice.
macro_rules! maybe_par_iter {
    ($slice:expr) => {{
        #[cfg(feature = "parallel")]
        {
            $slice.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice.iter()
        }
    }};
}

/// Polygon mesh: a vertex-position table plus faces indexing into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    faces: Vec<Vec<u32>>,
}

impl Mesh {
    /// Build a mesh, checking every face index against the position table.
    pub fn new(positions: Vec<[f32; 3]>, faces: Vec<Vec<u32>>) -> Result<Self, ReduceError> {
        for (face, verts) in faces.iter().enumerate() {
            if let Some(&vertex) = verts.iter().find(|&&v| v as usize >= positions.len()) {
                return Err(ReduceError::VertexOutOfRange {
                    face,
                    vertex,
                    vertex_count: positions.len(),
                });
            }
        }
        Ok(Self { positions, faces })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// One cluster's faces as a standalone mesh with a uniform color.
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh<T: Channel> {
    pub cluster: usize,
    pub color: RGB<T>,
    pub mesh: Mesh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T: Channel> {
    /// Non-empty clusters in ascending cluster order.
    pub parts: Vec<SubMesh<T>>,
    /// Faces whose cluster id was missing or outside the palette and were
    /// moved to cluster 0.
    pub clamped_faces: usize,
}

/// Group faces by cluster and compact each group's vertices.
///
/// Vertices shared by faces of different clusters are copied into every
/// sub-mesh that uses them, so each part stands alone.
///
/// # Panics
/// If the palette is empty and the mesh has faces.
pub fn partition<T: Channel>(
    mesh: &Mesh,
    assignment: &[usize],
    palette: &Palette<T>,
) -> Partition<T> {
    let k = palette.len();
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    let mut clamped_faces = 0;
    assert!(
        k > 0 || mesh.face_count() == 0,
        "cannot partition onto an empty palette"
    );

    for face in 0..mesh.face_count() {
        let cluster = match assignment.get(face) {
            Some(&c) if c < k => c,
            _ => {
                clamped_faces += 1;
                0
            }
        };
        groups[cluster].push(face);
    }

    if clamped_faces > 0 {
        log::warn!(
            "{clamped_faces} of {} faces had no valid cluster (palette size {k}), assigned to cluster 0",
            mesh.face_count()
        );
    }

    let parts: Vec<SubMesh<T>> = maybe_par_iter!(groups)
        .enumerate()
        .filter(|(_, faces)| !faces.is_empty())
        .map(|(cluster, faces)| SubMesh {
            cluster,
            color: palette.entries()[cluster],
            mesh: extract(mesh, faces),
        })
        .collect();

    log::debug!(
        "partitioned {} faces into {} parts",
        mesh.face_count(),
        parts.len()
    );

    Partition {
        parts,
        clamped_faces,
    }
}

/// Copy `faces` of `mesh` into a new mesh indexed from 0.
fn extract(mesh: &Mesh, faces: &[usize]) -> Mesh {
    let mut used: Vec<u32> = faces
        .iter()
        .flat_map(|&f| mesh.faces[f].iter().copied())
        .collect();
    used.sort_unstable();
    used.dedup();

    // Position in `used` is the new index.
    let remap = |old: u32| used.binary_search(&old).unwrap_or_default() as u32;

    let local_faces = faces
        .iter()
        .map(|&f| mesh.faces[f].iter().map(|&v| remap(v)).collect())
        .collect();
    let positions = used.iter().map(|&v| mesh.positions[v as usize]).collect();

    Mesh {
        positions,
        faces: local_faces,
    }
}
