use crate::error::{Error, Result};
use crate::vertex::Vertex;

/// Indexed triangle mesh.
///
/// Every triangle has three index triples into the shared vertex pool: one for
/// the position, one for the color and one for the texture coordinate. A
/// corner can therefore share a position with its neighbour while carrying a
/// different color or uv, as happens along texture seams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    tvi: Vec<[usize; 3]>,
    tci: Vec<[usize; 3]>,
    tti: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(
        vertices: Vec<Vertex>,
        tvi: Vec<[usize; 3]>,
        tci: Vec<[usize; 3]>,
        tti: Vec<[usize; 3]>,
    ) -> Result<Self> {
        if tvi.len() != tci.len() || tvi.len() != tti.len() {
            return Err(Error::MismatchedIndexLists {
                positions: tvi.len(),
                colors: tci.len(),
                texcoords: tti.len(),
            });
        }
        let vertex_count = vertices.len();
        for list in [&tvi, &tci, &tti] {
            for (triangle, indices) in list.iter().enumerate() {
                if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                    return Err(Error::IndexOutOfRange { triangle, index, vertex_count });
                }
            }
        }
        Ok(Self { vertices, tvi, tci, tti })
    }

    /// Mesh where all three attributes of a corner come from the same vertex.
    pub fn from_triangles(vertices: Vec<Vertex>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        Self::new(vertices, triangles.clone(), triangles.clone(), triangles)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn position_indices(&self) -> &[[usize; 3]] {
        &self.tvi
    }

    pub fn color_indices(&self) -> &[[usize; 3]] {
        &self.tci
    }

    pub fn texcoord_indices(&self) -> &[[usize; 3]] {
        &self.tti
    }

    pub fn num_triangles(&self) -> usize {
        self.tvi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tvi.is_empty()
    }
}
