use glam::Vec3;
use crate::error::{EditError, EditResult};
use crate::render::Vertex;

/// CPU-side triangle mesh: positions, normals, and an optional index list.
///
/// Buffers come in the unwelded layout renderers like: a corner shared by
/// several faces is stored once per face. Without `indices`, every run of three
/// vertices is a triangle.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuffer {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Option<Vec<u32>>,
    /// Bumped on every position write so the renderer knows to re-upload.
    revision: u64,
}

impl GeometryBuffer {
    /// Build a buffer and compute its normals.
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        let mut buffer = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
            revision: 0,
        };
        buffer.compute_normals();
        buffer
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Flat `[x, y, z, x, y, z, ...]` positions, as consumed by the renderer.
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat per-vertex normals matching `positions()`.
    pub fn normals(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn position_slice(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> EditResult<Vec3> {
        self.positions
            .get(index)
            .copied()
            .ok_or(EditError::InvalidIndex { index, len: self.positions.len() })
    }

    pub fn normal(&self, index: usize) -> EditResult<Vec3> {
        self.normals
            .get(index)
            .copied()
            .ok_or(EditError::InvalidIndex { index, len: self.normals.len() })
    }

    /// Write `position` at every index. Validates all indices first so a bad
    /// index leaves the buffer untouched. Normals are not recomputed.
    pub fn set_positions(&mut self, indices: impl IntoIterator<Item = usize> + Clone, position: Vec3) -> EditResult<()> {
        self.check_indices(indices.clone())?;
        for i in indices {
            self.positions[i] = position;
        }
        self.revision += 1;
        Ok(())
    }

    /// Add `offset` to every index (read-modify-write). Same validation as
    /// `set_positions`.
    pub fn translate(&mut self, indices: impl IntoIterator<Item = usize> + Clone, offset: Vec3) -> EditResult<()> {
        self.check_indices(indices.clone())?;
        for i in indices {
            self.positions[i] += offset;
        }
        self.revision += 1;
        Ok(())
    }

    fn check_indices(&self, indices: impl IntoIterator<Item = usize>) -> EditResult<()> {
        let len = self.positions.len();
        match indices.into_iter().find(|&i| i >= len) {
            Some(index) => Err(EditError::InvalidIndex { index, len }),
            None => Ok(()),
        }
    }

    /// Triangles as vertex index triples.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => (0..self.positions.len() as u32 / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }

    /// Every distinct triangle edge as an `(low, high)` index pair, in the
    /// order first encountered.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut seen = std::collections::HashSet::new();
        let mut edges = Vec::new();
        for [a, b, c] in self.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let key = (u.min(v), u.max(v));
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }
        edges
    }

    /// Recompute vertex normals.
    ///
    /// Indexed meshes get area-weighted averages of incident face normals;
    /// non-indexed meshes get the flat normal of their own triangle.
    pub fn compute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            if a >= self.positions.len() || b >= self.positions.len() || c >= self.positions.len() {
                continue;
            }
            let p0 = self.positions[a];
            // Length = 2x triangle area
            let face_normal = (self.positions[c] - self.positions[b]).cross(p0 - self.positions[b]);
            for i in [a, b, c] {
                self.normals[i] += face_normal;
            }
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }

    /// Interleaved vertices for GPU upload.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| Vertex { position: p.to_array(), normal: n.to_array() })
            .collect()
    }
}
