use std::collections::BTreeSet;
use glam::Vec3;
use crate::error::EditResult;
use crate::scene::mesh::GeometryBuffer;

/// Default distance under which two raw vertices count as the same point.
pub const WELD_EPSILON: f32 = 1e-4;

/// Every raw index within `epsilon` of `index`'s position, `index` included,
/// in ascending order.
///
/// Linear scan over the buffer. Groups are not cached: a drag changes which
/// vertices coincide.
pub fn weld_group(buffer: &GeometryBuffer, index: usize, epsilon: f32) -> EditResult<Vec<usize>> {
    let target = buffer.position(index)?;
    Ok(coincident(buffer.position_slice(), index, target, epsilon))
}

/// `index` always belongs to its own group, whatever `epsilon` is.
fn coincident(positions: &[Vec3], index: usize, target: Vec3, epsilon: f32) -> Vec<usize> {
    positions
        .iter()
        .enumerate()
        .filter(|&(i, p)| i == index || p.distance(target) < epsilon)
        .map(|(i, _)| i)
        .collect()
}

/// A logical edge between two weld groups.
#[derive(Debug, Clone, PartialEq)]
pub struct WeldedEdge {
    pub start: Vec<usize>,
    pub end: Vec<usize>,
    /// Cartesian product of `start` and `end`: every raw pair this edge stands for.
    pub pairs: Vec<(usize, usize)>,
    /// Union of both groups.
    pub connected: BTreeSet<usize>,
}

impl WeldedEdge {
    /// Whether the raw edge `(a, b)` (either orientation) belongs to this edge.
    pub fn contains_pair(&self, a: usize, b: usize) -> bool {
        self.pairs.iter().any(|&(u, v)| (u == a && v == b) || (u == b && v == a))
    }
}

/// Expand the raw edge `(a, b)` to the weld groups of both endpoints.
pub fn weld_edge(buffer: &GeometryBuffer, a: usize, b: usize, epsilon: f32) -> EditResult<WeldedEdge> {
    let start = weld_group(buffer, a, epsilon)?;
    let end = weld_group(buffer, b, epsilon)?;

    let pairs = start
        .iter()
        .flat_map(|&u| end.iter().map(move |&v| (u, v)))
        .collect();
    let connected = start.iter().chain(end.iter()).copied().collect();

    Ok(WeldedEdge { start, end, pairs, connected })
}
