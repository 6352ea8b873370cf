use std::time::{Duration, Instant};
use glam::{Mat4, Vec3};
use crate::error::{EditError, EditResult};
use crate::scene::ObjectId;
use crate::scene::mesh::GeometryBuffer;
use crate::scene::weld::{self, WeldedEdge};
use crate::util::picking::{Plane, Ray};

/// A vertex being dragged. Lives from click to pointer release.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexDrag {
    pub object: ObjectId,
    /// Raw indices moved together.
    pub group: Vec<usize>,
    /// Current world position of the group.
    pub position: Vec3,
    pub initial_position: Vec3,
}

/// An edge being dragged. Lives from the arming double-click to a cancel click.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDrag {
    pub object: ObjectId,
    pub edge: WeldedEdge,
    /// World positions of the two logical endpoints.
    pub positions: [Vec3; 2],
    pub initial_positions: [Vec3; 2],
    /// World anchor the pointer drags; starts at the edge midpoint.
    pub midpoint: Vec3,
}

/// At most one drag is in progress at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    Vertex(VertexDrag),
    Edge(EdgeDrag),
}

impl DragSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragSession::Idle)
    }

    pub fn object(&self) -> Option<ObjectId> {
        match self {
            DragSession::Idle => None,
            DragSession::Vertex(d) => Some(d.object),
            DragSession::Edge(d) => Some(d.object),
        }
    }

    /// World point the drag plane passes through.
    pub fn anchor(&self) -> Option<Vec3> {
        match self {
            DragSession::Idle => None,
            DragSession::Vertex(d) => Some(d.position),
            DragSession::Edge(d) => Some(d.midpoint),
        }
    }
}

/// Plane through `anchor` facing the camera, so dragging moves perpendicular to the view.
pub fn drag_plane(anchor: Vec3, view_direction: Vec3) -> Plane {
    Plane::from_normal_and_point(view_direction, anchor)
}

/// Where the pointer ray meets the drag plane through `anchor`.
pub fn drag_target(ray: &Ray, anchor: Vec3, view_direction: Vec3) -> EditResult<Vec3> {
    ray.intersect_plane(&drag_plane(anchor, view_direction))
        .ok_or(EditError::NoIntersection)
}

/// Inverse of an object's world matrix. Fails instead of producing NaN when
/// a scale axis is zero.
pub fn local_from_world(world: Mat4) -> EditResult<Mat4> {
    if world.determinant().abs() < f32::EPSILON {
        return Err(EditError::SingularTransform);
    }
    let inverse = world.inverse();
    if !inverse.is_finite() {
        return Err(EditError::SingularTransform);
    }
    Ok(inverse)
}

impl VertexDrag {
    /// Weld the picked vertex and remember where it started.
    pub fn start(object: ObjectId, buffer: &GeometryBuffer, world: Mat4, index: usize, epsilon: f32) -> EditResult<Self> {
        let group = weld::weld_group(buffer, index, epsilon)?;
        let position = world.transform_point3(buffer.position(index)?);
        Ok(Self { object, group, position, initial_position: position })
    }

    /// Put every welded vertex at `target` (world space) and refresh normals.
    pub fn update(&mut self, buffer: &mut GeometryBuffer, world: Mat4, target: Vec3) -> EditResult<()> {
        let local = local_from_world(world)?.transform_point3(target);
        buffer.set_positions(self.group.iter().copied(), local)?;
        buffer.compute_normals();
        self.position = target;
        Ok(())
    }
}

impl EdgeDrag {
    /// Weld both endpoints of the raw edge `(a, b)` and anchor at its midpoint.
    pub fn start(object: ObjectId, buffer: &GeometryBuffer, world: Mat4, a: usize, b: usize, epsilon: f32) -> EditResult<Self> {
        let edge = weld::weld_edge(buffer, a, b, epsilon)?;
        let positions = [
            world.transform_point3(buffer.position(a)?),
            world.transform_point3(buffer.position(b)?),
        ];
        Ok(Self {
            object,
            edge,
            positions,
            initial_positions: positions,
            midpoint: (positions[0] + positions[1]) * 0.5,
        })
    }

    /// Translate every connected vertex by `target - midpoint` and move the anchor.
    pub fn update(&mut self, buffer: &mut GeometryBuffer, world: Mat4, target: Vec3) -> EditResult<()> {
        let offset = target - self.midpoint;
        let local_offset = local_from_world(world)?.transform_vector3(offset);
        buffer.translate(self.edge.connected.iter().copied(), local_offset)?;
        buffer.compute_normals();
        self.midpoint = target;
        for p in &mut self.positions {
            *p += offset;
        }
        Ok(())
    }
}

/// First click on an edge, waiting for a second one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingClick {
    pub edge: (usize, usize),
    pub at: Instant,
}

/// Double-click detection by timestamp comparison.
///
/// Nothing is scheduled: the first click is only remembered, and the next
/// click decides whether it completes a double-click. An expired first click
/// is just a new first click.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    pending: Option<PendingClick>,
}

impl ClickTracker {
    /// Record a click on `edge`. Returns true when it completes a double-click.
    pub fn click(&mut self, edge: (usize, usize), now: Instant, window: Duration) -> bool {
        let edge = (edge.0.min(edge.1), edge.0.max(edge.1));
        if let Some(prev) = self.pending.take()
            && prev.edge == edge
            && now.saturating_duration_since(prev.at) <= window
        {
            return true;
        }
        self.pending = Some(PendingClick { edge, at: now });
        false
    }

    pub fn pending(&self) -> Option<PendingClick> {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }
}
