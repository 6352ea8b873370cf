use glam::{Mat4, Vec3};
use crate::error::EditResult;
use crate::scene::mesh::GeometryBuffer;
use crate::scene::weld::{self, WeldedEdge};
use crate::tools::EditMode;
use crate::util::picking::Ray;

/// The raw element a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTarget {
    Vertex(usize),
    /// Raw edge, stored as `(low, high)`.
    Edge(usize, usize),
}

/// A pickable sphere drawn over a vertex or an edge midpoint, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub target: MarkerTarget,
    pub center: Vec3,
    pub radius: f32,
}

/// Nearest marker under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub target: MarkerTarget,
    /// World position of the marker center.
    pub position: Vec3,
    pub distance: f32,
}

/// A marker hit mapped back to the geometry it moves.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedElement {
    Vertex(Vec<usize>),
    Edge(WeldedEdge),
}

/// One marker per raw vertex, at its world position.
pub fn vertex_markers(buffer: &GeometryBuffer, world: Mat4, radius: f32) -> Vec<Marker> {
    buffer
        .position_slice()
        .iter()
        .enumerate()
        .map(|(i, p)| Marker {
            target: MarkerTarget::Vertex(i),
            center: world.transform_point3(*p),
            radius,
        })
        .collect()
}

/// One marker per distinct raw edge, at its world midpoint.
pub fn edge_markers(buffer: &GeometryBuffer, world: Mat4, radius: f32) -> Vec<Marker> {
    let positions = buffer.position_slice();
    buffer
        .edges()
        .into_iter()
        .filter_map(|(a, b)| {
            let (a, b) = (a as usize, b as usize);
            let pa = world.transform_point3(*positions.get(a)?);
            let pb = world.transform_point3(*positions.get(b)?);
            Some(Marker {
                target: MarkerTarget::Edge(a, b),
                center: (pa + pb) * 0.5,
                radius,
            })
        })
        .collect()
}

/// Markers for the given edit mode. Faces have none.
pub fn markers_for_mode(
    mode: EditMode,
    buffer: &GeometryBuffer,
    world: Mat4,
    vertex_radius: f32,
    edge_radius: f32,
) -> Vec<Marker> {
    match mode {
        EditMode::Vertex => vertex_markers(buffer, world, vertex_radius),
        EditMode::Edge => edge_markers(buffer, world, edge_radius),
        EditMode::Face => Vec::new(),
    }
}

/// Nearest marker hit by the ray.
pub fn pick(ray: &Ray, markers: &[Marker]) -> Option<PickHit> {
    let mut closest: Option<PickHit> = None;
    for marker in markers {
        if let Some(t) = ray.intersect_sphere(marker.center, marker.radius) {
            let dominated = closest.as_ref().is_some_and(|c| c.distance <= t);
            if !dominated {
                closest = Some(PickHit { target: marker.target, position: marker.center, distance: t });
            }
        }
    }
    closest
}

/// Map a marker the host hit-tested itself (by index into `markers`) back to a hit.
pub fn resolve_marker(markers: &[Marker], index: usize) -> Option<PickHit> {
    markers.get(index).map(|m| PickHit { target: m.target, position: m.center, distance: 0.0 })
}

/// Expand a hit target to the weld group or weld-expanded edge it moves.
pub fn resolve(buffer: &GeometryBuffer, target: MarkerTarget, epsilon: f32) -> EditResult<ResolvedElement> {
    match target {
        MarkerTarget::Vertex(i) => Ok(ResolvedElement::Vertex(weld::weld_group(buffer, i, epsilon)?)),
        MarkerTarget::Edge(a, b) => Ok(ResolvedElement::Edge(weld::weld_edge(buffer, a, b, epsilon)?)),
    }
}

/// Nearest triangle hit by the ray, as `(triangle index, distance)`.
pub fn pick_triangle(ray: &Ray, buffer: &GeometryBuffer, world: Mat4) -> Option<(usize, f32)> {
    let positions = buffer.position_slice();
    let mut closest: Option<(usize, f32)> = None;
    for (ti, [a, b, c]) in buffer.triangles().into_iter().enumerate() {
        let (Some(pa), Some(pb), Some(pc)) = (
            positions.get(a as usize),
            positions.get(b as usize),
            positions.get(c as usize),
        ) else {
            continue;
        };
        let hit = ray.intersect_triangle(
            world.transform_point3(*pa),
            world.transform_point3(*pb),
            world.transform_point3(*pc),
        );
        if let Some(t) = hit
            && closest.is_none_or(|(_, best)| t < best)
        {
            closest = Some((ti, t));
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::primitive::Primitive;
    use crate::scene::weld::WELD_EPSILON;

    #[test]
    fn vertex_marker_follows_world_transform() {
        let cube = Primitive::default_box().build();
        let world = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        let markers = vertex_markers(&cube, world, 0.05);
        assert_eq!(markers.len(), 24);
        let local = cube.position(0).unwrap();
        assert_eq!(markers[0].center, local + Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn nearest_vertex_marker_wins() {
        let cube = Primitive::default_box().build();
        let markers = vertex_markers(&cube, Mat4::IDENTITY, 0.05);
        // Straight down onto the (0.5, 0.5, 0.5) corner; the (0.5, -0.5, 0.5)
        // corner is on the same line but further away.
        let ray = Ray::new(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y);
        let hit = pick(&ray, &markers).unwrap();
        assert_eq!(hit.position, Vec3::new(0.5, 0.5, 0.5));
        assert!((hit.distance - 4.45).abs() < 1e-4);

        match resolve(&cube, hit.target, WELD_EPSILON).unwrap() {
            ResolvedElement::Vertex(group) => {
                assert_eq!(group.len(), 3);
                for i in group {
                    assert_eq!(cube.position(i).unwrap(), Vec3::splat(0.5));
                }
            }
            other => panic!("expected vertex, got {other:?}"),
        }
    }

    #[test]
    fn edge_markers_sit_on_midpoints() {
        let cube = Primitive::default_box().build();
        let markers = edge_markers(&cube, Mat4::IDENTITY, 0.08);
        // 12 cube edges + 6 face diagonals, each present once per adjacent face
        assert_eq!(markers.len(), 6 * 5);
        let ray = Ray::new(Vec3::new(0.5, 5.0, 0.0), Vec3::NEG_Y);
        let hit = pick(&ray, &markers).unwrap();
        assert_eq!(hit.position, Vec3::new(0.5, 0.5, 0.0));
        assert!(matches!(hit.target, MarkerTarget::Edge(_, _)));
    }

    #[test]
    fn miss_returns_none() {
        let cube = Primitive::default_box().build();
        let markers = vertex_markers(&cube, Mat4::IDENTITY, 0.05);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(pick(&ray, &markers).is_none());
        assert!(resolve_marker(&markers, 100).is_none());
        assert_eq!(resolve_marker(&markers, 3).unwrap().target, MarkerTarget::Vertex(3));
    }

    #[test]
    fn triangle_pick_hits_top_face() {
        let cube = Primitive::default_box().build();
        let ray = Ray::new(Vec3::new(0.1, 5.0, 0.2), Vec3::NEG_Y);
        let (ti, t) = pick_triangle(&ray, &cube, Mat4::IDENTITY).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        let [a, b, c] = cube.triangles()[ti];
        for i in [a, b, c] {
            assert_eq!(cube.position(i as usize).unwrap().y, 0.5);
        }
    }
}
