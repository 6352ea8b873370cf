use std::f32::consts::{PI, TAU};
use glam::Vec3;
use serde::{Serialize, Deserialize};
use crate::scene::mesh::GeometryBuffer;

/// Radial segment counts offered for cylinders.
pub const CYLINDER_RESOLUTIONS: &[u32] = &[32, 16, 8];
/// Width segment counts offered for spheres.
pub const SPHERE_RESOLUTIONS: &[u32] = &[64, 32, 16, 8];

/// The parametric shape a mesh object was generated from.
///
/// Each variant carries only its own parameters; the geometry is always
/// rebuilt from these, never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    },
    Cone { radius: f32, height: f32, radial_segments: u32 },
    Tetrahedron { radius: f32 },
}

impl Primitive {
    pub fn default_box() -> Self {
        Primitive::Box { width: 1.0, height: 1.0, depth: 1.0 }
    }

    pub fn default_sphere() -> Self {
        Primitive::Sphere { radius: 0.5, width_segments: 32, height_segments: 16 }
    }

    pub fn default_cylinder() -> Self {
        Primitive::Cylinder {
            radius_top: 0.5,
            radius_bottom: 0.5,
            height: 1.0,
            radial_segments: 32,
            height_segments: 1,
            open_ended: false,
        }
    }

    pub fn default_cone() -> Self {
        Primitive::Cone { radius: 0.5, height: 1.0, radial_segments: 32 }
    }

    pub fn default_tetrahedron() -> Self {
        Primitive::Tetrahedron { radius: 0.5 }
    }

    /// Display name used when the primitive is added to a scene.
    pub fn label(&self) -> &'static str {
        match self {
            Primitive::Box { .. } => "Cube",
            Primitive::Sphere { .. } => "Sphere",
            Primitive::Cylinder { .. } => "Cylinder",
            Primitive::Cone { .. } => "Cone",
            Primitive::Tetrahedron { .. } => "Tetrahedron",
        }
    }

    /// Current resolution, for shapes that have an adjustable one.
    pub fn resolution(&self) -> Option<u32> {
        match *self {
            Primitive::Cylinder { radial_segments, .. } => Some(radial_segments),
            Primitive::Sphere { width_segments, .. } => Some(width_segments),
            _ => None,
        }
    }

    /// Resolutions a user may pick from. Empty when not adjustable.
    pub fn resolution_options(&self) -> &'static [u32] {
        match self {
            Primitive::Cylinder { .. } => CYLINDER_RESOLUTIONS,
            Primitive::Sphere { .. } => SPHERE_RESOLUTIONS,
            _ => &[],
        }
    }

    /// Same shape at a new resolution. Spheres keep a 2:1 width/height
    /// segment ratio. Returns None for shapes without one.
    pub fn with_resolution(&self, segments: u32) -> Option<Self> {
        let segments = segments.max(3);
        match *self {
            Primitive::Cylinder { radius_top, radius_bottom, height, height_segments, open_ended, .. } => {
                Some(Primitive::Cylinder {
                    radius_top,
                    radius_bottom,
                    height,
                    radial_segments: segments,
                    height_segments,
                    open_ended,
                })
            }
            Primitive::Sphere { radius, .. } => Some(Primitive::Sphere {
                radius,
                width_segments: segments,
                height_segments: (segments / 2).max(2),
            }),
            _ => None,
        }
    }

    /// Generate the unwelded triangle buffer for this shape.
    pub fn build(&self) -> GeometryBuffer {
        let (positions, indices) = match *self {
            Primitive::Box { width, height, depth } => build_box(width, height, depth),
            Primitive::Sphere { radius, width_segments, height_segments } => {
                build_sphere(radius, width_segments.max(3), height_segments.max(2))
            }
            Primitive::Cylinder { radius_top, radius_bottom, height, radial_segments, height_segments, open_ended } => {
                build_cylinder(radius_top, radius_bottom, height, radial_segments.max(3), height_segments.max(1), open_ended)
            }
            Primitive::Cone { radius, height, radial_segments } => {
                build_cylinder(0.0, radius, height, radial_segments.max(3), 1, false)
            }
            Primitive::Tetrahedron { radius } => return build_tetrahedron(radius),
        };
        GeometryBuffer::new(positions, Some(indices))
    }
}

/// Six 1x1 planes, four vertices each.
fn build_box(width: f32, height: f32, depth: f32) -> (Vec<Vec3>, Vec<u32>) {
    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (u axis, v axis, w axis, u dir, v dir, plane width, plane height, plane depth)
    let planes = [
        (2, 1, 0, -1.0, -1.0, depth, height, width),
        (2, 1, 0, 1.0, -1.0, depth, height, -width),
        (0, 2, 1, 1.0, 1.0, width, depth, height),
        (0, 2, 1, 1.0, -1.0, width, depth, -height),
        (0, 1, 2, 1.0, -1.0, width, height, depth),
        (0, 1, 2, -1.0, -1.0, width, height, -depth),
    ];

    for (u, v, w, udir, vdir, pw, ph, pd) in planes {
        let base = positions.len() as u32;
        for iy in 0..2 {
            let y = iy as f32 * ph - ph / 2.0;
            for ix in 0..2 {
                let x = ix as f32 * pw - pw / 2.0;
                let mut p = Vec3::ZERO;
                p[u] = x * udir;
                p[v] = y * vdir;
                p[w] = pd / 2.0;
                positions.push(p);
            }
        }
        let (a, b, c, d) = (base, base + 2, base + 3, base + 1);
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    (positions, indices)
}

/// UV sphere with a duplicated seam column and a ring of pole vertices.
fn build_sphere(radius: f32, width_segments: u32, height_segments: u32) -> (Vec<Vec3>, Vec<u32>) {
    let mut positions = Vec::new();
    let mut grid = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::new();
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;
            row.push(positions.len() as u32);
            positions.push(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
        grid.push(row);
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // Pole rows collapse to one triangle per quad.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    (positions, indices)
}

/// Open tube plus optional caps. A zero top radius gives a cone.
fn build_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> (Vec<Vec3>, Vec<u32>) {
    let half_height = height / 2.0;
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    let mut grid = Vec::new();
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::new();
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            row.push(positions.len() as u32);
            positions.push(Vec3::new(radius * theta.sin(), -v * height + half_height, radius * theta.cos()));
        }
        grid.push(row);
    }

    for x in 0..radial_segments as usize {
        for y in 0..height_segments as usize {
            let a = grid[y][x];
            let b = grid[y + 1][x];
            let c = grid[y + 1][x + 1];
            let d = grid[y][x + 1];
            if radius_top > 0.0 || y != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if radius_bottom > 0.0 || y != height_segments as usize - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            build_cap(&mut positions, &mut indices, radius_top, half_height, radial_segments, true);
        }
        if radius_bottom > 0.0 {
            build_cap(&mut positions, &mut indices, radius_bottom, half_height, radial_segments, false);
        }
    }

    (positions, indices)
}

fn build_cap(
    positions: &mut Vec<Vec3>,
    indices: &mut Vec<u32>,
    radius: f32,
    half_height: f32,
    radial_segments: u32,
    top: bool,
) {
    let y = if top { half_height } else { -half_height };

    // One center vertex per segment, like the ring, so each fan triangle owns its apex.
    let center_start = positions.len() as u32;
    for _ in 0..radial_segments {
        positions.push(Vec3::new(0.0, y, 0.0));
    }
    let ring_start = positions.len() as u32;
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * TAU;
        positions.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
    }

    for x in 0..radial_segments {
        let c = center_start + x;
        let i = ring_start + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// Four flat faces, non-indexed (three vertices per face).
fn build_tetrahedron(radius: f32) -> GeometryBuffer {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

    let positions = faces
        .iter()
        .flat_map(|face| face.iter().map(|&i| corners[i].normalize() * radius))
        .collect();
    GeometryBuffer::new(positions, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_four_vertices_per_face() {
        let cube = Primitive::default_box().build();
        assert_eq!(cube.len(), 24);
        assert_eq!(cube.triangles().len(), 12);
        for p in cube.position_slice() {
            assert_eq!(p.abs(), Vec3::splat(0.5));
        }
    }

    #[test]
    fn box_normals_point_outward() {
        let cube = Primitive::default_box().build();
        for (i, p) in cube.position_slice().iter().enumerate() {
            let n = cube.normal(i).unwrap();
            assert!(n.dot(*p) > 0.0, "vertex {i} normal {n} at {p}");
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn cylinder_vertex_counts() {
        // Tube (segments + 1) * 2, each cap segments + (segments + 1)
        let c32 = Primitive::default_cylinder().build();
        assert_eq!(c32.len(), 33 * 2 + 2 * (32 + 33));
        let c8 = Primitive::default_cylinder().with_resolution(8).unwrap().build();
        assert_eq!(c8.len(), 9 * 2 + 2 * (8 + 9));
    }

    #[test]
    fn cone_has_single_cap() {
        let cone = Primitive::default_cone().build();
        assert_eq!(cone.len(), 33 * 2 + 32 + 33);
        assert_eq!(cone.triangles().len(), 32 + 32);
    }

    #[test]
    fn sphere_triangle_count() {
        let sphere = Primitive::Sphere { radius: 1.0, width_segments: 8, height_segments: 4 }.build();
        assert_eq!(sphere.len(), 9 * 5);
        // Two triangles per quad, minus one per quad in each pole row
        assert_eq!(sphere.triangles().len(), 8 * 4 * 2 - 8 * 2);
    }

    #[test]
    fn tetrahedron_is_non_indexed() {
        let tet = Primitive::default_tetrahedron().build();
        assert!(!tet.is_indexed());
        assert_eq!(tet.len(), 12);
        for p in tet.position_slice() {
            assert!((p.length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn resolution_only_for_cylinder_and_sphere() {
        assert_eq!(Primitive::default_cylinder().resolution(), Some(32));
        assert_eq!(Primitive::default_sphere().with_resolution(16).unwrap().resolution(), Some(16));
        match Primitive::default_sphere().with_resolution(16).unwrap() {
            Primitive::Sphere { height_segments, .. } => assert_eq!(height_segments, 8),
            other => panic!("unexpected {other:?}"),
        }
        assert!(Primitive::default_cone().with_resolution(8).is_none());
        assert!(Primitive::default_box().resolution_options().is_empty());
    }
}
