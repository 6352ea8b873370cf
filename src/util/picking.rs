use glam::{Mat4, Vec2, Vec3};

/// A ray in 3D space with origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self { normal: normal.normalize_or_zero(), point }
    }

    /// Signed distance from `p` to the plane, positive on the normal side.
    pub fn distance_to(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    /// Create a ray from screen coordinates (pixels) through the camera.
    /// `screen_pos` is in pixels from top-left, `screen_size` is viewport width/height.
    pub fn from_screen(screen_pos: Vec2, screen_size: Vec2, view_proj: Mat4) -> Self {
        let ndc_x = (2.0 * screen_pos.x / screen_size.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_pos.y / screen_size.y); // Y is flipped

        let inv_vp = view_proj.inverse();

        // glam's perspective_rh maps depth to 0..1
        let near_point = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far_point = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Self::new(near_point, far_point - near_point)
    }

    /// Intersect with an infinite plane. Returns the hit point, or None when the
    /// ray is parallel to the plane or the plane lies behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < 1e-7 {
            // A ray lying inside the plane touches it at its origin.
            if plane.distance_to(self.origin).abs() < 1e-7 {
                return Some(self.origin);
            }
            return None;
        }
        let t = (plane.point - self.origin).dot(plane.normal) / denom;
        if t >= 0.0 { Some(self.point_at(t)) } else { None }
    }

    /// Intersect with a sphere. Returns the distance to the nearest hit in front
    /// of the origin (or 0 when the origin is inside the sphere).
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 || b > 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        if t >= 0.0 { Some(t) } else { None }
    }

    /// Intersect ray with a triangle (Möller–Trumbore algorithm).
    /// Returns distance along ray if hit, None if miss.
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < 1e-7 {
            return None; // Parallel to triangle
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * self.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t > 1e-7 { Some(t) } else { None }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
