use glam::{Mat4, Vec2, Vec3};
use crate::util::picking::Ray;

/// What the editing core needs from whoever owns the camera and the canvas.
pub trait Viewport {
    /// World-space ray through a screen point (pixels from top-left).
    fn cast_ray(&self, screen_pos: Vec2) -> Ray;

    /// Direction the camera looks along, normalized.
    fn view_direction(&self) -> Vec3;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

/// A fixed look-at camera. Orbit navigation lives with the host; this only
/// has to answer ray casts for the current frame.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    pub fov_y: f32,
    pub ortho_scale: f32,
    pub near: f32,
    pub far: f32,
    screen_size: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective,
            fov_y: 75.0_f32.to_radians(),
            ortho_scale: 5.0,
            near: 0.1,
            far: 1000.0,
            screen_size: Vec2::new(1280.0, 720.0),
        }
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self { position, target, ..Self::new() }
    }

    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.screen_size = Vec2::new(width, height);
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn aspect(&self) -> f32 {
        self.screen_size.x / self.screen_size.y
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
            }
            Projection::Orthographic => {
                let half_w = self.ortho_scale * self.aspect();
                let half_h = self.ortho_scale;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Screen position (pixels) of a world point, or None behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.screen_size.x,
            (1.0 - ndc.y) * 0.5 * self.screen_size.y,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport for Camera {
    fn cast_ray(&self, screen_pos: Vec2) -> Ray {
        Ray::from_screen(screen_pos, self.screen_size, self.view_projection())
    }

    fn view_direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projected_point_casts_back_through_itself() {
        let camera = Camera::looking_at(Vec3::new(0.0, 2.0, 6.0), Vec3::ZERO);
        let world = Vec3::new(0.4, -0.3, 0.5);
        let screen = camera.project(world).unwrap();
        let ray = camera.cast_ray(screen);
        let closest = ray.point_at((world - ray.origin).dot(ray.direction));
        assert!(closest.distance(world) < 1e-3);
    }

    #[test]
    fn orthographic_rays_are_parallel_to_view() {
        let mut camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        camera.projection = Projection::Orthographic;
        let a = camera.cast_ray(Vec2::new(10.0, 10.0));
        let b = camera.cast_ray(Vec2::new(900.0, 500.0));
        assert!((a.direction - camera.view_direction()).length() < 1e-4);
        assert!((b.direction - camera.view_direction()).length() < 1e-4);
    }
}
