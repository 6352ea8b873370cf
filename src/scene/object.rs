use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Serialize, Deserialize};
use crate::scene::mesh::GeometryBuffer;
use crate::scene::primitive::Primitive;

/// Handle to a scene object, unique for the lifetime of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub(crate) u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rigid placement of an object. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    /// Local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    pub fn rotation_degrees(&self) -> Vec3 {
        Vec3::new(
            self.rotation.x.to_degrees(),
            self.rotation.y.to_degrees(),
            self.rotation.z.to_degrees(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Material {
    pub fn new(color: [f32; 3]) -> Self {
        Self { color, opacity: 1.0 }
    }

    /// Whether the renderer must blend this material.
    pub fn transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// `#rrggbb` form of the color.
    pub fn hex(&self) -> String {
        let [r, g, b] = self.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parse `#rrggbb` or `#rgb` (leading `#` optional) into linear 0..1 channels.
pub fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        3 => {
            let double = |i: usize| channel(hex[i..i + 1].repeat(2).as_str());
            Some([double(0)?, double(1)?, double(2)?])
        }
        _ => None,
    }
}

/// A mesh placed in the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub visible: bool,
    pub primitive: Primitive,
    pub geometry: GeometryBuffer,
    pub transform: Transform,
    pub material: Material,
}

impl SceneObject {
    pub fn new(id: ObjectId, name: String, primitive: Primitive, material: Material) -> Self {
        Self {
            id,
            name,
            visible: true,
            geometry: primitive.build(),
            primitive,
            transform: Transform::default(),
            material,
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}
