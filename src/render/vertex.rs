use bytemuck::{Pod, Zeroable};

/// Per-vertex data for mesh geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// One instanced sphere marker (vertex handle or edge midpoint handle).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

impl MarkerInstance {
    pub const STRIDE: usize = std::mem::size_of::<MarkerInstance>();
}
