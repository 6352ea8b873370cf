mod camera;
mod vertex;

pub use camera::{Camera, Projection, Viewport};
pub use vertex::{MarkerInstance, Vertex};
