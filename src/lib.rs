//! Element-level editing of primitive meshes: welded vertex and edge
//! dragging, marker picking and the scene registry they operate on.
//!
//! The crate owns no window or GPU state. A host feeds it pointer events and
//! a [`render::Viewport`], and uploads whatever [`scene::SceneChange`] says
//! has changed.

pub mod editor;
pub mod error;
pub mod input;
pub mod keybindings;
pub mod render;
pub mod scene;
pub mod settings;
pub mod tools;
pub mod util;

pub use editor::Editor;
pub use error::{EditError, EditResult};
pub use scene::primitive::Primitive;
pub use scene::{ObjectId, Scene, SceneChange};
pub use settings::Settings;
pub use tools::{EditMode, TransformMode};
