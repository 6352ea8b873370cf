pub mod edit;

/// Sub-object granularity the user is editing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EditMode {
    Vertex,
    Edge,
    Face,
}

/// Which rigid-body gizmo the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransformMode {
    Translate,
    Rotate,
    Scale,
}
