use thiserror::Error;

/// Result type for mesh editing operations.
pub type EditResult<T> = Result<T, EditError>;

/// Everything the editing core can refuse to do.
///
/// None of these leave the geometry or the drag session half-updated: each
/// mutation is a single synchronous apply, so callers may simply drop the error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Vertex index outside the buffer. Only reachable by bypassing picking.
    #[error("vertex index {index} out of range (buffer has {len} vertices)")]
    InvalidIndex { index: usize, len: usize },

    /// Edit attempted with no selected mesh, or outside the edit mode it needs.
    #[error("no active mesh object")]
    NoActiveObject,

    /// An edge drag is armed; it has to end before another can start.
    #[error("an edge drag is already in progress")]
    DragInProgress,

    /// The object's world matrix cannot be inverted (a zero scale axis), so
    /// world positions have no local counterpart.
    #[error("object transform is not invertible")]
    SingularTransform,

    /// The pointer ray misses the drag plane (camera looking along the plane).
    #[error("ray does not intersect the drag plane")]
    NoIntersection,
}
