pub mod drag;
pub mod pick;

use std::collections::BTreeSet;
use crate::tools::{EditMode, TransformMode};
use drag::{ClickTracker, DragSession};

/// Which highlight set an index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Vertex,
    Edge,
    Face,
}

/// Highlighted element indices of the selected object, read by the renderer.
///
/// `edges` holds the raw vertex indices of the dragged edge, not edge ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub vertices: BTreeSet<usize>,
    pub edges: BTreeSet<usize>,
    pub faces: BTreeSet<usize>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Replace one set outright.
    pub fn set(&mut self, kind: ElementKind, indices: impl IntoIterator<Item = usize>) {
        let set = match kind {
            ElementKind::Vertex => &mut self.vertices,
            ElementKind::Edge => &mut self.edges,
            ElementKind::Face => &mut self.faces,
        };
        *set = indices.into_iter().collect();
    }

    pub fn get(&self, kind: ElementKind) -> &BTreeSet<usize> {
        match kind {
            ElementKind::Vertex => &self.vertices,
            ElementKind::Edge => &self.edges,
            ElementKind::Face => &self.faces,
        }
    }
}

/// Edit-mode state of the selected object.
#[derive(Debug, Clone, Default)]
pub struct EditState {
    pub mode: Option<EditMode>,
    pub transform_mode: Option<TransformMode>,
    pub selection: Selection,
    pub drag: DragSession,
    pub clicks: ClickTracker,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any drag, pending click and highlight. Used whenever the thing
    /// being edited changes under the session.
    pub fn reset(&mut self) {
        self.drag = DragSession::Idle;
        self.clicks.reset();
        self.selection.clear();
    }

    pub fn is_dragging_edge(&self) -> bool {
        matches!(self.drag, DragSession::Edge(_))
    }

    pub fn is_dragging_vertex(&self) -> bool {
        matches!(self.drag, DragSession::Vertex(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_only_one_kind() {
        let mut selection = Selection::default();
        selection.set(ElementKind::Vertex, [3, 1, 3]);
        selection.set(ElementKind::Face, [7]);
        selection.set(ElementKind::Vertex, [5]);
        assert_eq!(selection.get(ElementKind::Vertex).iter().copied().collect::<Vec<_>>(), vec![5]);
        assert_eq!(selection.faces.len(), 1);
        assert!(selection.edges.is_empty());
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state = EditState::new();
        state.selection.set(ElementKind::Edge, [1, 2]);
        state.clicks.click((1, 2), std::time::Instant::now(), std::time::Duration::from_millis(300));
        state.reset();
        assert!(state.drag.is_idle());
        assert!(state.clicks.pending().is_none());
        assert!(state.selection.is_empty());
    }
}
