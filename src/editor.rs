use std::time::Instant;
use glam::Vec3;

use crate::error::{EditError, EditResult};
use crate::input::{InputState, PointerButton, PointerEvent};
use crate::keybindings::{Action, Keybindings};
use crate::render::{MarkerInstance, Viewport};
use crate::scene::primitive::Primitive;
use crate::scene::{ObjectId, Scene, SceneChange, SceneObject};
use crate::settings::Settings;
use crate::tools::edit::drag::{self, DragSession, EdgeDrag, VertexDrag};
use crate::tools::edit::pick::{self, MarkerTarget, PickHit};
use crate::tools::edit::{EditState, ElementKind};
use crate::tools::{EditMode, TransformMode};
use crate::util::picking::Ray;

/// Top-level editing state: the scene, the edit session on its selected
/// object, and the settings that tune both.
///
/// Everything runs on the caller's thread. Operations that cannot apply
/// (no selected mesh, not in an edit mode, ray parallel to the drag plane)
/// return an error and change nothing; the pointer entry points log and
/// swallow those errors.
pub struct Editor {
    scene: Scene,
    edit: EditState,
    settings: Settings,
    /// Object the current `edit` state belongs to.
    edit_target: Option<ObjectId>,
}

impl Editor {
    pub fn new(mut settings: Settings) -> Self {
        settings.edit.sanitize();
        let mut scene = Scene::new();
        scene.default_color = settings.display.object_color;
        Self {
            scene,
            edit: EditState::new(),
            settings,
            edit_target: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct registry access. Selection changes made through it are picked
    /// up (and the edit session reset) on the next editor call.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Drain change notifications from the scene and the edit session.
    pub fn take_changes(&mut self) -> Vec<SceneChange> {
        self.sync_target();
        self.scene.take_changes()
    }

    // --- Registry -----------------------------------------------------------

    pub fn add_primitive(&mut self, primitive: Primitive) -> ObjectId {
        self.scene.add_primitive(primitive)
    }

    pub fn select_object(&mut self, id: Option<ObjectId>) {
        self.scene.set_selected(id);
        self.sync_target();
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        self.scene.remove_object(id);
        self.sync_target();
    }

    pub fn toggle_visibility(&mut self, id: ObjectId) {
        self.scene.toggle_visibility(id);
        self.sync_target();
    }

    /// Swap the selected cylinder or sphere for one at `segments` resolution.
    /// All highlights are cleared since old indices mean nothing in the new buffer.
    pub fn set_resolution(&mut self, segments: u32) -> bool {
        self.sync_target();
        if !self.scene.set_resolution(segments) {
            return false;
        }
        self.edit.reset();
        self.scene.notify(SceneChange::SelectionChanged);
        true
    }

    // --- Modes --------------------------------------------------------------

    /// Enter or leave an edit mode. Clears the transform mode when entering.
    pub fn set_edit_mode(&mut self, mode: Option<EditMode>) {
        self.sync_target();
        if mode.is_some() {
            self.edit.transform_mode = None;
        }
        if self.edit.mode != mode {
            self.edit.mode = mode;
            self.edit.reset();
            self.scene.notify(SceneChange::SelectionChanged);
        }
        self.scene.notify(SceneChange::ModeChanged);
    }

    /// Choose a gizmo. Choosing one leaves edit mode.
    pub fn set_transform_mode(&mut self, mode: Option<TransformMode>) {
        if mode.is_some() {
            self.set_edit_mode(None);
        }
        self.edit.transform_mode = mode;
        self.scene.notify(SceneChange::ModeChanged);
    }

    /// Selected object, provided an edit mode is active.
    fn active_object(&self) -> EditResult<(&SceneObject, EditMode)> {
        let mode = self.edit.mode.ok_or(EditError::NoActiveObject)?;
        let object = self.scene.selected_object().ok_or(EditError::NoActiveObject)?;
        Ok((object, mode))
    }

    /// Selected object, provided `mode` is the active edit mode.
    fn active_in(&self, mode: EditMode) -> EditResult<&SceneObject> {
        match self.active_object()? {
            (object, active) if active == mode => Ok(object),
            _ => Err(EditError::NoActiveObject),
        }
    }

    /// Reset the edit session when the selected object changed under it.
    fn sync_target(&mut self) {
        let selected = self.scene.selected();
        if self.edit_target == selected {
            return;
        }
        if !self.edit.selection.is_empty() || !self.edit.drag.is_idle() {
            self.scene.notify(SceneChange::SelectionChanged);
        }
        self.edit.reset();
        self.edit_target = selected;
    }

    // --- Picking ------------------------------------------------------------

    /// Nearest marker of the current edit mode under the ray. Edge picks are
    /// refused while an edge drag is armed.
    pub fn pick(&mut self, ray: &Ray) -> EditResult<Option<PickHit>> {
        self.sync_target();
        let (object, mode) = self.active_object()?;
        if mode == EditMode::Edge && self.edit.is_dragging_edge() {
            return Ok(None);
        }
        let markers = pick::markers_for_mode(
            mode,
            &object.geometry,
            object.world_matrix(),
            self.settings.edit.vertex_marker_radius,
            self.settings.edit.edge_marker_radius,
        );
        Ok(pick::pick(ray, &markers))
    }

    /// Nearest visible object surface under the ray, with the triangle hit.
    pub fn pick_object(&self, ray: &Ray) -> Option<(ObjectId, usize)> {
        self.scene
            .objects()
            .iter()
            .filter(|o| o.visible)
            .filter_map(|o| {
                pick::pick_triangle(ray, &o.geometry, o.world_matrix()).map(|(tri, t)| (o.id, tri, t))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, tri, _)| (id, tri))
    }

    // --- Vertex drag --------------------------------------------------------

    /// Arm a vertex drag on raw vertex `index` of the selected object.
    pub fn start_vertex_drag(&mut self, index: usize) -> EditResult<()> {
        self.sync_target();
        let object = self.active_in(EditMode::Vertex)?;
        let drag = VertexDrag::start(
            object.id,
            &object.geometry,
            object.world_matrix(),
            index,
            self.settings.edit.weld_epsilon,
        )?;
        log::debug!("Vertex drag on {} ({} welded)", object.id, drag.group.len());

        self.edit.selection.set(ElementKind::Vertex, drag.group.iter().copied());
        self.edit.drag = DragSession::Vertex(drag);
        self.scene.notify(SceneChange::SelectionChanged);
        Ok(())
    }

    /// Move the dragged vertex group to `target` (world space). No-op without
    /// a vertex drag.
    pub fn update_vertex_drag(&mut self, target: Vec3) -> EditResult<()> {
        self.sync_target();
        let DragSession::Vertex(drag) = &mut self.edit.drag else { return Ok(()) };
        let id = drag.object;
        let Some(object) = self.scene.selected_object_mut().filter(|o| o.id == id) else {
            self.edit.drag = DragSession::Idle;
            return Err(EditError::NoActiveObject);
        };
        let world = object.world_matrix();
        drag.update(&mut object.geometry, world, target)?;
        self.scene.notify(SceneChange::GeometryChanged(id));
        Ok(())
    }

    /// Drop the vertex drag. Edits already applied stay.
    pub fn end_vertex_drag(&mut self) {
        if self.edit.is_dragging_vertex() {
            log::debug!("Vertex drag ended");
            self.edit.drag = DragSession::Idle;
        }
    }

    // --- Edge drag ----------------------------------------------------------

    /// Register a click on raw edge `(a, b)`. A second click on the same edge
    /// within the double-click window arms an edge drag; returns whether it did.
    pub fn click_edge(&mut self, a: usize, b: usize, now: Instant) -> EditResult<bool> {
        self.sync_target();
        self.active_in(EditMode::Edge)?;
        if self.edit.is_dragging_edge() {
            return Ok(false);
        }
        let window = self.settings.edit.double_click_window();
        if !self.edit.clicks.click((a, b), now, window) {
            return Ok(false);
        }
        self.start_edge_drag(a, b)?;
        Ok(true)
    }

    /// Arm an edge drag on raw edge `(a, b)` of the selected object. An armed
    /// edge drag is never replaced.
    pub fn start_edge_drag(&mut self, a: usize, b: usize) -> EditResult<()> {
        self.sync_target();
        let object = self.active_in(EditMode::Edge)?;
        if self.edit.is_dragging_edge() {
            return Err(EditError::DragInProgress);
        }
        let drag = EdgeDrag::start(
            object.id,
            &object.geometry,
            object.world_matrix(),
            a,
            b,
            self.settings.edit.weld_epsilon,
        )?;
        log::debug!("Edge drag on {} ({} connected vertices)", object.id, drag.edge.connected.len());

        self.edit.clicks.reset();
        self.edit.selection.set(ElementKind::Edge, drag.edge.connected.iter().copied());
        self.edit.drag = DragSession::Edge(drag);
        self.scene.notify(SceneChange::SelectionChanged);
        Ok(())
    }

    /// Translate the dragged edge so its anchor lands on `target` (world space).
    /// No-op without an edge drag.
    pub fn update_edge_drag(&mut self, target: Vec3) -> EditResult<()> {
        self.sync_target();
        let DragSession::Edge(drag) = &mut self.edit.drag else { return Ok(()) };
        let id = drag.object;
        let Some(object) = self.scene.selected_object_mut().filter(|o| o.id == id) else {
            self.edit.drag = DragSession::Idle;
            return Err(EditError::NoActiveObject);
        };
        let world = object.world_matrix();
        drag.update(&mut object.geometry, world, target)?;
        self.scene.notify(SceneChange::GeometryChanged(id));
        Ok(())
    }

    pub fn end_edge_drag(&mut self) {
        if self.edit.is_dragging_edge() {
            log::debug!("Edge drag ended");
            self.edit.drag = DragSession::Idle;
        }
    }

    /// End whatever drag is in progress.
    pub fn end_drag(&mut self) {
        self.end_vertex_drag();
        self.end_edge_drag();
        self.edit.clicks.reset();
    }

    /// Per-frame drag step: intersect the pointer ray with the camera-facing
    /// plane through the drag anchor and move the dragged elements there.
    pub fn drag_to(&mut self, ray: &Ray, view_direction: Vec3) -> EditResult<()> {
        let Some(anchor) = self.edit.drag.anchor() else { return Ok(()) };
        let target = drag::drag_target(ray, anchor, view_direction)?;
        match self.edit.drag {
            DragSession::Vertex(_) => self.update_vertex_drag(target),
            DragSession::Edge(_) => self.update_edge_drag(target),
            DragSession::Idle => Ok(()),
        }
    }

    // --- Coordinates panel --------------------------------------------------

    /// World position of the dragged or first selected vertex, in vertex mode.
    pub fn selected_vertex_position(&self) -> Option<Vec3> {
        let (object, mode) = self.active_object().ok()?;
        if mode != EditMode::Vertex || self.edit_target != Some(object.id) {
            return None;
        }
        if let DragSession::Vertex(drag) = &self.edit.drag {
            return Some(drag.position);
        }
        let first = *self.edit.selection.vertices.first()?;
        let local = object.geometry.position(first).ok()?;
        Some(object.world_matrix().transform_point3(local))
    }

    /// Type in a new world position for the dragged or selected vertices.
    pub fn set_vertex_position(&mut self, target: Vec3) -> EditResult<()> {
        self.sync_target();
        if self.edit.is_dragging_vertex() {
            return self.update_vertex_drag(target);
        }
        self.active_in(EditMode::Vertex)?;
        if self.edit.selection.vertices.is_empty() {
            return Ok(());
        }
        let object = self.scene.selected_object_mut().ok_or(EditError::NoActiveObject)?;
        let local = drag::local_from_world(object.world_matrix())?.transform_point3(target);
        object.geometry.set_positions(self.edit.selection.vertices.iter().copied(), local)?;
        object.geometry.compute_normals();
        let id = object.id;
        self.scene.notify(SceneChange::GeometryChanged(id));
        Ok(())
    }

    // --- Pointer and keyboard routing ---------------------------------------

    /// Route one pointer event. Returns true when the editor consumed it, so
    /// the host should not hand it to camera navigation.
    pub fn handle_pointer(&mut self, event: PointerEvent, viewport: &dyn Viewport) -> bool {
        self.sync_target();
        match event {
            PointerEvent::Down { button, position, time } => {
                // An armed edge drag ends on the next press of any button.
                if self.edit.is_dragging_edge() {
                    self.end_edge_drag();
                    return true;
                }
                if button != PointerButton::Left {
                    return false;
                }
                let ray = viewport.cast_ray(position);
                self.handle_left_down(&ray, time)
            }
            PointerEvent::Move { position, .. } => {
                if self.edit.drag.is_idle() {
                    return false;
                }
                let ray = viewport.cast_ray(position);
                if let Err(e) = self.drag_to(&ray, viewport.view_direction()) {
                    log::trace!("Skipping drag frame: {e}");
                }
                true
            }
            PointerEvent::Up { button: PointerButton::Left, .. } if self.edit.is_dragging_vertex() => {
                self.end_vertex_drag();
                true
            }
            PointerEvent::Up { .. } => false,
        }
    }

    fn handle_left_down(&mut self, ray: &Ray, time: Instant) -> bool {
        match self.pick(ray) {
            Ok(Some(hit)) => {
                let result = match hit.target {
                    MarkerTarget::Vertex(i) => self.start_vertex_drag(i),
                    MarkerTarget::Edge(a, b) => self.click_edge(a, b, time).map(|_| ()),
                };
                if let Err(e) = result {
                    log::debug!("Ignoring pick: {e}");
                }
                return true;
            }
            Ok(None) => {}
            Err(e) => log::trace!("No marker pick: {e}"),
        }

        let Some((id, triangle)) = self.pick_object(ray) else { return false };
        if self.scene.selected() == Some(id) {
            if self.edit.mode == Some(EditMode::Face) {
                self.edit.selection.set(ElementKind::Face, [triangle]);
                self.scene.notify(SceneChange::SelectionChanged);
                return true;
            }
            return false;
        }
        self.select_object(Some(id));
        true
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::EditVertices => self.set_edit_mode(Some(EditMode::Vertex)),
            Action::EditEdges => self.set_edit_mode(Some(EditMode::Edge)),
            Action::EditFaces => self.set_edit_mode(Some(EditMode::Face)),
            Action::ExitEditMode => self.set_edit_mode(None),
            Action::TransformTranslate => self.set_transform_mode(Some(TransformMode::Translate)),
            Action::TransformRotate => self.set_transform_mode(Some(TransformMode::Rotate)),
            Action::TransformScale => self.set_transform_mode(Some(TransformMode::Scale)),
            Action::CancelDrag => self.end_drag(),
            Action::DeleteObject => {
                if let Some(id) = self.scene.selected() {
                    self.remove_object(id);
                }
            }
            Action::ToggleVisibility => {
                if let Some(id) = self.scene.selected() {
                    self.toggle_visibility(id);
                }
            }
            Action::DeselectObject => self.select_object(None),
        }
    }

    /// Apply every key action triggered this frame.
    pub fn handle_keys(&mut self, input: &InputState, keybindings: &Keybindings) {
        for action in keybindings.triggered(input) {
            self.apply_action(action);
        }
    }

    // --- Render exposure ----------------------------------------------------

    /// Marker spheres for the current edit mode, colored by highlight state.
    pub fn marker_instances(&self) -> Vec<MarkerInstance> {
        let Ok((object, mode)) = self.active_object() else { return Vec::new() };
        let edit = &self.settings.edit;
        let display = &self.settings.display;
        let markers = pick::markers_for_mode(mode, &object.geometry, object.world_matrix(), edit.vertex_marker_radius, edit.edge_marker_radius);
        let stale = self.edit_target != Some(object.id);

        markers
            .iter()
            .map(|m| {
                let (selected, alpha) = match m.target {
                    MarkerTarget::Vertex(i) => (!stale && self.edit.selection.vertices.contains(&i), display.vertex_marker_alpha),
                    MarkerTarget::Edge(a, b) => {
                        let dragged = match &self.edit.drag {
                            DragSession::Edge(d) => !stale && d.edge.contains_pair(a, b),
                            _ => false,
                        };
                        (dragged, display.edge_marker_alpha)
                    }
                };
                MarkerInstance {
                    center: m.center.to_array(),
                    radius: m.radius,
                    color: display.marker_color(selected, alpha),
                }
            })
            .collect()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
