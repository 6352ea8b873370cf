mod object;
pub mod mesh;
pub mod primitive;
pub mod weld;

pub use object::{parse_hex_color, Material, ObjectId, SceneObject, Transform};
use glam::Vec3;
use primitive::Primitive;

/// Change notifications for whoever mirrors the scene in a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    /// Object list, names, visibility or properties changed.
    ObjectsChanged,
    /// The selected object changed.
    SelectedObjectChanged,
    /// Vertex, edge or face highlight sets changed.
    SelectionChanged,
    /// Positions of this object's buffer changed; re-upload it.
    GeometryChanged(ObjectId),
    /// Edit or transform mode changed.
    ModeChanged,
}

/// Registry of scene objects and the single selected object.
///
/// Every mutation is total: unknown ids are ignored rather than reported.
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: Option<ObjectId>,
    next_id: u64,
    changes: Vec<SceneChange>,
    /// Material color given to new objects.
    pub default_color: [f32; 3],
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            selected: None,
            next_id: 1,
            changes: Vec::new(),
            default_color: crate::settings::DisplaySettings::default().object_color,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Add a primitive under its default name.
    pub fn add_primitive(&mut self, primitive: Primitive) -> ObjectId {
        self.add_object(primitive, primitive.label())
    }

    /// Add a new visible object with a fresh id.
    pub fn add_object(&mut self, primitive: Primitive, name: &str) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let object = SceneObject::new(id, name.to_string(), primitive, Material::new(self.default_color));
        log::info!("Added {name} {id} ({} vertices)", object.geometry.len());
        self.objects.push(object);
        self.notify(SceneChange::ObjectsChanged);
        id
    }

    /// Remove an object, deselecting it if it was selected.
    pub fn remove_object(&mut self, id: ObjectId) {
        let before = self.objects.len();
        self.objects.retain(|o| o.id != id);
        if self.objects.len() == before {
            return;
        }
        log::info!("Removed object {id}");
        self.notify(SceneChange::ObjectsChanged);
        if self.selected == Some(id) {
            self.set_selected(None);
        }
    }

    /// Flip visibility. Hiding the selected object deselects it.
    pub fn toggle_visibility(&mut self, id: ObjectId) {
        let Some(object) = self.object_mut(id) else { return };
        object.visible = !object.visible;
        let hidden = !object.visible;
        self.notify(SceneChange::ObjectsChanged);
        if hidden && self.selected == Some(id) {
            self.set_selected(None);
        }
    }

    /// Rename an object. Blank names are ignored.
    pub fn rename(&mut self, id: ObjectId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(object) = self.object_mut(id) {
            object.name = name.to_string();
            self.notify(SceneChange::ObjectsChanged);
        }
    }

    /// Replace the selected object outright. The id is not checked against
    /// the registry; lookups through it simply find nothing.
    pub fn set_selected(&mut self, id: Option<ObjectId>) {
        if self.selected != id {
            self.selected = id;
            self.notify(SceneChange::SelectedObjectChanged);
        }
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.object(id))
    }

    pub fn selected_object_mut(&mut self) -> Option<&mut SceneObject> {
        let id = self.selected?;
        self.object_mut(id)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.edit_selected(|o| o.transform.position = position);
    }

    pub fn set_rotation_degrees(&mut self, degrees: Vec3) {
        let radians = Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians());
        self.edit_selected(|o| o.transform.rotation = radians);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.edit_selected(|o| o.transform.scale = scale);
    }

    /// Set the selected object's color from a `#rrggbb` string.
    pub fn set_color(&mut self, hex: &str) {
        match parse_hex_color(hex) {
            Some(color) => self.edit_selected(|o| o.material.color = color),
            None => log::warn!("Ignoring invalid color {hex:?}"),
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.edit_selected(|o| o.material.opacity = opacity);
    }

    fn edit_selected(&mut self, f: impl FnOnce(&mut SceneObject)) {
        if let Some(object) = self.selected_object_mut() {
            f(object);
            self.notify(SceneChange::ObjectsChanged);
        }
    }

    /// Rebuild the selected object's geometry at a new resolution. The old
    /// buffer is dropped, not resized. Returns false when the selected object
    /// has no adjustable resolution.
    ///
    /// Element selections index into the old buffer, so callers go through
    /// `Editor::set_resolution`, which clears them.
    pub(crate) fn set_resolution(&mut self, segments: u32) -> bool {
        let Some(object) = self.selected_object_mut() else { return false };
        let Some(primitive) = object.primitive.with_resolution(segments) else { return false };

        object.primitive = primitive;
        object.geometry = primitive.build();
        let (id, len) = (object.id, object.geometry.len());
        log::info!("Rebuilt {id} at {segments} segments ({len} vertices)");
        self.notify(SceneChange::GeometryChanged(id));
        self.notify(SceneChange::ObjectsChanged);
        true
    }

    pub(crate) fn notify(&mut self, change: SceneChange) {
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    /// Drain pending change notifications, oldest first.
    pub fn take_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
