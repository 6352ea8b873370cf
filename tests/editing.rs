use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use meshedit::input::{PointerButton, PointerEvent};
use meshedit::render::{Camera, Viewport};
use meshedit::scene::weld::{self, WELD_EPSILON};
use meshedit::util::picking::Ray;
use meshedit::{EditError, EditMode, Editor, ObjectId, Primitive, SceneChange};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cube_in_mode(mode: EditMode) -> (Editor, ObjectId) {
    init_logging();
    let mut editor = Editor::default();
    let id = editor.add_primitive(Primitive::default_box());
    editor.select_object(Some(id));
    editor.set_edit_mode(Some(mode));
    (editor, id)
}

fn positions(editor: &Editor, id: ObjectId) -> Vec<Vec3> {
    editor.scene().object(id).unwrap().geometry.position_slice().to_vec()
}

#[test]
fn cube_corners_weld_in_threes() {
    let cube = Primitive::default_box().build();
    assert_eq!(cube.len(), 24);
    for i in 0..cube.len() {
        assert_eq!(weld::weld_group(&cube, i, WELD_EPSILON).unwrap().len(), 3, "vertex {i}");
    }
}

#[test]
fn dragging_a_corner_moves_its_welded_group() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    let before = positions(&editor, id);
    let corner = before[0];
    assert_eq!(corner, Vec3::splat(0.5));

    let camera = Camera::looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO);
    let screen = camera.project(corner).unwrap();
    let now = Instant::now();
    assert!(editor.handle_pointer(
        PointerEvent::Down { button: PointerButton::Left, position: screen, time: now },
        &camera,
    ));
    assert!(editor.edit_state().is_dragging_vertex());
    assert_eq!(editor.edit_state().selection.vertices.len(), 3);

    editor.update_vertex_drag(Vec3::splat(2.0)).unwrap();
    let after = positions(&editor, id);
    let moved: Vec<usize> = (0..after.len()).filter(|&i| after[i] != before[i]).collect();
    assert_eq!(moved.len(), 3);
    for i in 0..after.len() {
        if moved.contains(&i) {
            assert_eq!(after[i], Vec3::splat(2.0));
            assert_eq!(before[i], corner);
        }
    }
    assert!(editor.take_changes().contains(&SceneChange::GeometryChanged(id)));

    assert!(editor.handle_pointer(
        PointerEvent::Up { button: PointerButton::Left, position: screen, time: now },
        &camera,
    ));
    assert!(editor.edit_state().drag.is_idle());
    // Highlight survives the release.
    assert_eq!(editor.edit_state().selection.vertices.len(), 3);
}

#[test]
fn drag_follows_camera_facing_plane() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    editor.start_vertex_drag(0).unwrap();

    let ray = Ray::new(Vec3::new(1.0, 1.0, 10.0), Vec3::NEG_Z);
    editor.drag_to(&ray, Vec3::NEG_Z).unwrap();
    assert!((positions(&editor, id)[0] - Vec3::new(1.0, 1.0, 0.5)).length() < 1e-5);

    // Looking along the plane: the frame is skipped and nothing moves.
    let edge_on = Ray::new(Vec3::new(0.0, 0.5, 3.0), Vec3::X + Vec3::Y);
    assert_eq!(editor.drag_to(&edge_on, Vec3::Z), Err(EditError::NoIntersection));
    assert!((positions(&editor, id)[0] - Vec3::new(1.0, 1.0, 0.5)).length() < 1e-5);
}

#[test]
fn double_clicked_edge_translates_rigidly_until_next_press() {
    let (mut editor, id) = cube_in_mode(EditMode::Edge);
    let before = positions(&editor, id);
    let t0 = Instant::now();

    assert_eq!(editor.click_edge(0, 2, t0), Ok(false));
    assert_eq!(editor.click_edge(2, 0, t0 + Duration::from_millis(120)), Ok(true));
    assert!(editor.edit_state().is_dragging_edge());

    let midpoint = (before[0] + before[2]) * 0.5;
    assert_eq!(editor.edit_state().drag.anchor(), Some(midpoint));
    editor.update_edge_drag(midpoint + Vec3::X).unwrap();

    let group_a = weld::weld_group(&Primitive::default_box().build(), 0, WELD_EPSILON).unwrap();
    let group_b = weld::weld_group(&Primitive::default_box().build(), 2, WELD_EPSILON).unwrap();
    let after = positions(&editor, id);
    for i in 0..after.len() {
        let expected = if group_a.contains(&i) || group_b.contains(&i) { before[i] + Vec3::X } else { before[i] };
        assert!((after[i] - expected).length() < 1e-6, "vertex {i}");
    }
    assert_eq!(editor.edit_state().selection.edges.len(), 6);

    // Pointer release does not end an edge drag; the next press does and is consumed.
    let camera = Camera::new();
    let up = PointerEvent::Up { button: PointerButton::Left, position: Vec2::ZERO, time: t0 };
    assert!(!editor.handle_pointer(up, &camera));
    assert!(editor.edit_state().is_dragging_edge());
    let down = PointerEvent::Down { button: PointerButton::Right, position: Vec2::ZERO, time: t0 };
    assert!(editor.handle_pointer(down, &camera));
    assert!(editor.edit_state().drag.is_idle());
}

#[test]
fn slow_second_click_does_not_arm() {
    let (mut editor, _) = cube_in_mode(EditMode::Edge);
    let t0 = Instant::now();
    assert_eq!(editor.click_edge(0, 2, t0), Ok(false));
    assert_eq!(editor.click_edge(0, 2, t0 + Duration::from_millis(400)), Ok(false));
    assert!(editor.edit_state().drag.is_idle());
    // The slow click became the new first click.
    assert_eq!(editor.click_edge(0, 2, t0 + Duration::from_millis(500)), Ok(true));
}

#[test]
fn ending_a_drag_is_idempotent() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    editor.end_drag();
    editor.start_vertex_drag(5).unwrap();
    editor.end_drag();
    editor.end_drag();
    assert!(editor.edit_state().drag.is_idle());

    // Updates without a drag do nothing.
    let before = positions(&editor, id);
    editor.update_vertex_drag(Vec3::splat(9.0)).unwrap();
    editor.update_edge_drag(Vec3::splat(9.0)).unwrap();
    assert_eq!(positions(&editor, id), before);
}

#[test]
fn typed_position_moves_selected_group() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    editor.start_vertex_drag(0).unwrap();
    editor.end_vertex_drag();
    assert_eq!(editor.selected_vertex_position(), Some(Vec3::splat(0.5)));

    editor.set_vertex_position(Vec3::new(0.5, 1.0, 0.5)).unwrap();
    let moved = positions(&editor, id).iter().filter(|p| **p == Vec3::new(0.5, 1.0, 0.5)).count();
    assert_eq!(moved, 3);
    assert_eq!(editor.selected_vertex_position(), Some(Vec3::new(0.5, 1.0, 0.5)));
}

#[test]
fn editing_is_refused_outside_edit_mode() {
    init_logging();
    let mut editor = Editor::default();
    let id = editor.add_primitive(Primitive::default_box());
    assert_eq!(editor.start_vertex_drag(0), Err(EditError::NoActiveObject));

    editor.select_object(Some(id));
    assert_eq!(editor.start_edge_drag(0, 2), Err(EditError::NoActiveObject));
    let ray = Ray::new(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y);
    assert_eq!(editor.pick(&ray), Err(EditError::NoActiveObject));
}

#[test]
fn resolution_change_clears_every_selection_kind() {
    init_logging();
    let mut editor = Editor::default();
    let id = editor.add_primitive(Primitive::default_cylinder());
    editor.select_object(Some(id));

    // Vertices, through a vertex drag.
    editor.set_edit_mode(Some(EditMode::Vertex));
    editor.start_vertex_drag(0).unwrap();
    assert!(!editor.edit_state().selection.vertices.is_empty());
    editor.take_changes();
    assert!(editor.set_resolution(16));
    assert!(editor.edit_state().drag.is_idle());
    assert!(editor.edit_state().selection.is_empty());
    let changes = editor.take_changes();
    assert!(changes.contains(&SceneChange::GeometryChanged(id)));
    assert!(changes.contains(&SceneChange::SelectionChanged));

    // Edges, through an armed edge drag.
    editor.set_edit_mode(Some(EditMode::Edge));
    editor.start_edge_drag(0, 1).unwrap();
    assert!(!editor.edit_state().selection.edges.is_empty());
    assert!(editor.set_resolution(8));
    assert!(editor.edit_state().drag.is_idle());
    assert!(editor.edit_state().selection.is_empty());
    assert_eq!(editor.scene().object(id).unwrap().geometry.len(), 52);

    // Faces, through a face click on the side wall.
    editor.set_edit_mode(Some(EditMode::Face));
    let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
    let screen = camera.project(Vec3::new(0.05, 0.1, 0.0)).unwrap();
    let now = Instant::now();
    assert!(editor.handle_pointer(
        PointerEvent::Down { button: PointerButton::Left, position: screen, time: now },
        &camera,
    ));
    assert_eq!(editor.edit_state().selection.faces.len(), 1);
    assert!(editor.set_resolution(32));
    assert!(editor.edit_state().selection.is_empty());

    // Cones have a fixed resolution.
    let cone = editor.add_primitive(Primitive::default_cone());
    editor.select_object(Some(cone));
    assert!(!editor.set_resolution(8));
}

#[test]
fn press_over_edge_marker_only_ends_armed_drag() {
    let (mut editor, _) = cube_in_mode(EditMode::Edge);
    let camera = Camera::looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO);
    let t0 = Instant::now();
    editor.click_edge(0, 2, t0).unwrap();
    assert_eq!(editor.click_edge(0, 2, t0 + Duration::from_millis(50)), Ok(true));
    let midpoint = editor.edit_state().drag.anchor().unwrap();
    let screen = camera.project(midpoint).unwrap();
    let armed_selection = editor.edit_state().selection.clone();

    let press = |time| PointerEvent::Down { button: PointerButton::Left, position: screen, time };
    assert!(editor.handle_pointer(press(t0 + Duration::from_millis(100)), &camera));
    assert!(editor.edit_state().drag.is_idle());
    assert!(editor.edit_state().clicks.pending().is_none());
    assert_eq!(editor.edit_state().selection, armed_selection);

    // The same press with nothing armed lands on the marker as a first click.
    assert!(editor.handle_pointer(press(t0 + Duration::from_millis(150)), &camera));
    assert!(editor.edit_state().drag.is_idle());
    assert!(editor.edit_state().clicks.pending().is_some());
}

#[test]
fn flattened_object_rejects_drags_without_corrupting() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    editor.scene_mut().set_scale(Vec3::new(1.0, 0.0, 1.0));
    let before = positions(&editor, id);

    editor.start_vertex_drag(0).unwrap();
    assert_eq!(editor.update_vertex_drag(Vec3::new(2.0, 0.0, 2.0)), Err(EditError::SingularTransform));
    let after = positions(&editor, id);
    assert_eq!(after, before);
    assert!(after.iter().all(|p| p.is_finite()));

    // Restoring the scale makes the same drag work.
    editor.scene_mut().set_scale(Vec3::ONE);
    editor.update_vertex_drag(Vec3::new(2.0, 0.0, 2.0)).unwrap();
    assert_eq!(positions(&editor, id)[0], Vec3::new(2.0, 0.0, 2.0));
}

#[test]
fn zero_weld_epsilon_still_moves_the_picked_vertex() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    editor.settings_mut().edit.weld_epsilon = 0.0;
    editor.start_vertex_drag(0).unwrap();
    assert_eq!(editor.edit_state().selection.vertices.len(), 1);

    editor.update_vertex_drag(Vec3::splat(2.0)).unwrap();
    let after = positions(&editor, id);
    assert_eq!(after[0], Vec3::splat(2.0));
    assert_eq!(after.iter().filter(|p| **p == Vec3::splat(2.0)).count(), 1);
}

#[test]
fn hidden_object_loses_its_session() {
    let (mut editor, id) = cube_in_mode(EditMode::Vertex);
    editor.start_vertex_drag(0).unwrap();
    editor.toggle_visibility(id);
    assert_eq!(editor.scene().selected(), None);
    assert!(editor.edit_state().drag.is_idle());
    assert!(editor.marker_instances().is_empty());

    let camera = Camera::new();
    let ray = camera.cast_ray(camera.project(Vec3::ZERO).unwrap());
    assert!(editor.pick_object(&ray).is_none());
}
