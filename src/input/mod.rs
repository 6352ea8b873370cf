use std::collections::HashSet;
use std::time::Instant;
use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Pointer input as the editor consumes it. Positions are pixels from the
/// top-left of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, position: Vec2, time: Instant },
    Move { position: Vec2, time: Instant },
    Up { button: PointerButton, position: Vec2, time: Instant },
}

impl PointerEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => position,
        }
    }
}

/// Tracks current input state (keys held, mouse position, etc.)
pub struct InputState {
    pub mouse_pos: Vec2,
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub middle_pressed: bool,
    pub keys_held: HashSet<KeyCode>,
    pub keys_just_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_pos: Vec2::ZERO,
            left_pressed: false,
            right_pressed: false,
            middle_pressed: false,
            keys_held: HashSet::new(),
            keys_just_pressed: HashSet::new(),
        }
    }

    /// Call at the start of each frame to clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_just_pressed.clear();
    }

    /// Update held state from a window event, returning the pointer event it
    /// represents, if any.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        let time = Instant::now();
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_pos = Vec2::new(position.x as f32, position.y as f32);
                Some(PointerEvent::Move { position: self.mouse_pos, time })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                let button = match button {
                    MouseButton::Left => {
                        self.left_pressed = pressed;
                        PointerButton::Left
                    }
                    MouseButton::Right => {
                        self.right_pressed = pressed;
                        PointerButton::Right
                    }
                    MouseButton::Middle => {
                        self.middle_pressed = pressed;
                        PointerButton::Middle
                    }
                    _ => return None,
                };
                let position = self.mouse_pos;
                Some(if pressed {
                    PointerEvent::Down { button, position, time }
                } else {
                    PointerEvent::Up { button, position, time }
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state == ElementState::Pressed);
                }
                None
            }
            _ => None,
        }
    }

    /// Record a key press or release.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if !self.keys_held.contains(&key) {
                self.keys_just_pressed.insert(key);
            }
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
