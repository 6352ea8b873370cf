use std::collections::HashMap;
use winit::keyboard::KeyCode;
use crate::input::InputState;

/// Modifier keys for a keybinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { ctrl: false, shift: false, alt: false };
    pub const CTRL: Self = Self { ctrl: true, shift: false, alt: false };
    pub const SHIFT: Self = Self { ctrl: false, shift: true, alt: false };
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ctrl { write!(f, "Ctrl+")?; }
        if self.shift { write!(f, "Shift+")?; }
        if self.alt { write!(f, "Alt+")?; }
        Ok(())
    }
}

/// A key combination: modifiers + key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    #[serde(with = "keycode_serde")]
    pub key: KeyCode,
}

mod keycode_serde {
    use super::*;
    use serde::{Serializer, Deserializer, Deserialize};

    pub fn serialize<S: Serializer>(key: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(key_name(*key))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        key_from_name(&name).ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

impl std::fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.modifiers, key_name(self.key))
    }
}

/// All bindable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Action {
    EditVertices,
    EditEdges,
    EditFaces,
    ExitEditMode,
    TransformTranslate,
    TransformRotate,
    TransformScale,
    CancelDrag,
    DeleteObject,
    ToggleVisibility,
    DeselectObject,
}

/// All actions with their display names, for the editor UI.
pub const ALL_ACTIONS: &[(Action, &str)] = &[
    (Action::EditVertices, "Edit Vertices"),
    (Action::EditEdges, "Edit Edges"),
    (Action::EditFaces, "Edit Faces"),
    (Action::ExitEditMode, "Exit Edit Mode"),
    (Action::TransformTranslate, "Move Tool"),
    (Action::TransformRotate, "Rotate Tool"),
    (Action::TransformScale, "Scale Tool"),
    (Action::CancelDrag, "Cancel Drag"),
    (Action::DeleteObject, "Delete Object"),
    (Action::ToggleVisibility, "Toggle Visibility"),
    (Action::DeselectObject, "Deselect Object"),
];

/// Keybinding configuration.
#[derive(Debug, Clone)]
pub struct Keybindings {
    pub bindings: HashMap<Action, KeyCombo>,
}

impl Keybindings {
    pub fn defaults() -> Self {
        let mut b = HashMap::new();
        b.insert(Action::EditVertices, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::Digit1 });
        b.insert(Action::EditEdges, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::Digit2 });
        b.insert(Action::EditFaces, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::Digit3 });
        b.insert(Action::ExitEditMode, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::Tab });
        b.insert(Action::TransformTranslate, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::KeyG });
        b.insert(Action::TransformRotate, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::KeyR });
        b.insert(Action::TransformScale, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::KeyS });
        b.insert(Action::CancelDrag, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::Escape });
        b.insert(Action::DeleteObject, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::Delete });
        b.insert(Action::ToggleVisibility, KeyCombo { modifiers: Modifiers::NONE, key: KeyCode::KeyH });
        b.insert(Action::DeselectObject, KeyCombo { modifiers: Modifiers::CTRL, key: KeyCode::KeyD });
        Self { bindings: b }
    }

    /// Check if an action's keybinding is triggered given the current input state.
    pub fn is_triggered(&self, action: Action, input: &InputState) -> bool {
        let Some(combo) = self.bindings.get(&action) else { return false };

        if !input.key_just_pressed(combo.key) {
            return false;
        }

        let ctrl = input.key_held(KeyCode::ControlLeft) || input.key_held(KeyCode::ControlRight);
        let shift = input.key_held(KeyCode::ShiftLeft) || input.key_held(KeyCode::ShiftRight);
        let alt = input.key_held(KeyCode::AltLeft) || input.key_held(KeyCode::AltRight);

        ctrl == combo.modifiers.ctrl && shift == combo.modifiers.shift && alt == combo.modifiers.alt
    }

    /// Every action triggered this frame, in `ALL_ACTIONS` order.
    pub fn triggered(&self, input: &InputState) -> Vec<Action> {
        ALL_ACTIONS
            .iter()
            .map(|&(action, _)| action)
            .filter(|&action| self.is_triggered(action, input))
            .collect()
    }

    /// Get the display string for an action's keybinding.
    pub fn display(&self, action: Action) -> String {
        self.bindings.get(&action).map_or_else(
            || "Unbound".to_string(),
            |c| c.to_string(),
        )
    }

    /// Load keybindings from config file. Falls back to defaults on error.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists()
            && let Ok(data) = std::fs::read_to_string(&path)
            && let Ok(bindings) = serde_json::from_str::<HashMap<Action, KeyCombo>>(&data)
        {
            return Self { bindings };
        }
        Self::defaults()
    }

    /// Save keybindings to config file.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(&self.bindings) {
            let _ = std::fs::write(&path, data);
        }
    }
}

fn config_path() -> std::path::PathBuf {
    crate::settings::config_dir().join("keybindings.json")
}

/// Keys that can be bound, with the names used in the config file.
const KEY_NAMES: &[(KeyCode, &str)] = &[
    (KeyCode::KeyA, "A"), (KeyCode::KeyB, "B"), (KeyCode::KeyC, "C"), (KeyCode::KeyD, "D"),
    (KeyCode::KeyE, "E"), (KeyCode::KeyF, "F"), (KeyCode::KeyG, "G"), (KeyCode::KeyH, "H"),
    (KeyCode::KeyI, "I"), (KeyCode::KeyJ, "J"), (KeyCode::KeyK, "K"), (KeyCode::KeyL, "L"),
    (KeyCode::KeyM, "M"), (KeyCode::KeyN, "N"), (KeyCode::KeyO, "O"), (KeyCode::KeyP, "P"),
    (KeyCode::KeyQ, "Q"), (KeyCode::KeyR, "R"), (KeyCode::KeyS, "S"), (KeyCode::KeyT, "T"),
    (KeyCode::KeyU, "U"), (KeyCode::KeyV, "V"), (KeyCode::KeyW, "W"), (KeyCode::KeyX, "X"),
    (KeyCode::KeyY, "Y"), (KeyCode::KeyZ, "Z"),
    (KeyCode::Digit0, "0"), (KeyCode::Digit1, "1"), (KeyCode::Digit2, "2"), (KeyCode::Digit3, "3"),
    (KeyCode::Digit4, "4"), (KeyCode::Digit5, "5"), (KeyCode::Digit6, "6"), (KeyCode::Digit7, "7"),
    (KeyCode::Digit8, "8"), (KeyCode::Digit9, "9"),
    (KeyCode::Tab, "Tab"),
    (KeyCode::Delete, "Delete"),
    (KeyCode::Backspace, "Backspace"),
    (KeyCode::Enter, "Enter"),
    (KeyCode::Escape, "Escape"),
    (KeyCode::Space, "Space"),
];

/// Display name for a key code.
fn key_name(key: KeyCode) -> &'static str {
    KEY_NAMES.iter().find(|(k, _)| *k == key).map_or("?", |(_, name)| name)
}

/// Reverse lookup: display name to KeyCode.
fn key_from_name(name: &str) -> Option<KeyCode> {
    KEY_NAMES.iter().find(|(_, n)| *n == name).map(|(k, _)| *k)
}
