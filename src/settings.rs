use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

/// All user-configurable settings, persisted to JSON.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub edit: EditSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EditSettings {
    /// Distance under which raw vertices are treated as one welded corner.
    pub weld_epsilon: f32,
    /// Pick radius of vertex markers, world units.
    pub vertex_marker_radius: f32,
    /// Pick radius of edge midpoint markers, world units.
    pub edge_marker_radius: f32,
    /// Two edge clicks closer than this arm an edge drag.
    pub double_click_ms: u64,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            weld_epsilon: crate::scene::weld::WELD_EPSILON,
            vertex_marker_radius: 0.05,
            edge_marker_radius: 0.08,
            double_click_ms: 300,
        }
    }
}

impl EditSettings {
    pub fn double_click_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.double_click_ms)
    }

    /// Replace tolerances and radii that are zero, negative or NaN with
    /// their defaults.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        for (name, value, fallback) in [
            ("weld_epsilon", &mut self.weld_epsilon, defaults.weld_epsilon),
            ("vertex_marker_radius", &mut self.vertex_marker_radius, defaults.vertex_marker_radius),
            ("edge_marker_radius", &mut self.edge_marker_radius, defaults.edge_marker_radius),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("Ignoring invalid {name} {value}, using {fallback}");
                *value = fallback;
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub selected_color: [f32; 3],
    pub unselected_color: [f32; 3],
    pub vertex_marker_alpha: f32,
    pub edge_marker_alpha: f32,
    /// Material color of newly added objects.
    pub object_color: [f32; 3],
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            selected_color: [1.0, 0.0, 0.0],
            unselected_color: [1.0, 1.0, 0.0],
            vertex_marker_alpha: 0.5,
            edge_marker_alpha: 0.7,
            // #44aa88
            object_color: [0x44 as f32 / 255.0, 0xaa as f32 / 255.0, 0x88 as f32 / 255.0],
        }
    }
}

impl DisplaySettings {
    /// RGBA highlight for a marker.
    pub fn marker_color(&self, selected: bool, alpha: f32) -> [f32; 4] {
        let [r, g, b] = if selected { self.selected_color } else { self.unselected_color };
        [r, g, b, alpha]
    }
}

impl Settings {
    /// Load settings from the config file. Falls back to defaults on error.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists()
            && let Ok(data) = std::fs::read_to_string(path)
        {
            match serde_json::from_str::<Settings>(&data) {
                Ok(mut settings) => {
                    settings.edit.sanitize();
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings file {path:?}: {e}"),
            }
        }
        Self::default()
    }

    /// Save settings to the config file.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(path, data);
        }
    }
}

pub(crate) fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/meshedit")
}

fn config_path() -> PathBuf {
    config_dir().join("settings.json")
}
