// File: ./src/model/prefs.rs
// User preferences: window geometry kept for GUI front-ends and the recipe book location.
use crate::context::RECIPE_BOOK_FILENAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_window_width() -> f64 {
    740.0
}
fn default_window_height() -> f64 {
    600.0
}
fn default_recipe_book_file_path() -> PathBuf {
    PathBuf::from(RECIPE_BOOK_FILENAME)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCoordinates {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuiSettings {
    #[serde(default = "default_window_width")]
    pub window_width: f64,
    #[serde(default = "default_window_height")]
    pub window_height: f64,
    #[serde(default)]
    pub window_coordinates: Option<WindowCoordinates>,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            window_coordinates: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    #[serde(default)]
    pub gui_settings: GuiSettings,
    #[serde(default = "default_recipe_book_file_path")]
    pub recipe_book_file_path: PathBuf,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            gui_settings: GuiSettings::default(),
            recipe_book_file_path: default_recipe_book_file_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_prefs_fill_defaults() {
        let prefs: UserPrefs =
            serde_json::from_str(r#"{ "guiSettings": { "windowWidth": 1000.0 } }"#).unwrap();
        assert_eq!(prefs.gui_settings.window_width, 1000.0);
        assert_eq!(prefs.gui_settings.window_height, 600.0);
        assert!(prefs.gui_settings.window_coordinates.is_none());
        assert_eq!(prefs.recipe_book_file_path, PathBuf::from("recipebook.json"));
    }

    #[test]
    fn test_prefs_serialize_camel_case() {
        let prefs = UserPrefs {
            gui_settings: GuiSettings {
                window_coordinates: Some(WindowCoordinates { x: 10, y: 20 }),
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains("\"recipeBookFilePath\""));
        assert!(json.contains("\"windowCoordinates\":{\"x\":10,\"y\":20}"));
        let back: UserPrefs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
