//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform
//! equivalent). A missing or unreadable file falls back to defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub rotate_ccw: Vec<String>,
    pub rotate_cw: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            rotate_ccw: vec!["Up".to_string()],
            rotate_cw: vec!["Down".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            block_style: "solid".to_string(),
        }
    }
}

impl VisualSettings {
    /// Glyph used for one block cell
    pub fn block_char(&self) -> &'static str {
        match self.block_style.as_str() {
            "bracket" => "[]",
            "round" => "()",
            _ => "██", // "solid" or default
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let settings = Settings::default();
        assert_eq!(settings.keys.move_left, vec!["Left"]);
        assert_eq!(settings.keys.rotate_ccw, vec!["Up"]);
        assert_eq!(settings.keys.quit, vec!["q", "Esc"]);
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_char(), "██");
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_char(), "[]");
        visual.block_style = "nonsense".to_string();
        assert_eq!(visual.block_char(), "██");
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed.keys.move_right, settings.keys.move_right);
        assert_eq!(parsed.visual.block_style, settings.visual.block_style);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let parsed: Settings = toml::from_str("[keys]\nmove_left = [\"a\"]\n").unwrap();
        assert_eq!(parsed.keys.move_left, vec!["a"]);
        assert_eq!(parsed.keys.move_right, vec!["Right"]);
        assert_eq!(parsed.visual.block_style, "solid");
    }
}
