//! Configuration loader plus strongly typed settings structures.
//!
//! This module deserializes `config.toml`, resolves the data directory
//! (which also holds the widget's state record and the log file), and turns
//! keybind strings into crossterm key combos.

use crate::data::WidgetAction;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "POMODORO_WIDGET_DIR";

/// Top-level configuration object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keybinds: KeybindConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64, // Event poll timeout in milliseconds (lower = higher FPS, higher CPU)
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

fn default_poll_timeout_ms() -> u64 {
    16
}

/// Key strings for each widget action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindConfig {
    #[serde(default = "default_start_key")]
    pub start: String,
    #[serde(default = "default_stop_key")]
    pub stop: String,
    #[serde(default = "default_reset_key")]
    pub reset: String,
    #[serde(default = "default_minimize_key")]
    pub minimize: String,
    #[serde(default = "default_quit_key")]
    pub quit: String,
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            start: default_start_key(),
            stop: default_stop_key(),
            reset: default_reset_key(),
            minimize: default_minimize_key(),
            quit: default_quit_key(),
        }
    }
}

fn default_start_key() -> String {
    "s".to_string()
}

fn default_stop_key() -> String {
    "x".to_string()
}

fn default_reset_key() -> String {
    "r".to_string()
}

fn default_minimize_key() -> String {
    "m".to_string()
}

fn default_quit_key() -> String {
    "q".to_string()
}

impl KeybindConfig {
    /// Parse every binding into a lookup map
    ///
    /// Unparseable strings are logged and skipped; that action is then only
    /// reachable with the mouse.
    pub fn to_keybind_map(&self) -> HashMap<(KeyCode, KeyModifiers), WidgetAction> {
        let bindings = [
            (&self.start, WidgetAction::Start),
            (&self.stop, WidgetAction::Stop),
            (&self.reset, WidgetAction::Reset),
            (&self.minimize, WidgetAction::ToggleMinimize),
            (&self.quit, WidgetAction::Quit),
        ];

        let mut map = HashMap::new();
        for (key_str, action) in bindings {
            match parse_key_string(key_str) {
                Some(combo) => {
                    if let Some(previous) = map.insert(combo, action) {
                        tracing::warn!(
                            "Key '{}' bound to both {} and {}; using {}",
                            key_str,
                            previous.name(),
                            action.name(),
                            action.name()
                        );
                    }
                }
                None => tracing::warn!("Invalid key '{}' for {}, skipping", key_str, action.name()),
            }
        }
        map
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Extract defaults on first run (idempotent - only creates missing files)
        Self::extract_defaults()?;
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write the commented default config if none exists yet
    fn extract_defaults() -> Result<()> {
        let dir = Self::base_dir()?;
        fs::create_dir_all(&dir).context(format!("Failed to create {:?}", dir))?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;
            tracing::info!("Extracted config.toml to {:?}", config_path);
        }
        Ok(())
    }

    /// Get the base directory (~/.pomodoro-widget/)
    /// Can be overridden with the POMODORO_WIDGET_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".pomodoro-widget"))
    }

    /// Returns: ~/.pomodoro-widget/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Returns: ~/.pomodoro-widget/pomodoro-widget.log
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("pomodoro-widget.log"))
    }
}

/// Parse a key string like "s", "ctrl+r" or "f5" into a crossterm key combo
pub fn parse_key_string(key_str: &str) -> Option<(KeyCode, KeyModifiers)> {
    let key_str = key_str.trim();
    if key_str.is_empty() {
        return None;
    }

    // A bare "+" is a key, not a separator
    let parts: Vec<&str> = if key_str.ends_with("++") {
        let mut parts: Vec<&str> = key_str[..key_str.len() - 2].split('+').collect();
        parts.push("+");
        parts
    } else if key_str == "+" {
        vec!["+"]
    } else {
        key_str.split('+').collect()
    };

    let mut modifiers = KeyModifiers::empty();
    for part in &parts[..parts.len() - 1] {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return None,
        }
    }

    let key_part = parts[parts.len() - 1];
    let key_code = match key_part.to_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "page_up" | "pageup" => KeyCode::PageUp,
        "page_down" | "pagedown" => KeyCode::PageDown,
        f if f.len() > 1 && f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        _ => {
            let mut chars = key_part.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some((key_code, modifiers))
}
