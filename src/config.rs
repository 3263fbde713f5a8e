use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::calendar::ViewMode;
use crate::models::{NoteColor, ACCENT_COLOR};
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_store_path")]
    pub store_path: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_color_presets")]
    pub color_presets: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_view_mode")]
    pub default_view_mode: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_prev_period")]
    pub prev_period: String,
    #[serde(default = "default_next_period")]
    pub next_period: String,
    #[serde(default = "default_view_day")]
    pub view_day: String,
    #[serde(default = "default_view_week")]
    pub view_week: String,
    #[serde(default = "default_view_month")]
    pub view_month: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_drawer_today")]
    pub drawer_today: String,
    #[serde(default = "default_cycle_theme")]
    pub cycle_theme: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_cursor_left")]
    pub cursor_left: String,
    #[serde(default = "default_cursor_right")]
    pub cursor_right: String,
    #[serde(default = "default_cursor_up")]
    pub cursor_up: String,
    #[serde(default = "default_cursor_down")]
    pub cursor_down: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_muted_fg")]
    pub muted_fg: String,
    #[serde(default = "default_weekend_fg")]
    pub weekend_fg: String,
    #[serde(default = "default_today_fg")]
    pub today_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            accent_color: default_accent_color(),
            color_presets: default_color_presets(),
            categories: default_categories(),
            default_view_mode: default_view_mode(),
            log_file: None,
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            edit: default_edit(),
            delete: default_delete(),
            save: default_save(),
            select: default_select(),
            prev_period: default_prev_period(),
            next_period: default_next_period(),
            view_day: default_view_day(),
            view_week: default_view_week(),
            view_month: default_view_month(),
            today: default_today(),
            drawer_today: default_drawer_today(),
            cycle_theme: default_cycle_theme(),
            help: default_help(),
            cursor_left: default_cursor_left(),
            cursor_right: default_cursor_right(),
            cursor_up: default_cursor_up(),
            cursor_down: default_cursor_down(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            muted_fg: default_muted_fg(),
            weekend_fg: default_weekend_fg(),
            today_fg: default_today_fg(),
        }
    }
}

impl Theme {
    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("dark".to_string(), Theme {
            highlight_bg: "cyan".to_string(),
            highlight_fg: "black".to_string(),
            ..Theme::default()
        });

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            muted_fg: "gray".to_string(),
            weekend_fg: "red".to_string(),
            today_fg: "blue".to_string(),
            ..Theme::default()
        });

        themes.insert("monochrome".to_string(), Theme {
            highlight_bg: "white".to_string(),
            highlight_fg: "black".to_string(),
            weekend_fg: "white".to_string(),
            today_fg: "white".to_string(),
            ..Theme::default()
        });

        themes
    }
}

// Default value functions
fn default_store_path() -> String {
    Config::default_store_path_for_profile(utils::Profile::Prod)
}

fn default_accent_color() -> String {
    ACCENT_COLOR.to_string()
}

fn default_color_presets() -> Vec<String> {
    ["#6366f1", "#10b981", "#f59e0b", "#ef4444", "#3b82f6", "#8b5cf6"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_categories() -> Vec<String> {
    ["Reunião", "Manutenção", "Lembrete", "Evento", "Outro"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_view_mode() -> String {
    ViewMode::Month.as_str().to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_delete() -> String {
    "x".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_prev_period() -> String {
    "[".to_string()
}

fn default_next_period() -> String {
    "]".to_string()
}

fn default_view_day() -> String {
    "d".to_string()
}

fn default_view_week() -> String {
    "w".to_string()
}

fn default_view_month() -> String {
    "m".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_drawer_today() -> String {
    "o".to_string()
}

fn default_cycle_theme() -> String {
    "T".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_cursor_left() -> String {
    "h".to_string()
}

fn default_cursor_right() -> String {
    "l".to_string()
}

fn default_cursor_up() -> String {
    "k".to_string()
}

fn default_cursor_down() -> String {
    "j".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_muted_fg() -> String {
    "darkgray".to_string()
}

fn default_weekend_fg() -> String {
    "lightred".to_string()
}

fn default_today_fg() -> String {
    "lightgreen".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
}

impl Config {
    /// Load configuration for `profile`, creating a default file if missing.
    /// `override_path` replaces the profile's config file location.
    pub fn load_with_profile(profile: utils::Profile, override_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match override_path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path(profile)?,
        };

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Config::default();
            config.store_path = Self::default_store_path_for_profile(profile);
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;
        let config: Config = toml::from_str(&contents)?;
        if config.config_version.unwrap_or(0) > CURRENT_CONFIG_VERSION {
            warn!(path = %path.display(), "config was written by a newer version");
        }
        Ok(config)
    }

    pub fn save_to(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_store_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("agenda.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/agenda-dev/agenda.db".to_string(),
                utils::Profile::Prod => "~/.local/share/agenda/agenda.db".to_string(),
            }
        }
    }

    /// Store path with `~` expanded
    pub fn get_store_path(&self) -> PathBuf {
        utils::expand_path(&self.store_path)
    }

    /// Log file from the `AGENDA_LOG_FILE` environment variable or the config
    pub fn get_log_path(&self) -> Option<PathBuf> {
        std::env::var("AGENDA_LOG_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.log_file.clone())
            .map(|p| utils::expand_path(&p))
    }

    pub fn accent(&self) -> NoteColor {
        self.accent_color.parse().unwrap_or_else(|e| {
            warn!(error = %e, "invalid accent_color, using default");
            ACCENT_COLOR
        })
    }

    /// Category preselected for new notes
    pub fn default_category(&self) -> String {
        self.categories
            .iter()
            .find(|c| !c.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "Outro".to_string())
    }

    pub fn view_mode(&self) -> ViewMode {
        self.default_view_mode.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "invalid default_view_mode, using month");
            ViewMode::Month
        })
    }

    /// Active theme: user theme, then preset, then the default preset.
    /// An empty `highlight_fg` is derived from `highlight_bg`.
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = self.themes.get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default();

        if theme.highlight_fg.is_empty() {
            let calculated_fg = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }

        theme
    }

    pub fn set_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.themes.contains_key(name) && !Theme::get_preset_themes().contains_key(name) {
            return Err(ConfigError::ThemeNotFound(name.to_string()));
        }
        self.current_theme = name.to_string();
        Ok(())
    }

    /// All theme names (presets + user-defined), sorted
    pub fn get_available_themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = Theme::get_preset_themes().into_keys().collect();
        for theme_name in self.themes.keys() {
            if !themes.contains(theme_name) {
                themes.push(theme_name.clone());
            }
        }
        themes.sort();
        themes
    }

    /// Switch to the theme after the current one and return its name
    pub fn cycle_theme(&mut self) -> String {
        let themes = self.get_available_themes();
        let next = themes
            .iter()
            .position(|t| *t == self.current_theme)
            .map(|i| (i + 1) % themes.len())
            .unwrap_or(0);
        self.current_theme = themes[next].clone();
        self.current_theme.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r##"
            accent_color = "#10b981"
            categories = ["Plantão"]

            [key_bindings]
            quit = "Ctrl+q"
            "##,
        )
        .unwrap();
        assert_eq!(config.accent(), NoteColor::new(0x10, 0xb9, 0x81));
        assert_eq!(config.default_category(), "Plantão");
        assert_eq!(config.key_bindings.quit, "Ctrl+q");
        assert_eq!(config.key_bindings.new, "n");
        assert_eq!(config.view_mode(), ViewMode::Month);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config {
            accent_color: "indigo".to_string(),
            default_view_mode: "year".to_string(),
            categories: vec![],
            ..Config::default()
        };
        assert_eq!(config.accent(), ACCENT_COLOR);
        assert_eq!(config.view_mode(), ViewMode::Month);
        assert_eq!(config.default_category(), "Outro");
    }

    #[test]
    fn cycles_through_all_themes() {
        let mut config = Config::default();
        let names = config.get_available_themes();
        let mut seen = Vec::new();
        for _ in 0..names.len() {
            seen.push(config.cycle_theme());
        }
        seen.sort();
        assert_eq!(seen, names);
        assert!(config.set_theme("nope").is_err());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.current_theme = "light".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.current_theme, "light");
        assert_eq!(loaded.categories, config.categories);
    }
}
