use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(&self) -> &'static str {
        match self {
            Profile::Dev => "agenda-dev",
            Profile::Prod => "agenda",
        }
    }
}

/// Configuration directory; the dev profile gets its own "agenda-dev" directory
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "agenda", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Data directory holding the note store
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "agenda", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
}

/// Today's date in the local time zone
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Milliseconds since the Unix epoch, used to mint note ids
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A key from the config file, e.g. "q", "Enter", "Ctrl+s"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key_code: KeyCode,
    pub requires_ctrl: bool,
}

impl KeyBinding {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.key_code && has_primary_modifier(event.modifiers) == self.requires_ctrl
    }
}

/// Ctrl on Windows/Linux; Ctrl or Option on macOS
pub fn has_primary_modifier(modifiers: KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// On macOS "Ctrl+" is shown as "Opt+"
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

pub fn parse_key_binding(key_str: &str) -> Result<KeyBinding, String> {
    let key_str = key_str.trim();
    match key_str.strip_prefix("Ctrl+") {
        Some(key_part) => Ok(KeyBinding {
            key_code: parse_key_code(key_part)?,
            requires_ctrl: true,
        }),
        None => Ok(KeyBinding {
            key_code: parse_key_code(key_str)?,
            requires_ctrl: false,
        }),
    }
}

fn parse_key_code(key_str: &str) -> Result<KeyCode, String> {
    let code = match key_str {
        "Enter" => KeyCode::Enter,
        "Esc" | "Escape" => KeyCode::Esc,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Space" | " " => KeyCode::Char(' '),
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Delete" => KeyCode::Delete,
        "Insert" => KeyCode::Insert,
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_special_and_ctrl_keys() {
        assert_eq!(parse_key_binding("q").unwrap().key_code, KeyCode::Char('q'));
        assert_eq!(parse_key_binding("[").unwrap().key_code, KeyCode::Char('['));
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
        assert_eq!(parse_key_binding("F").unwrap().key_code, KeyCode::Char('F'));
        let save = parse_key_binding("Ctrl+s").unwrap();
        assert_eq!(save.key_code, KeyCode::Char('s'));
        assert!(save.requires_ctrl);
        assert!(parse_key_binding("Hyper+x").is_err());
        assert!(parse_key_binding("F13").is_err());
    }

    #[test]
    fn binding_matches_modifiers() {
        let save = parse_key_binding("Ctrl+s").unwrap();
        assert!(save.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!save.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
        let upper = parse_key_binding("T").unwrap();
        assert!(upper.matches(&KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn parses_dates_strictly() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("15/03/2024").is_err());
    }
}
