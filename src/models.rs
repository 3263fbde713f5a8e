use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Accent color used when a note has no explicit color
pub const ACCENT_COLOR: NoteColor = NoteColor { r: 0x63, g: 0x66, b: 0xf1 };

/// A calendar note.
///
/// Field names on the wire follow the browser store the data originally
/// lived in (`titulo`, `data`, `cor`, ...), so exported blobs load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "data")]
    pub date: NaiveDate, // YYYY-MM-DD
    #[serde(rename = "cor", default = "default_color")]
    pub color: NoteColor,
    #[serde(rename = "descricao", default)]
    pub description: String, // empty when not set
    #[serde(rename = "categoria")]
    pub category: String,
}

fn default_color() -> NoteColor {
    ACCENT_COLOR
}

impl Note {
    pub fn new(id: i64, title: String, date: NaiveDate, category: String) -> Self {
        Self {
            id,
            title,
            date,
            color: ACCENT_COLOR,
            description: String::new(),
            category,
        }
    }

    pub fn description(&self) -> Option<&str> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }
}

/// RGB color stored as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color '{0}': expected #RRGGBB or #RGB")]
pub struct ColorParseError(pub String);

impl NoteColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for NoteColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
                Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // #RGB expands each nibble: 0xF -> 0xFF
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| (v << 4) | v)
                        .map_err(|_| err())
                };
                Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for NoteColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#6366f1".parse::<NoteColor>(), Ok(ACCENT_COLOR));
        assert_eq!("#F00".parse::<NoteColor>(), Ok(NoteColor::new(255, 0, 0)));
        assert!("6366f1".parse::<NoteColor>().is_err());
        assert!("#12345".parse::<NoteColor>().is_err());
        assert!("#ggg".parse::<NoteColor>().is_err());
    }

    #[test]
    fn displays_lowercase_hex() {
        assert_eq!(NoteColor::new(0xAB, 0x01, 0xFF).to_string(), "#ab01ff");
    }

    #[test]
    fn decodes_browser_shaped_record() {
        let json = r##"{"id":1710460800000,"titulo":"Revisão P09","data":"2024-03-15","cor":"#10b981","descricao":"","categoria":"Manutenção"}"##;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, 1710460800000);
        assert_eq!(note.title, "Revisão P09");
        assert_eq!(note.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(note.color, NoteColor::new(0x10, 0xb9, 0x81));
        assert_eq!(note.description(), None);
        assert_eq!(note.category, "Manutenção");
    }

    #[test]
    fn missing_color_and_description_fall_back() {
        let json = r#"{"id":7,"titulo":"x","data":"2024-01-02","categoria":"Outro"}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.color, ACCENT_COLOR);
        assert!(note.description.is_empty());
    }
}
