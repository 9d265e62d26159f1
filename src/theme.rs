//! Highlight theme tables for the engine
//!
//! Provides YAML-based theming support with compile-time embedded themes
//! and user-defined themes from the config directory.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/scribe/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary
//!
//! A theme is immutable once loaded and is passed by reference into every
//! highlighting call; the engine keeps no ambient theme state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::syntax::{HighlightId, HIGHLIGHT_NAMES};

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "dark", "light")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        match s.len() {
            6 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: 255,
            }),
            8 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: u8::from_str_radix(&s[6..8], 16).map_err(|e| e.to_string())?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Resolved text style for a highlight span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub foreground: Color,
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    pub const fn plain(foreground: Color) -> Self {
        Self {
            foreground,
            bold: false,
            italic: false,
        }
    }
}

/// Raw style entry as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct StyleData {
    pub fg: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl StyleData {
    fn resolve(&self) -> Result<Style, String> {
        Ok(Style {
            foreground: Color::from_hex(&self.fg)?,
            bold: self.bold,
            italic: self.italic,
        })
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Default style for text no capture matches
    pub plain: StyleData,
    /// Full-line override style for lint error annotations
    pub error: StyleData,
    /// Capture name -> style (hierarchical names fall back to parents)
    pub syntax: HashMap<String, StyleData>,
}

/// Resolved theme with per-capture styles
///
/// Styles are resolved against [`HIGHLIGHT_NAMES`] once at load time so that
/// lookups during highlighting are a plain index.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    /// Style per entry of HIGHLIGHT_NAMES
    styles: Vec<Style>,
    /// Style for unhighlighted text
    pub plain: Style,
    /// Style used for the full-line error override span
    pub error: Style,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to a resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        if data.version != 1 {
            return Err(format!("Unsupported theme version: {}", data.version));
        }

        let plain = data.plain.resolve()?;
        let error = data.error.resolve()?;

        // Resolve each known capture name, walking hierarchical names down to
        // their parents ("keyword.function" -> "keyword"), falling back to plain.
        let mut styles = Vec::with_capacity(HIGHLIGHT_NAMES.len());
        for &name in HIGHLIGHT_NAMES {
            let mut current = name;
            let style = loop {
                if let Some(entry) = data.syntax.get(current) {
                    break entry.resolve()?;
                }
                match current.rfind('.') {
                    Some(dot) => current = &current[..dot],
                    None => break plain,
                }
            };
            styles.push(style);
        }

        Ok(Theme {
            name: data.name,
            styles,
            plain,
            error,
        })
    }

    /// Style for a highlight id produced by the highlighting engine
    pub fn style_for(&self, highlight: HighlightId) -> Style {
        self.styles
            .get(highlight as usize)
            .copied()
            .unwrap_or(self.plain)
    }
}

impl Default for Theme {
    fn default() -> Self {
        // The embedded default theme is validated by tests; if it ever fails
        // to parse, fall back to a monochrome theme rather than panicking.
        Theme::from_yaml(DEFAULT_DARK_YAML).unwrap_or_else(|_| Theme {
            name: "Fallback".to_string(),
            styles: vec![Style::plain(Color::rgb(0xD4, 0xD4, 0xD4)); HIGHLIGHT_NAMES.len()],
            plain: Style::plain(Color::rgb(0xD4, 0xD4, 0xD4)),
            error: Style {
                foreground: Color::rgb(0xF7, 0x54, 0x64),
                bold: false,
                italic: true,
            },
        })
    }
}

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/scribe/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    /// Stable identifier (e.g., "dark", "my-custom-theme")
    pub id: String,
    /// Display name from YAML (e.g., "Scribe Dark")
    pub name: String,
    /// Where this theme is loaded from
    pub source: ThemeSource,
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes from all sources
///
/// User themes override builtins with the same id.
pub fn list_available_themes() -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = crate::config_paths::themes_dir() {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path: PathBuf = entry.path();
                if path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                        if seen_ids.insert(id.to_string()) {
                            let name = from_file(&path)
                                .map(|t| t.name)
                                .unwrap_or_else(|_| id.to_string());
                            themes.push(ThemeInfo {
                                id: id.to_string(),
                                name,
                                source: ThemeSource::User,
                            });
                        }
                    }
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::highlight_id_for_name;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#1E2A3B").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0x1E, 0x2A, 0x3B, 0xFF));

        let c = Color::from_hex("1E2A3B80").unwrap();
        assert_eq!(c.a, 0x80);

        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_builtin_themes_parse() {
        for builtin in BUILTIN_THEMES {
            let theme = Theme::from_yaml(builtin.yaml);
            assert!(theme.is_ok(), "builtin theme '{}' failed to parse", builtin.id);
        }
    }

    #[test]
    fn test_hierarchical_style_fallback() {
        let theme = Theme::from_yaml(
            r##"
version: 1
name: "Test"
plain: { fg: "#AAAAAA" }
error: { fg: "#FF0000" }
syntax:
  keyword: { fg: "#112233", bold: true }
"##,
        )
        .unwrap();

        // "keyword.function" has no entry of its own; falls back to "keyword"
        let id = highlight_id_for_name("keyword.function").unwrap();
        let style = theme.style_for(id);
        assert_eq!(style.foreground, Color::rgb(0x11, 0x22, 0x33));
        assert!(style.bold);

        // "string" has no entry at all; falls back to plain
        let id = highlight_id_for_name("string").unwrap();
        assert_eq!(theme.style_for(id), theme.plain);
    }

    #[test]
    fn test_unknown_builtin_id() {
        assert!(Theme::from_builtin("no-such-theme").is_err());
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = Theme::from_yaml(
            r##"
version: 9
name: "Future"
plain: { fg: "#AAAAAA" }
error: { fg: "#FF0000" }
syntax: {}
"##,
        );
        assert!(result.is_err());
    }
}
