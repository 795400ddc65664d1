//! Theme presets and per-request theme values.
//!
//! Themes are immutable named presets. A custom palette produces a new
//! `ThemeConfig` value carried with the request; there is no shared
//! registry to mutate, so concurrent decks with different custom palettes
//! cannot interfere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual richness knob. Changes decoration density, never content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    #[default]
    Standard,
    Rich,
}

impl Complexity {
    /// Parse a loosely supplied tier name, defaulting to standard.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Complexity::Simple,
            "rich" => Complexity::Rich,
            _ => Complexity::Standard,
        }
    }
}

/// Named color roles used by every rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    pub border: String,
}

/// Font pairing: heading face and body face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontPair {
    pub heading: String,
    pub body: String,
}

impl Default for FontPair {
    fn default() -> Self {
        Self {
            heading: "Helvetica".to_string(),
            body: "Helvetica".to_string(),
        }
    }
}

/// A resolved theme: palette + fonts + complexity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub palette: Palette,
    pub fonts: FontPair,
    pub complexity: Complexity,
}

/// Errors raised while loading a custom palette file.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Invalid theme file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid color value for '{role}': {value}")]
    InvalidColor { role: String, value: String },
}

/// Shape of a custom palette TOML file.
#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    #[serde(default)]
    fonts: Option<FontPair>,
    palette: Palette,
}

impl ThemeConfig {
    /// Look up a named preset, falling back to the default preset on
    /// unknown names, and attach the requested complexity tier.
    pub fn preset(name: &str, complexity: Complexity) -> Self {
        let (name, palette) = match name.trim().to_ascii_lowercase().as_str() {
            "midnight" => ("midnight", midnight_palette()),
            "forest" => ("forest", forest_palette()),
            "coral" => ("coral", coral_palette()),
            "slate" => ("slate", slate_palette()),
            _ => ("modern", modern_palette()),
        };

        Self {
            name: name.to_string(),
            palette,
            fonts: FontPair::default(),
            complexity,
        }
    }

    /// Names of all built-in presets.
    pub fn preset_names() -> &'static [&'static str] {
        &["modern", "midnight", "forest", "coral", "slate"]
    }

    /// Build an ephemeral theme from a custom palette TOML file.
    ///
    /// The result is a standalone value; presets are never mutated.
    pub fn from_toml_str(toml_str: &str, complexity: Complexity) -> Result<Self, ThemeError> {
        let file: ThemeFile = toml::from_str(toml_str)?;

        for (role, value) in [
            ("primary", &file.palette.primary),
            ("secondary", &file.palette.secondary),
            ("accent", &file.palette.accent),
            ("background", &file.palette.background),
            ("surface", &file.palette.surface),
            ("text", &file.palette.text),
            ("text_muted", &file.palette.text_muted),
            ("border", &file.palette.border),
        ] {
            if !is_hex_color(value) {
                return Err(ThemeError::InvalidColor {
                    role: role.to_string(),
                    value: value.clone(),
                });
            }
        }

        Ok(Self {
            name: file.name.unwrap_or_else(|| "custom".to_string()),
            palette: file.palette,
            fonts: file.fonts.unwrap_or_default(),
            complexity,
        })
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::preset("modern", Complexity::Standard)
    }
}

fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn modern_palette() -> Palette {
    Palette {
        primary: "#2563EB".to_string(),
        secondary: "#7C3AED".to_string(),
        accent: "#F59E0B".to_string(),
        background: "#FFFFFF".to_string(),
        surface: "#F1F5F9".to_string(),
        text: "#0F172A".to_string(),
        text_muted: "#64748B".to_string(),
        border: "#CBD5E1".to_string(),
    }
}

fn midnight_palette() -> Palette {
    Palette {
        primary: "#38BDF8".to_string(),
        secondary: "#A78BFA".to_string(),
        accent: "#FBBF24".to_string(),
        background: "#0F172A".to_string(),
        surface: "#1E293B".to_string(),
        text: "#F8FAFC".to_string(),
        text_muted: "#94A3B8".to_string(),
        border: "#334155".to_string(),
    }
}

fn forest_palette() -> Palette {
    Palette {
        primary: "#16A34A".to_string(),
        secondary: "#0D9488".to_string(),
        accent: "#CA8A04".to_string(),
        background: "#FEFCE8".to_string(),
        surface: "#ECFCCB".to_string(),
        text: "#14532D".to_string(),
        text_muted: "#4D7C0F".to_string(),
        border: "#D9F99D".to_string(),
    }
}

fn coral_palette() -> Palette {
    Palette {
        primary: "#E11D48".to_string(),
        secondary: "#EA580C".to_string(),
        accent: "#0EA5E9".to_string(),
        background: "#FFF1F2".to_string(),
        surface: "#FFE4E6".to_string(),
        text: "#4C0519".to_string(),
        text_muted: "#9F1239".to_string(),
        border: "#FECDD3".to_string(),
    }
}

fn slate_palette() -> Palette {
    Palette {
        primary: "#475569".to_string(),
        secondary: "#64748B".to_string(),
        accent: "#0891B2".to_string(),
        background: "#F8FAFC".to_string(),
        surface: "#E2E8F0".to_string(),
        text: "#1E293B".to_string(),
        text_muted: "#64748B".to_string(),
        border: "#CBD5E1".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        let theme = ThemeConfig::preset("midnight", Complexity::Rich);
        assert_eq!(theme.name, "midnight");
        assert_eq!(theme.complexity, Complexity::Rich);
        assert_eq!(theme.palette.background, "#0F172A");
    }

    #[test]
    fn test_unknown_preset_falls_back_to_default() {
        let theme = ThemeConfig::preset("does-not-exist", Complexity::Simple);
        assert_eq!(theme.name, "modern");
    }

    #[test]
    fn test_custom_palette_from_toml() {
        let toml = r##"
name = "corporate"

[palette]
primary = "#112233"
secondary = "#223344"
accent = "#334455"
background = "#FFFFFF"
surface = "#EEEEEE"
text = "#000000"
text_muted = "#666666"
border = "#CCCCCC"
"##;
        let theme = ThemeConfig::from_toml_str(toml, Complexity::Standard).unwrap();
        assert_eq!(theme.name, "corporate");
        assert_eq!(theme.palette.primary, "#112233");
    }

    #[test]
    fn test_custom_palette_rejects_bad_color() {
        let toml = r##"
[palette]
primary = "red"
secondary = "#223344"
accent = "#334455"
background = "#FFFFFF"
surface = "#EEEEEE"
text = "#000000"
text_muted = "#666666"
border = "#CCCCCC"
"##;
        let err = ThemeConfig::from_toml_str(toml, Complexity::Standard).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidColor { .. }));
    }

    #[test]
    fn test_complexity_lenient() {
        assert_eq!(Complexity::parse_lenient("RICH"), Complexity::Rich);
        assert_eq!(Complexity::parse_lenient("fancy"), Complexity::Standard);
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#abc"));
        assert!(is_hex_color("#A1B2C3"));
        assert!(is_hex_color("#A1B2C3FF"));
        assert!(!is_hex_color("A1B2C3"));
        assert!(!is_hex_color("#xyz"));
    }
}
