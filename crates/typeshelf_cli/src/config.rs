//! Typeshelf configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use typeshelf_paint::Color;

/// Name of the configuration file looked up in a directory
pub const CONFIG_FILE: &str = "typeshelf.toml";

/// Top-level Typeshelf configuration (typeshelf.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TypeshelfConfig {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
}

/// Font selection
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct FontConfig {
    /// Font file (relative paths resolve against the config file's directory)
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Pixel size
    #[serde(default = "default_size")]
    pub size: u32,
    /// Apply pairwise kerning
    #[serde(default = "default_true")]
    pub kerning: bool,
}

fn default_size() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: default_size(),
            kerning: true,
        }
    }
}

/// Render target
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Background as `#rrggbb` or `#rrggbbaa`
    #[serde(default = "default_background")]
    pub background: String,
    /// Text color as `#rrggbb` or `#rrggbbaa`
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    120
}

fn default_background() -> String {
    "#202020ff".to_string()
}

fn default_color() -> String {
    "#ffffffff".to_string()
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            color: default_color(),
        }
    }
}

impl CanvasConfig {
    pub fn background_color(&self) -> Result<Color> {
        parse_color(&self.background)
    }

    pub fn text_color(&self) -> Result<Color> {
        parse_color(&self.color)
    }
}

/// Parse a `#rrggbb` / `#rrggbbaa` string
pub fn parse_color(value: &str) -> Result<Color> {
    Color::parse_hex(value).with_context(|| format!("Invalid color '{}'", value))
}

impl TypeshelfConfig {
    /// Load configuration from a file, or from `typeshelf.toml` in a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if let (Some(font), Some(base)) = (&config.font.path, config_path.parent()) {
            if font.is_relative() {
                config.font.path = Some(base.join(font));
            }
        }

        Ok(config)
    }

    /// Load `typeshelf.toml` from the working directory if it exists
    pub fn load_default() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            tracing::debug!("Using {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TypeshelfConfig::from_toml("").unwrap();
        assert_eq!(config, TypeshelfConfig::default());
        assert_eq!(config.font.size, 24);
        assert!(config.font.kerning);
        assert_eq!((config.canvas.width, config.canvas.height), (640, 120));
    }

    #[test]
    fn test_partial_sections() {
        let config = TypeshelfConfig::from_toml(
            r##"
            [font]
            path = "fonts/Sans.ttf"
            kerning = false

            [canvas]
            color = "#ff0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.font.path, Some(PathBuf::from("fonts/Sans.ttf")));
        assert_eq!(config.font.size, 24);
        assert!(!config.font.kerning);
        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.text_color().unwrap(), Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = TypeshelfConfig::default();
        config.font.size = 32;
        config.canvas.background = "#000000ff".to_string();

        let text = config.to_toml().unwrap();
        assert_eq!(TypeshelfConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_color_is_reported() {
        let err = parse_color("blue").unwrap_err();
        assert!(err.to_string().contains("blue"));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        assert!(TypeshelfConfig::from_toml("[font]\nsize = \"big\"").is_err());
    }
}
