//! Editor configuration
//!
//! Read from a TOML file shaped like:
//!
//! ```toml
//! seed = 1234
//!
//! [map]
//! dimensions = "64x64"
//! era = "winter"
//! extension_pack = true
//!
//! [tiles]
//! width = 32
//! height = 32
//!
//! [assets]
//! data_dir = "data"
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use war2edit_tile::Era;

/// Error type for configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Map sizes the game supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapDimensions {
    #[default]
    #[serde(rename = "32x32")]
    Small,
    #[serde(rename = "64x64")]
    Medium,
    #[serde(rename = "96x96")]
    Large,
    #[serde(rename = "128x128")]
    Huge,
}

impl MapDimensions {
    pub const ALL: [MapDimensions; 4] = [
        MapDimensions::Small,
        MapDimensions::Medium,
        MapDimensions::Large,
        MapDimensions::Huge,
    ];

    /// Width and height in tiles
    pub fn size(self) -> (u32, u32) {
        match self {
            MapDimensions::Small => (32, 32),
            MapDimensions::Medium => (64, 64),
            MapDimensions::Large => (96, 96),
            MapDimensions::Huge => (128, 128),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub dimensions: MapDimensions,
    pub era: Era,
    /// Whether the expansion data is installed
    pub extension_pack: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dimensions: MapDimensions::default(),
            era: Era::Forest,
            extension_pack: true,
        }
    }
}

impl MapConfig {
    /// Era actually used: swamp falls back to forest without the expansion
    pub fn effective_era(&self) -> Era {
        if self.era.requires_extension() && !self.extension_pack {
            Era::Forest
        } else {
            self.era
        }
    }

    /// Replace `era` with the era actually used, warning if it changes
    pub fn resolve_era(&mut self) -> Era {
        let era = self.effective_era();
        if era != self.era {
            tracing::warn!(
                "Era {} needs the extension pack, using {}",
                self.era.name(),
                era.name()
            );
            self.era = era;
        }
        era
    }
}

/// Tile size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Root holding the `sprites/` and tileset directories
    pub data_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Top-level editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Version for future migrations
    pub version: u32,
    /// Seeds the editor's random source; drawn from entropy when absent
    pub seed: Option<u64>,
    pub map: MapConfig,
    pub tiles: TileConfig,
    pub assets: AssetConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            seed: None,
            map: MapConfig::default(),
            tiles: TileConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Map size in tiles
    pub fn map_size(&self) -> (u32, u32) {
        self.map.dimensions.size()
    }
}
