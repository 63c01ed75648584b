//! Warcraft II map editor core
//!
//! Ties the autotiling rules of [`war2edit_tile`] to the map state of
//! [`war2edit_core`]: an [`Editor`] owns a composited map and paints terrain
//! on it, blending every stroke into the surrounding tiles.
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::SmallRng, SeedableRng};
//! use war2edit::{Editor, EditorConfig, TerrainBrush, TextureDictionary};
//! use war2edit_tile::Terrain;
//!
//! let config = EditorConfig::default();
//! let textures = TextureDictionary::procedural(config.map.era, 32, 32);
//! let mut editor = Editor::new(&config, textures, SmallRng::seed_from_u64(1)).unwrap();
//!
//! let report = editor.paint(4, 4, TerrainBrush::Terrain(Terrain::LIGHT_WATER)).unwrap();
//! assert_eq!(report.propagations.len(), 9);
//! ```

pub mod editor;

pub use editor::{Editor, PaintReport, TileWrite};

// Re-export the types a front end needs to drive an editor
pub use war2edit_core::{Bitmap, BitmapError, ConfigError, EditorConfig, TextureDictionary};
pub use war2edit_tile::{Era, Terrain, TerrainBrush};
