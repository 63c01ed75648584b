//! Map state and rendering for war2edit
//!
//! This crate holds everything between the autotiling rules of
//! `war2edit_tile` and a front end:
//! - [`Grid`]: one tile code per map cell
//! - [`Bitmap`]: the grid plus its composited RGBA framebuffer
//! - [`TextureSource`] / [`TextureDictionary`]: where tile graphics come from
//! - [`SpriteManager`]: unit and building sprites from lazily opened archives
//! - [`EditorConfig`]: TOML settings

pub mod bitmap;
pub mod config;
pub mod grid;
pub mod sprite;
pub mod texture;

pub use bitmap::{Bitmap, BitmapError, Region};
pub use config::{AssetConfig, ConfigError, EditorConfig, MapConfig, MapDimensions, TileConfig};
pub use grid::Grid;
pub use sprite::{
    sprite_key, ArchiveOpener, MemoryArchive, MemoryOpener, Orientation, Sprite, SpriteArchive,
    SpriteError, SpriteInfo, SpriteManager, UnitClass, UnitKey,
};
pub use texture::{Texture, TextureDictionary, TextureSource};
