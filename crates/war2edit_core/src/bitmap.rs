//! Grid/bitmap compositor
//!
//! A [`Bitmap`] pairs the map's tile grid with an RGBA framebuffer of
//! `map_w * tile_w` by `map_h * tile_h` pixels. [`Bitmap::tile_set`] is the
//! only way to change either: it records the tile code in the grid and
//! copies the tile's texture into the framebuffer, row by row.
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::SmallRng, SeedableRng};
//! use war2edit_core::{Bitmap, TextureDictionary};
//! use war2edit_tile::{constructible_catalog, Era};
//!
//! let mut textures = TextureDictionary::procedural(Era::Forest, 32, 32);
//! let catalog = constructible_catalog(Era::Forest);
//! let mut rng = SmallRng::seed_from_u64(7);
//!
//! let bitmap = Bitmap::add(32, 32, 32, 32, &mut textures, &catalog, &mut rng).unwrap();
//! assert_eq!(bitmap.pixel_size(), (1024, 1024));
//! assert!(bitmap.grid().is_complete());
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use war2edit_tile::TileCode;

use crate::grid::Grid;
use crate::texture::{Texture, TextureSource, BYTES_PER_PIXEL};

/// Error type for compositor failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BitmapError {
    #[error("Invalid map dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Failed to allocate {what} ({bytes} bytes)")]
    Allocation { what: &'static str, bytes: usize },
    #[error("Tile ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("No texture for tile {0}")]
    MissingTexture(TileCode),
    #[error("Texture for tile {code} is {width}x{height}, expected {expected_width}x{expected_height}")]
    TextureSize {
        code: TileCode,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("Cannot initialize a map from an empty tile catalog")]
    EmptyCatalog,
}

/// Pixel rectangle of the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tile grid plus its rendered framebuffer
#[derive(Debug, Clone)]
pub struct Bitmap {
    grid: Grid,
    tile_width: u32,
    tile_height: u32,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    damage: Option<Region>,
}

impl Bitmap {
    /// Allocate an undrawn bitmap: every cell unset, framebuffer zeroed
    pub fn new(
        map_width: u32,
        map_height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, BitmapError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(BitmapError::InvalidDimensions {
                width: tile_width,
                height: tile_height,
            });
        }
        let too_big = BitmapError::InvalidDimensions {
            width: map_width,
            height: map_height,
        };
        let width = map_width.checked_mul(tile_width).ok_or(too_big.clone())?;
        let height = map_height.checked_mul(tile_height).ok_or(too_big.clone())?;
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(too_big)?;

        let grid = Grid::try_new(map_width, map_height)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| BitmapError::Allocation {
                what: "framebuffer",
                bytes,
            })?;
        pixels.resize(bytes, 0);

        tracing::debug!(
            "Allocated {}x{} map framebuffer ({}x{} pixels)",
            map_width,
            map_height,
            width,
            height
        );

        Ok(Self {
            grid,
            tile_width,
            tile_height,
            width,
            height,
            pixels,
            damage: None,
        })
    }

    /// Allocate a bitmap and fill every cell with a random code from `catalog`.
    ///
    /// Cells whose texture is missing keep their code but stay black; the
    /// count is logged once.
    pub fn add(
        map_width: u32,
        map_height: u32,
        tile_width: u32,
        tile_height: u32,
        textures: &mut impl TextureSource,
        catalog: &[TileCode],
        rng: &mut impl Rng,
    ) -> Result<Self, BitmapError> {
        if catalog.is_empty() {
            return Err(BitmapError::EmptyCatalog);
        }
        let mut bitmap = Self::new(map_width, map_height, tile_width, tile_height)?;

        let mut missing = 0usize;
        for y in 0..map_height {
            for x in 0..map_width {
                let Some(&code) = catalog.choose(rng) else {
                    return Err(BitmapError::EmptyCatalog);
                };
                match bitmap.tile_set(x, y, code, textures) {
                    Ok(()) => {}
                    Err(BitmapError::MissingTexture(_)) => missing += 1,
                    Err(e) => return Err(e),
                }
            }
        }

        if missing > 0 {
            tracing::warn!(
                "{} of {} tiles have no texture and were left blank",
                missing,
                map_width as usize * map_height as usize
            );
        }
        bitmap.damage = Some(bitmap.full_region());
        Ok(bitmap)
    }

    /// Record `code` at `(x, y)` and draw its texture.
    ///
    /// Out-of-bounds coordinates change nothing. When the texture is
    /// missing or has the wrong size the grid is still updated, but the
    /// framebuffer keeps its previous pixels.
    pub fn tile_set(
        &mut self,
        x: u32,
        y: u32,
        code: TileCode,
        textures: &mut impl TextureSource,
    ) -> Result<(), BitmapError> {
        if !self.grid.set(x, y, code) {
            return Err(self.out_of_bounds(x, y));
        }

        let Some(texture) = textures.texture(code) else {
            tracing::warn!("Failed to get texture for tile {} at ({}, {})", code, x, y);
            return Err(BitmapError::MissingTexture(code));
        };
        if texture.width() != self.tile_width || texture.height() != self.tile_height {
            return Err(BitmapError::TextureSize {
                code,
                width: texture.width(),
                height: texture.height(),
                expected_width: self.tile_width,
                expected_height: self.tile_height,
            });
        }

        let region = blit(
            &mut self.pixels,
            self.width,
            self.height,
            texture,
            x * self.tile_width,
            y * self.tile_height,
        );
        self.damage = region;
        Ok(())
    }

    /// Tile code at `(x, y)`; `None` when unset or out of bounds
    pub fn tile(&self, x: u32, y: u32) -> Option<TileCode> {
        self.grid.get(x, y)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.grid.contains(x, y)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// RGBA8 framebuffer, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Map size in tiles
    pub fn map_size(&self) -> (u32, u32) {
        (self.grid.width(), self.grid.height())
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Framebuffer size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Region redrawn by the last successful draw
    pub fn damage(&self) -> Option<Region> {
        self.damage
    }

    fn full_region(&self) -> Region {
        Region {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    fn out_of_bounds(&self, x: u32, y: u32) -> BitmapError {
        BitmapError::OutOfBounds {
            x,
            y,
            width: self.grid.width(),
            height: self.grid.height(),
        }
    }
}

/// Copy `texture` into the framebuffer at pixel `(at_x, at_y)`, one row at a
/// time. Rows and columns falling outside the framebuffer are dropped.
fn blit(
    pixels: &mut [u8],
    fb_width: u32,
    fb_height: u32,
    texture: &Texture,
    at_x: u32,
    at_y: u32,
) -> Option<Region> {
    if at_x >= fb_width || at_y >= fb_height {
        return None;
    }
    let width = texture.width().min(fb_width - at_x);
    let height = texture.height().min(fb_height - at_y);
    let stride = fb_width as usize * BYTES_PER_PIXEL;
    let row_bytes = width as usize * BYTES_PER_PIXEL;

    for row in 0..height {
        let start = (at_y + row) as usize * stride + at_x as usize * BYTES_PER_PIXEL;
        pixels[start..start + row_bytes].copy_from_slice(&texture.row(row)[..row_bytes]);
    }

    Some(Region {
        x: at_x,
        y: at_y,
        width,
        height,
    })
}
