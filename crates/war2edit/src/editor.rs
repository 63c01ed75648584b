//! Terrain painting
//!
//! Painting a tile sets its four corners to one terrain. The eight tiles
//! around it share some of those corners, so each gets a [`Propagation`]:
//! its shared corners take the new terrain, and any other corner that cannot
//! sit next to it is either overwritten (the new terrain wins the conflict)
//! or the neighbor is left alone (the old terrain wins). Every tile that
//! changes is recalculated with a fresh decorative seed and redrawn.

use rand::Rng;
use serde::{Deserialize, Serialize};
use war2edit_core::{Bitmap, BitmapError, EditorConfig, TextureSource};
use war2edit_tile::{
    action_get, calculate, constructible_catalog, decompose, movement_get, random_seed, Corners,
    Era, Propagate, Propagation, Terrain, TerrainBrush, TileCode,
};

/// A tile written by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWrite {
    pub x: u32,
    pub y: u32,
    pub code: TileCode,
}

/// What a single paint stroke did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintReport {
    pub x: u32,
    pub y: u32,
    /// Terrain actually painted, after resolving a random brush
    pub terrain: Terrain,
    /// The painted tile first, then each in-bounds neighbor
    pub propagations: Vec<Propagation>,
    pub writes: Vec<TileWrite>,
    /// Writes whose texture was missing; their grid cell is still updated
    pub missing_textures: usize,
    /// Writes whose texture had the wrong size; their grid cell is still updated
    #[serde(default)]
    pub bad_textures: usize,
}

impl PaintReport {
    /// Neighbors left untouched because their terrain outranked the edit
    pub fn rejected(&self) -> impl Iterator<Item = &Propagation> {
        self.propagations.iter().filter(|p| !p.valid)
    }
}

/// Map being edited: the composited bitmap, its textures and random source
pub struct Editor<T: TextureSource, R: Rng> {
    era: Era,
    bitmap: Bitmap,
    textures: T,
    rng: R,
}

impl<T: TextureSource, R: Rng> Editor<T, R> {
    /// Create a map of the configured size filled with random grass and ground
    pub fn new(config: &EditorConfig, mut textures: T, mut rng: R) -> Result<Self, BitmapError> {
        let era = config.map.effective_era();
        if era != config.map.era {
            tracing::warn!(
                "Era {} needs the extension pack, using {}",
                config.map.era.name(),
                era.name()
            );
        }
        let (width, height) = config.map_size();
        let catalog = constructible_catalog(era);

        let bitmap = Bitmap::add(
            width,
            height,
            config.tiles.width,
            config.tiles.height,
            &mut textures,
            &catalog,
            &mut rng,
        )?;
        tracing::info!("Created {}x{} {} map", width, height, era.name());

        Ok(Self {
            era,
            bitmap,
            textures,
            rng,
        })
    }

    pub fn era(&self) -> Era {
        self.era
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn textures(&self) -> &T {
        &self.textures
    }

    /// Corners drawn by the tile at `(x, y)`
    pub fn corners(&self, x: u32, y: u32) -> Option<Corners> {
        self.bitmap
            .tile(x, y)
            .and_then(decompose)
            .map(|decomposed| decomposed.corners)
    }

    /// Paint `brush` on the tile at `(x, y)` and blend it into its neighbors
    pub fn paint(
        &mut self,
        x: u32,
        y: u32,
        brush: TerrainBrush,
    ) -> Result<PaintReport, BitmapError> {
        if !self.bitmap.contains(x, y) {
            let (width, height) = self.bitmap.map_size();
            return Err(BitmapError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        let terrain = brush.resolve(&mut self.rng);

        let current = self.corners(x, y).unwrap_or(Corners::uniform(terrain));
        let mut propagations = vec![Propagation::compute(x, y, Propagate::FULL, current, terrain)];

        // walls occupy a single tile and never blend
        if !terrain.is_wall() {
            for prop in Propagate::AROUND {
                let (dx, dy) = prop.offset();
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if !self.bitmap.contains(nx, ny) {
                    continue;
                }
                let Some(existing) = self.corners(nx, ny) else {
                    tracing::warn!("Tile ({}, {}) has no decodable code, skipped", nx, ny);
                    continue;
                };
                propagations.push(Propagation::compute(nx, ny, prop, existing, terrain));
            }
        }

        let mut writes = Vec::with_capacity(propagations.len());
        let mut missing_textures = 0;
        let mut bad_textures = 0;
        for p in &propagations {
            if !p.valid {
                tracing::debug!("Kept ({}, {}): existing terrain wins", p.x, p.y);
                continue;
            }
            if p.prop != Propagate::FULL && self.corners(p.x, p.y) == Some(p.corners) {
                continue;
            }
            let code = calculate(&p.corners, random_seed(&mut self.rng), self.era);
            // the cell is in bounds, so only the redraw can fail
            match self.bitmap.tile_set(p.x, p.y, code, &mut self.textures) {
                Ok(()) => {}
                Err(BitmapError::MissingTexture(_)) => missing_textures += 1,
                Err(e) => {
                    tracing::warn!("Tile ({}, {}) not redrawn: {}", p.x, p.y, e);
                    bad_textures += 1;
                }
            }
            writes.push(TileWrite {
                x: p.x,
                y: p.y,
                code,
            });
        }

        tracing::debug!(
            "Painted {:?} at ({}, {}): {} tiles written",
            terrain,
            x,
            y,
            writes.len()
        );

        Ok(PaintReport {
            x,
            y,
            terrain,
            propagations,
            writes,
            missing_textures,
            bad_textures,
        })
    }

    /// Cover the whole map with one terrain. Returns the number of tiles
    /// whose texture was missing or the wrong size.
    pub fn fill(&mut self, terrain: Terrain) -> usize {
        let (width, height) = self.bitmap.map_size();
        let corners = Corners::uniform(terrain);
        let mut undrawn = 0;

        for y in 0..height {
            for x in 0..width {
                let code = calculate(&corners, random_seed(&mut self.rng), self.era);
                if let Err(e) = self.bitmap.tile_set(x, y, code, &mut self.textures) {
                    if !matches!(e, BitmapError::MissingTexture(_)) {
                        tracing::warn!("Tile ({}, {}) not redrawn: {}", x, y, e);
                    }
                    undrawn += 1;
                }
            }
        }
        undrawn
    }

    /// Action map values, row-major
    pub fn action_map(&self) -> Vec<u16> {
        self.gameplay_map(action_get)
    }

    /// Movement map values, row-major
    pub fn movement_map(&self) -> Vec<u16> {
        self.gameplay_map(movement_get)
    }

    fn gameplay_map(&self, value: fn(&Corners) -> u16) -> Vec<u16> {
        let (width, height) = self.bitmap.map_size();
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let corners = self.corners(x, y).unwrap_or(Corners::uniform(Terrain::NONE));
                out.push(value(&corners));
            }
        }
        out
    }
}
