//! Tile textures
//!
//! The compositor never decodes tileset files itself: it asks a
//! [`TextureSource`] for the RGBA pixels of a tile code. [`TextureDictionary`]
//! is the in-memory source used by the editor. It is either filled by hand
//! or generated from the decomposed corners of every renderable code, each
//! quadrant painted in its terrain's colour.

use std::collections::HashMap;

use war2edit_tile::{
    decompose, renderable_codes, Corners, Era, Terrain, TerrainKind, TileCode, WallRace,
    WallState,
};

/// Bytes per pixel in every texture and framebuffer
pub const BYTES_PER_PIXEL: usize = 4;

/// RGBA8 pixels of one tile, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Texture {
    /// Wrap raw RGBA pixels; `None` if the buffer length does not match
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Texture filled with a single colour
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgba.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels of row `y`
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * BYTES_PER_PIXEL;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }
}

/// Where the compositor fetches tile graphics from
pub trait TextureSource {
    /// Texture drawing `code`, or `None` when the tileset has no such tile
    fn texture(&mut self, code: TileCode) -> Option<&Texture>;
}

/// In-memory texture cache keyed by tile code
#[derive(Debug, Clone, Default)]
pub struct TextureDictionary {
    tile_width: u32,
    tile_height: u32,
    textures: HashMap<TileCode, Texture>,
}

impl TextureDictionary {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            textures: HashMap::new(),
        }
    }

    /// Dictionary holding a generated texture for every code the era can draw
    pub fn procedural(era: Era, tile_width: u32, tile_height: u32) -> Self {
        let mut dict = Self::new(tile_width, tile_height);
        for code in renderable_codes(era) {
            if let Some(texture) = dict.generate(code, era) {
                dict.insert(code, texture);
            }
        }
        tracing::debug!(
            "Generated {} {} textures of {}x{}",
            dict.len(),
            era.name(),
            tile_width,
            tile_height
        );
        dict
    }

    fn generate(&self, code: TileCode, era: Era) -> Option<Texture> {
        let decomposed = decompose(code)?;
        Some(quadrant_texture(
            &decomposed.corners,
            code.variant(),
            era,
            self.tile_width,
            self.tile_height,
        ))
    }

    pub fn insert(&mut self, code: TileCode, texture: Texture) -> Option<Texture> {
        self.textures.insert(code, texture)
    }

    pub fn remove(&mut self, code: TileCode) -> Option<Texture> {
        self.textures.remove(&code)
    }

    pub fn get(&self, code: TileCode) -> Option<&Texture> {
        self.textures.get(&code)
    }

    pub fn contains(&self, code: TileCode) -> bool {
        self.textures.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }
}

impl TextureSource for TextureDictionary {
    fn texture(&mut self, code: TileCode) -> Option<&Texture> {
        self.textures.get(&code)
    }
}

/// Base colour of a terrain before era tinting
pub fn terrain_color(terrain: Terrain) -> [u8; 3] {
    match terrain {
        Terrain::Plain(kind) => match kind {
            TerrainKind::None => [0, 0, 0],
            TerrainKind::Trees => [34, 85, 34],
            TerrainKind::LightGrass => [96, 160, 64],
            TerrainKind::DarkGrass => [64, 120, 40],
            TerrainKind::LightGround => [170, 130, 80],
            TerrainKind::DarkGround => [120, 90, 55],
            TerrainKind::LightWater => [60, 110, 200],
            TerrainKind::DarkWater => [30, 60, 150],
            TerrainKind::Rocks => [110, 110, 110],
        },
        Terrain::Wall(wall) => match (wall.race, wall.state) {
            (WallRace::Human, WallState::Closed) => [190, 190, 200],
            (WallRace::Human, WallState::Open) => [150, 150, 160],
            (WallRace::Orc, WallState::Closed) => [120, 60, 50],
            (WallRace::Orc, WallState::Open) => [90, 45, 40],
        },
    }
}

fn tint(rgb: [u8; 3], era: Era, variant: u8) -> [u8; 4] {
    let [r, g, b] = rgb.map(u16::from);
    let (r, g, b) = match era {
        Era::Forest => (r, g, b),
        Era::Winter => ((r + 2 * 255) / 3, (g + 2 * 255) / 3, (b + 2 * 255) / 3),
        Era::Wasteland => ((r * 5 / 4).min(255), g * 7 / 8, b * 3 / 4),
        Era::Swamp => (r * 3 / 4, g * 7 / 8, b * 3 / 4),
    };
    // odd variants are slightly darker so decorations stay distinguishable
    let shade = u16::from(variant % 4) * 4;
    [
        r.saturating_sub(shade) as u8,
        g.saturating_sub(shade) as u8,
        b.saturating_sub(shade) as u8,
        255,
    ]
}

/// Texture with each quadrant painted in the colour of its corner terrain
pub fn quadrant_texture(
    corners: &Corners,
    variant: u8,
    era: Era,
    width: u32,
    height: u32,
) -> Texture {
    let colors = corners
        .to_array()
        .map(|terrain| tint(terrain_color(terrain), era, variant));
    let half_w = width / 2;
    let half_h = height / 2;

    let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
    for y in 0..height {
        for x in 0..width {
            // corner order is TL, TR, BL, BR
            let idx = usize::from(y >= half_h) * 2 + usize::from(x >= half_w);
            pixels.extend_from_slice(&colors[idx]);
        }
    }

    Texture {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use war2edit_tile::calculate;

    #[test]
    fn test_texture_length_checked() {
        assert!(Texture::new(2, 2, vec![0; 16]).is_some());
        assert!(Texture::new(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_solid_texture_rows() {
        let tex = Texture::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(tex.row(1), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_quadrants_follow_corners() {
        let corners = Corners::new(
            Terrain::LIGHT_GRASS,
            Terrain::LIGHT_GRASS,
            Terrain::LIGHT_GRASS,
            Terrain::DARK_WATER,
        );
        let tex = quadrant_texture(&corners, 0, Era::Forest, 4, 4);
        let water = tint(terrain_color(Terrain::DARK_WATER), Era::Forest, 0);
        let grass = tint(terrain_color(Terrain::LIGHT_GRASS), Era::Forest, 0);

        assert_eq!(&tex.row(3)[12..16], &water);
        assert_eq!(&tex.row(3)[0..4], &grass);
        assert_eq!(&tex.row(0)[12..16], &grass);
    }

    #[test]
    fn test_procedural_covers_catalog() {
        let mut dict = TextureDictionary::procedural(Era::Winter, 8, 8);
        assert_eq!(dict.len(), renderable_codes(Era::Winter).len());

        let code = calculate(&Corners::uniform(Terrain::DARK_GROUND), 7, Era::Winter);
        let tex = dict.texture(code).unwrap();
        assert_eq!((tex.width(), tex.height()), (8, 8));
    }

    #[test]
    fn test_missing_code() {
        let mut dict = TextureDictionary::new(32, 32);
        assert!(dict.is_empty());
        assert!(dict.texture(TileCode(0x0120)).is_none());

        dict.insert(TileCode(0x0120), Texture::solid(32, 32, [0; 4]));
        assert!(dict.contains(TileCode(0x0120)));
        assert!(dict.remove(TileCode(0x0120)).is_some());
        assert!(dict.texture(TileCode(0x0120)).is_none());
    }
}
