//! Unit and building sprites
//!
//! Sprites live in archives under the data directory: one archive for all
//! units and one building archive per era. [`SpriteManager`] opens them on
//! demand (never twice), derives the lookup key for a unit, era and facing,
//! and caches every decoded sprite by key until [`SpriteManager::shutdown`].
//!
//! Only west-facing graphics are missing from the archives: they are drawn
//! by mirroring the matching east-facing sprite, which is what the `flip`
//! flag returned by [`SpriteManager::get`] asks for.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use war2edit_tile::Era;

/// Error type for sprite loading failures
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("Failed to open archive {}: {source}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Archive not open: {0}")]
    ArchiveNotOpen(&'static str),
    #[error("Failed to load sprite for key \"{0}\"")]
    SpriteLoad(String),
    #[error("Icons are not supported (unit {0})")]
    Icon(String),
}

/// Decoded RGBA8 sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Facing of a unit sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::North,
        Orientation::NorthEast,
        Orientation::East,
        Orientation::SouthEast,
        Orientation::South,
        Orientation::SouthWest,
        Orientation::West,
        Orientation::NorthWest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Random facing for a freshly placed unit. Never north-west.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Orientation::NorthWest.index())]
    }

    /// Facing stored in the archive, and whether it must be mirrored
    pub fn stored(self) -> (Orientation, bool) {
        match self {
            Orientation::SouthWest => (Orientation::SouthEast, true),
            Orientation::West => (Orientation::East, true),
            Orientation::NorthWest => (Orientation::NorthEast, true),
            other => (other, false),
        }
    }
}

/// Which view of a unit is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteInfo {
    Icon,
    Facing(Orientation),
}

impl From<Orientation> for SpriteInfo {
    fn from(orientation: Orientation) -> Self {
        SpriteInfo::Facing(orientation)
    }
}

/// How a unit's sprites are keyed in the archives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    /// Per-era building archive, no facing
    Building,
    /// Shared units archive, one sprite per facing
    Unit,
    /// Units archive, but drawn differently in each era (critters, sea units)
    EraUnit,
    /// Player start markers, a single sprite
    StartLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitKey<'a> {
    pub name: &'a str,
    pub class: UnitClass,
}

impl<'a> UnitKey<'a> {
    pub const fn new(name: &'a str, class: UnitClass) -> Self {
        Self { name, class }
    }
}

/// Archive key of a sprite and whether it must be drawn mirrored
pub fn sprite_key(
    unit: UnitKey<'_>,
    era: Era,
    info: SpriteInfo,
) -> Result<(String, bool), SpriteError> {
    if unit.class == UnitClass::Building {
        return Ok((format!("{}/{}", era.name(), unit.name), false));
    }
    let SpriteInfo::Facing(facing) = info else {
        return Err(SpriteError::Icon(unit.name.to_string()));
    };
    let (orient, flip) = facing.stored();
    let key = match unit.class {
        UnitClass::EraUnit => format!("{}/{}/{}", unit.name, era.name(), orient.index()),
        UnitClass::StartLocation => format!("{}/0", unit.name),
        _ => format!("{}/{}", unit.name, orient.index()),
    };
    Ok((key, flip))
}

/// An opened sprite archive
pub trait SpriteArchive {
    fn read(&self, key: &str) -> Option<Sprite>;
}

/// Opens archives found under the data directory
pub trait ArchiveOpener {
    type Archive: SpriteArchive;

    fn open(&mut self, path: &Path) -> std::io::Result<Self::Archive>;
}

/// Relative path of the units archive
pub const UNITS_ARCHIVE: &str = "sprites/units/units.eet";

/// Relative path of an era's building archive
pub fn buildings_archive(era: Era) -> PathBuf {
    PathBuf::from(format!("sprites/buildings/{}.eet", era.name()))
}

/// Owns the opened archives and the sprite cache
pub struct SpriteManager<O: ArchiveOpener> {
    opener: O,
    data_dir: PathBuf,
    units: Option<O::Archive>,
    buildings: [Option<O::Archive>; 4],
    cache: HashMap<String, Arc<Sprite>>,
}

impl<O: ArchiveOpener> fmt::Debug for SpriteManager<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteManager")
            .field("data_dir", &self.data_dir)
            .field("units_open", &self.units.is_some())
            .field(
                "buildings_open",
                &self.buildings.iter().map(Option::is_some).collect::<Vec<_>>(),
            )
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl<O: ArchiveOpener> SpriteManager<O> {
    pub fn new(opener: O, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            opener,
            data_dir: data_dir.into(),
            units: None,
            buildings: [None, None, None, None],
            cache: HashMap::new(),
        }
    }

    /// Open the units archive. Calling it again is a no-op.
    pub fn init(&mut self) -> Result<(), SpriteError> {
        self.units_open().map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.units.is_some()
    }

    /// Close every archive and drop the cache
    pub fn shutdown(&mut self) {
        let buildings = self.buildings.iter().filter(|b| b.is_some()).count();
        self.units = None;
        self.buildings = [None, None, None, None];
        self.cache.clear();
        tracing::debug!("Closed sprite archives ({} building archives)", buildings);
    }

    fn open_archive(&mut self, relative: &Path) -> Result<O::Archive, SpriteError> {
        let path = self.data_dir.join(relative);
        match self.opener.open(&path) {
            Ok(archive) => {
                tracing::debug!("Opened sprite archive [{}]", path.display());
                Ok(archive)
            }
            Err(source) => {
                tracing::error!("Failed to open [{}]: {}", path.display(), source);
                Err(SpriteError::ArchiveOpen { path, source })
            }
        }
    }

    pub fn units_open(&mut self) -> Result<&O::Archive, SpriteError> {
        if self.units.is_none() {
            let archive = self.open_archive(Path::new(UNITS_ARCHIVE))?;
            self.units = Some(archive);
        }
        self.units.as_ref().ok_or(SpriteError::ArchiveNotOpen("units"))
    }

    pub fn buildings_open(&mut self, era: Era) -> Result<&O::Archive, SpriteError> {
        let idx = era.index();
        if self.buildings[idx].is_none() {
            let archive = self.open_archive(&buildings_archive(era))?;
            self.buildings[idx] = Some(archive);
        }
        self.buildings[idx]
            .as_ref()
            .ok_or(SpriteError::ArchiveNotOpen("buildings"))
    }

    /// Sprite for `unit` in `era`, plus whether to draw it mirrored.
    ///
    /// Unit sprites need [`init`](Self::init) first; building archives are
    /// opened on first use.
    pub fn get(
        &mut self,
        unit: UnitKey<'_>,
        era: Era,
        info: SpriteInfo,
    ) -> Result<(Arc<Sprite>, bool), SpriteError> {
        let (key, flip) = sprite_key(unit, era, info)?;
        if let Some(sprite) = self.cache.get(&key) {
            return Ok((Arc::clone(sprite), flip));
        }

        let archive = match unit.class {
            UnitClass::Building => self.buildings_open(era)?,
            _ => self.units.as_ref().ok_or(SpriteError::ArchiveNotOpen("units"))?,
        };
        let Some(sprite) = archive.read(&key) else {
            tracing::error!("Failed to load sprite for key [{}]", key);
            return Err(SpriteError::SpriteLoad(key));
        };

        let sprite = Arc::new(sprite);
        self.cache.insert(key, Arc::clone(&sprite));
        Ok((sprite, flip))
    }

    /// Number of sprites decoded so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }
}

/// Archive held in memory, keyed like the on-disk ones
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    sprites: HashMap<String, Sprite>,
}

impl MemoryArchive {
    pub fn insert(&mut self, key: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(key.into(), sprite);
    }
}

impl SpriteArchive for MemoryArchive {
    fn read(&self, key: &str) -> Option<Sprite> {
        self.sprites.get(key).cloned()
    }
}

/// Opener serving [`MemoryArchive`]s registered by path
#[derive(Debug, Clone, Default)]
pub struct MemoryOpener {
    archives: HashMap<PathBuf, MemoryArchive>,
    opened: Vec<PathBuf>,
}

impl MemoryOpener {
    pub fn with_archive(mut self, path: impl Into<PathBuf>, archive: MemoryArchive) -> Self {
        self.archives.insert(path.into(), archive);
        self
    }

    /// Every path passed to [`ArchiveOpener::open`], in order
    pub fn opened(&self) -> &[PathBuf] {
        &self.opened
    }
}

impl ArchiveOpener for MemoryOpener {
    type Archive = MemoryArchive;

    fn open(&mut self, path: &Path) -> std::io::Result<MemoryArchive> {
        self.opened.push(path.to_path_buf());
        self.archives.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such archive")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const FOOTMAN: UnitKey<'static> = UnitKey::new("footman", UnitClass::Unit);
    const FARM: UnitKey<'static> = UnitKey::new("human_farm", UnitClass::Building);
    const CRITTER: UnitKey<'static> = UnitKey::new("critter", UnitClass::EraUnit);
    const HUMAN_START: UnitKey<'static> = UnitKey::new("human_start", UnitClass::StartLocation);

    fn sprite(width: u32) -> Sprite {
        Sprite {
            width,
            height: width,
            pixels: vec![0; (width * width * 4) as usize],
        }
    }

    fn manager() -> SpriteManager<MemoryOpener> {
        let mut units = MemoryArchive::default();
        units.insert("footman/2", sprite(72));
        units.insert("footman/0", sprite(72));
        units.insert("critter/winter/3", sprite(32));

        let mut forest = MemoryArchive::default();
        forest.insert("forest/human_farm", sprite(64));

        let opener = MemoryOpener::default()
            .with_archive("/data/sprites/units/units.eet", units)
            .with_archive("/data/sprites/buildings/forest.eet", forest);
        SpriteManager::new(opener, "/data")
    }

    #[test]
    fn test_sprite_keys() {
        let key = |unit, era, o: Orientation| sprite_key(unit, era, o.into()).unwrap();

        assert_eq!(
            key(FARM, Era::Winter, Orientation::West),
            ("winter/human_farm".to_string(), false)
        );
        assert_eq!(
            key(FOOTMAN, Era::Forest, Orientation::South),
            ("footman/4".to_string(), false)
        );
        assert_eq!(
            key(CRITTER, Era::Swamp, Orientation::NorthEast),
            ("critter/swamp/1".to_string(), false)
        );
        assert_eq!(
            key(HUMAN_START, Era::Forest, Orientation::SouthEast),
            ("human_start/0".to_string(), false)
        );
    }

    #[test]
    fn test_west_facings_are_mirrored() {
        for (west, east) in [
            (Orientation::SouthWest, Orientation::SouthEast),
            (Orientation::West, Orientation::East),
            (Orientation::NorthWest, Orientation::NorthEast),
        ] {
            let (key, flip) = sprite_key(FOOTMAN, Era::Forest, west.into()).unwrap();
            assert!(flip);
            assert_eq!(key, format!("footman/{}", east.index()));
        }
    }

    #[test]
    fn test_icons_unsupported() {
        assert!(matches!(
            sprite_key(FOOTMAN, Era::Forest, SpriteInfo::Icon),
            Err(SpriteError::Icon(_))
        ));
    }

    #[test]
    fn test_random_orientation_never_north_west() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut seen = [false; 8];
        for _ in 0..2000 {
            seen[Orientation::random(&mut rng).index()] = true;
        }
        assert!(!seen[Orientation::NorthWest.index()]);
        assert!(seen[..7].iter().all(|&s| s));
    }

    #[test]
    fn test_archives_open_once() {
        let mut sprites = manager();
        sprites.init().unwrap();
        sprites.init().unwrap();
        sprites.buildings_open(Era::Forest).unwrap();
        sprites.buildings_open(Era::Forest).unwrap();

        assert_eq!(
            sprites.opener().opened(),
            &[
                PathBuf::from("/data/sprites/units/units.eet"),
                PathBuf::from("/data/sprites/buildings/forest.eet"),
            ]
        );
    }

    #[test]
    fn test_get_caches_by_key() {
        let mut sprites = manager();
        sprites.init().unwrap();

        let (east, flip) = sprites.get(FOOTMAN, Era::Forest, Orientation::East.into()).unwrap();
        assert!(!flip);
        let (west, flip) = sprites.get(FOOTMAN, Era::Forest, Orientation::West.into()).unwrap();
        assert!(flip);
        assert!(Arc::ptr_eq(&east, &west));
        assert_eq!(sprites.cached(), 1);

        let (farm, _) = sprites.get(FARM, Era::Forest, SpriteInfo::Icon).unwrap();
        assert_eq!(farm.width, 64);
        assert_eq!(sprites.cached(), 2);
    }

    #[test]
    fn test_get_failures() {
        let mut sprites = manager();
        assert!(matches!(
            sprites.get(FOOTMAN, Era::Forest, Orientation::North.into()),
            Err(SpriteError::ArchiveNotOpen("units"))
        ));

        sprites.init().unwrap();
        assert!(matches!(
            sprites.get(FOOTMAN, Era::Forest, Orientation::South.into()),
            Err(SpriteError::SpriteLoad(key)) if key == "footman/4"
        ));
        assert!(matches!(
            sprites.get(FARM, Era::Winter, Orientation::North.into()),
            Err(SpriteError::ArchiveOpen { .. })
        ));
    }

    #[test]
    fn test_shutdown_forgets_everything() {
        let mut sprites = manager();
        sprites.init().unwrap();
        sprites.get(CRITTER, Era::Winter, Orientation::SouthEast.into()).unwrap();
        sprites.shutdown();

        assert!(!sprites.is_initialized());
        assert_eq!(sprites.cached(), 0);
        sprites.init().unwrap();
        assert_eq!(sprites.opener().opened().len(), 2);
    }
}
