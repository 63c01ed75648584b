//! Neighborhood predicates
//!
//! Each predicate looks at the four corners of a tile and answers a single
//! yes/no question. None of them can fail: a neighborhood that does not fit
//! simply answers `false`.

use crate::terrain::{Corners, Terrain, TerrainKind};

/// All four corners are identical
pub fn solid(c: &Corners) -> bool {
    c.all(|t| t == c.tl)
}

/// Any corner is light or dark water
pub fn water(c: &Corners) -> bool {
    c.any(Terrain::is_water)
}

/// Every corner is water, light and dark may be mixed
pub fn deep_water(c: &Corners) -> bool {
    c.all(Terrain::is_water)
}

/// Every corner is exactly dark water
pub fn dark_water(c: &Corners) -> bool {
    c.all(|t| t.is(TerrainKind::DarkWater))
}

/// Light ground meets light water somewhere in the tile
pub fn coast(c: &Corners) -> bool {
    c.any(|t| t.is(TerrainKind::LightGround)) && c.any(|t| t.is(TerrainKind::LightWater))
}

/// Three light-ground corners around a single light-water corner
pub fn coast_corner(c: &Corners) -> bool {
    c.count(Terrain::LIGHT_GROUND) == 3 && c.count(Terrain::LIGHT_WATER) == 1
}

/// Uniform ground tile, light or dark
pub fn ground(c: &Corners) -> bool {
    solid(c) && c.tl.is_ground()
}

/// Any corner is light or dark ground
pub fn dirt(c: &Corners) -> bool {
    c.any(Terrain::is_ground)
}

/// Every corner is grass, light and dark may be mixed
pub fn grass(c: &Corners) -> bool {
    c.all(Terrain::is_grass)
}

/// Every corner is exactly light grass
pub fn light_grass(c: &Corners) -> bool {
    c.all(|t| t.is(TerrainKind::LightGrass))
}

pub fn trees(c: &Corners) -> bool {
    c.any(|t| t.is(TerrainKind::Trees))
}

pub fn rocks(c: &Corners) -> bool {
    c.any(|t| t.is(TerrainKind::Rocks))
}

/// Wall tile.
///
/// Only the top-left corner is inspected: wall tiles are always placed as a
/// full 2x2 block of the same wall, so the other three corners are assumed
/// to match. Use [`wall_has`] when that assumption cannot be relied upon.
pub fn wall(c: &Corners) -> bool {
    c.tl.is_wall()
}

/// Any corner is a wall
pub fn wall_has(c: &Corners) -> bool {
    c.any(Terrain::is_wall)
}

/// Nothing in the tile blocks a land unit
pub fn walkable(c: &Corners) -> bool {
    !wall(c) && !trees(c) && !rocks(c) && !water(c) && !coast(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Wall, WallRace, WallState};

    fn corners(tl: Terrain, tr: Terrain, bl: Terrain, br: Terrain) -> Corners {
        Corners::new(tl, tr, bl, br)
    }

    #[test]
    fn test_uniform_terrain_families() {
        for kind in TerrainKind::ALL {
            let c = Corners::uniform(Terrain::Plain(kind));
            assert!(solid(&c));
            assert_eq!(grass(&c), kind.is_grass(), "{kind:?}");
            assert_eq!(ground(&c), kind.is_ground(), "{kind:?}");
            assert_eq!(deep_water(&c), kind.is_water(), "{kind:?}");
            assert_eq!(light_grass(&c), kind == TerrainKind::LightGrass);
            assert_eq!(dark_water(&c), kind == TerrainKind::DarkWater);
        }
    }

    #[test]
    fn test_coast_corner_scenario() {
        let g = Terrain::LIGHT_GROUND;
        let c = corners(g, g, g, Terrain::LIGHT_WATER);
        assert!(coast_corner(&c));
        assert!(coast(&c));
        assert!(!walkable(&c));
    }

    #[test]
    fn test_straight_coast_is_not_corner() {
        let g = Terrain::LIGHT_GROUND;
        let w = Terrain::LIGHT_WATER;
        let c = corners(g, g, w, w);
        assert!(coast(&c));
        assert!(!coast_corner(&c));
    }

    #[test]
    fn test_dark_water_scenario() {
        let c = Corners::uniform(Terrain::DARK_WATER);
        assert!(dark_water(&c));
        assert!(deep_water(&c));
        assert!(water(&c));
    }

    #[test]
    fn test_mixed_water_is_deep_but_not_dark() {
        let d = Terrain::DARK_WATER;
        let c = corners(d, d, d, Terrain::LIGHT_WATER);
        assert!(deep_water(&c));
        assert!(!dark_water(&c));
        assert!(!coast(&c));
    }

    #[test]
    fn test_wall_checks_top_left_only() {
        let wall_terrain = Terrain::Wall(Wall::new(WallRace::Human, WallState::Closed));
        let g = Terrain::LIGHT_GRASS;

        assert!(wall(&corners(wall_terrain, g, g, g)));
        assert!(!wall(&corners(g, wall_terrain, g, g)));
        assert!(wall_has(&corners(g, wall_terrain, g, g)));
    }

    #[test]
    fn test_walkable_mixed_corners() {
        let (lg, dg) = (Terrain::LIGHT_GRASS, Terrain::DARK_GRASS);
        let (lgr, dgr) = (Terrain::LIGHT_GROUND, Terrain::DARK_GROUND);
        let wall_terrain = Terrain::Wall(Wall::new(WallRace::Orc, WallState::Open));

        assert!(walkable(&corners(lgr, lgr, dgr, dgr)));
        assert!(walkable(&corners(dg, lg, dg, lg)));
        assert!(walkable(&corners(lg, lgr, lg, lgr)));

        assert!(!walkable(&corners(lg, lg, lg, Terrain::TREES)));
        assert!(!walkable(&corners(Terrain::ROCKS, dgr, dgr, dgr)));
        let (lw, dw) = (Terrain::LIGHT_WATER, Terrain::DARK_WATER);
        assert!(!walkable(&corners(lgr, lgr, lgr, lw)));
        assert!(!walkable(&corners(dw, lw, lw, lw)));
        assert!(!walkable(&Corners::uniform(wall_terrain)));
    }

    #[test]
    fn test_walkable_plain_kinds() {
        for kind in TerrainKind::ALL {
            let c = Corners::uniform(Terrain::Plain(kind));
            let expected = !matches!(
                kind,
                TerrainKind::Trees
                    | TerrainKind::Rocks
                    | TerrainKind::LightWater
                    | TerrainKind::DarkWater
            );
            assert_eq!(walkable(&c), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_dirt_presence() {
        let c = corners(
            Terrain::LIGHT_GRASS,
            Terrain::LIGHT_GRASS,
            Terrain::DARK_GROUND,
            Terrain::LIGHT_GRASS,
        );
        assert!(dirt(&c));
        assert!(!ground(&c));
    }
}
