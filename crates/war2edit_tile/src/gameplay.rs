//! Gameplay views of a tile
//!
//! The game keeps two per-tile maps next to the graphics: an action map
//! (what a unit may do on the tile) and a movement map (who may pass).
//! Both are derived from the corners alone, independently of the shape
//! the tile is drawn with.

use crate::classify;
use crate::terrain::Corners;

/// Action map values
pub mod action {
    pub const WATER: u16 = 0x0000;
    pub const LAND: u16 = 0x4000;
    pub const WALL: u16 = 0xfffb;
    pub const OBSTACLE: u16 = 0xfffd;
}

/// Movement map values
pub mod movement {
    pub const LAND: u16 = 0x0001;
    pub const COAST: u16 = 0x0002;
    pub const WATER: u16 = 0x0040;
    pub const OBSTACLE: u16 = 0x0081;
    pub const WALL: u16 = 0x008d;
}

pub fn action_get(c: &Corners) -> u16 {
    if classify::wall(c) {
        action::WALL
    } else if classify::trees(c) || classify::rocks(c) {
        action::OBSTACLE
    } else if classify::water(c) {
        action::WATER
    } else {
        action::LAND
    }
}

pub fn movement_get(c: &Corners) -> u16 {
    if classify::walkable(c) {
        movement::LAND
    } else if classify::wall(c) {
        movement::WALL
    } else if classify::trees(c) || classify::rocks(c) {
        movement::OBSTACLE
    } else if classify::coast(c) {
        movement::COAST
    } else {
        movement::WATER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Terrain, Wall, WallRace, WallState};

    #[test]
    fn test_action_map() {
        assert_eq!(action_get(&Corners::uniform(Terrain::LIGHT_GRASS)), action::LAND);
        assert_eq!(action_get(&Corners::uniform(Terrain::DARK_WATER)), action::WATER);
        assert_eq!(action_get(&Corners::uniform(Terrain::TREES)), action::OBSTACLE);

        let wall = Terrain::Wall(Wall::new(WallRace::Human, WallState::Closed));
        assert_eq!(action_get(&Corners::uniform(wall)), action::WALL);
    }

    #[test]
    fn test_movement_map() {
        let g = Terrain::LIGHT_GROUND;
        assert_eq!(movement_get(&Corners::uniform(g)), movement::LAND);
        assert_eq!(
            movement_get(&Corners::new(g, g, g, Terrain::LIGHT_WATER)),
            movement::COAST
        );
        assert_eq!(
            movement_get(&Corners::uniform(Terrain::LIGHT_WATER)),
            movement::WATER
        );
        assert_eq!(
            movement_get(&Corners::new(g, Terrain::ROCKS, g, g)),
            movement::OBSTACLE
        );
    }

    #[test]
    fn test_walkable_tiles_move_as_land() {
        for a in Terrain::all() {
            let c = Corners::new(a, Terrain::LIGHT_GRASS, Terrain::LIGHT_GRASS, a);
            let land = movement_get(&c) == movement::LAND;
            assert_eq!(land, classify::walkable(&c), "{c:?}");
        }
    }
}
