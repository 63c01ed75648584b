//! Corner-based terrain autotiling for Warcraft II maps
//!
//! Every map tile is described by the terrain at its four corners. This
//! crate decides which tile graphic draws a given set of corners, and goes
//! back from a tile code to the corners it draws.
//!
//! # Features
//! - Neighborhood predicates (water, coast, grass, walls, walkability)
//! - Ordered rule chain from corners to a packed 16-bit tile code
//! - Inverse decomposition of tile codes
//! - Adjacency legality checks and conflict resolution for edits
//! - Action and movement map values
//!
//! # Example
//!
//! ```rust
//! use war2edit_tile::{calculate, decompose, Corners, Era, Terrain};
//!
//! let g = Terrain::LIGHT_GROUND;
//! let corners = Corners::new(g, g, g, Terrain::LIGHT_WATER);
//!
//! let code = calculate(&corners, 3, Era::Forest);
//! let back = decompose(code).unwrap();
//! assert_eq!(back.corners, corners);
//! assert_eq!(back.seed, 3);
//! ```
//!
//! This crate has no I/O and no global state.

pub mod classify;
pub mod codec;
pub mod compat;
pub mod gameplay;
pub mod propagate;
pub mod shape;
pub mod terrain;

// Re-export main types at crate root
pub use codec::{
    calculate, classify as classify_shape, constructible_catalog, decompose, mask_calculate,
    random_seed, renderable_codes, variant_count, Classification, Decomposed, Rule, RULES,
};
pub use compat::{compatible, conflict_resolve, fragments_compatible, precedence};
pub use gameplay::{action_get, movement_get};
pub use propagate::{Propagate, Propagation};
pub use shape::{Boundary, CornerMask, Shape, ShapeClass, TileCode, VARIANT_LIMIT};
pub use terrain::{
    Corner, Corners, Era, Terrain, TerrainBrush, TerrainKind, Wall, WallRace, WallState,
};
