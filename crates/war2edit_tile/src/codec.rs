//! Corner terrain <-> tile code conversion
//!
//! [`calculate`] turns the four corners of a tile into the code of the
//! graphic that draws them. The decision is an ordered rule list
//! ([`RULES`]): the first rule that recognises the neighborhood picks the
//! shape. The last rule always matches, so every neighborhood gets a tile,
//! even one the tileset has no exact graphic for.
//!
//! [`decompose`] goes the other way and returns the canonical corners of a
//! code. Several neighborhoods can alias onto one shape (a wall is decided by
//! its top-left corner alone, an impossible mix collapses to its dominant
//! terrains), so only the shape survives a round trip, not the exact input.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classify;
use crate::compat::conflict_resolve;
use crate::shape::{Boundary, CornerMask, Shape, ShapeClass, TileCode, VARIANT_LIMIT};
use crate::terrain::{Corners, Era, Terrain, TerrainKind};

/// A named step of the classification chain
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&Corners) -> Option<Shape>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Classification rules in priority order; first match wins
pub const RULES: [Rule; 7] = [
    Rule {
        name: "solid",
        apply: solid_rule,
    },
    Rule {
        name: "coast_corner",
        apply: coast_corner_rule,
    },
    Rule {
        name: "coast",
        apply: coast_rule,
    },
    Rule {
        name: "wall",
        apply: wall_rule,
    },
    Rule {
        name: "grass_blend",
        apply: grass_blend_rule,
    },
    Rule {
        name: "transition",
        apply: transition_rule,
    },
    Rule {
        name: "best_effort",
        apply: best_effort_rule,
    },
];

fn solid_rule(c: &Corners) -> Option<Shape> {
    if classify::solid(c) {
        c.tl.kind().map(Shape::Solid)
    } else {
        None
    }
}

fn coast_corner_rule(c: &Corners) -> Option<Shape> {
    if classify::coast_corner(c) {
        let mask = CornerMask::of(c, Terrain::LIGHT_WATER);
        Some(Shape::Boundary(Boundary::Coast, mask))
    } else {
        None
    }
}

fn coast_rule(c: &Corners) -> Option<Shape> {
    let shore_only = c.all(|t| t == Terrain::LIGHT_GROUND || t == Terrain::LIGHT_WATER);
    if classify::coast(c) && shore_only {
        let mask = CornerMask::of(c, Terrain::LIGHT_WATER);
        Some(Shape::Boundary(Boundary::Coast, mask))
    } else {
        None
    }
}

fn wall_rule(c: &Corners) -> Option<Shape> {
    match c.tl {
        Terrain::Wall(wall) if classify::wall(c) => Some(Shape::Wall(wall)),
        _ => None,
    }
}

fn grass_blend_rule(c: &Corners) -> Option<Shape> {
    if classify::grass(c) {
        let mask = CornerMask::of(c, Terrain::DARK_GRASS);
        Some(Shape::Boundary(Boundary::Grass, mask))
    } else {
        None
    }
}

fn transition_rule(c: &Corners) -> Option<Shape> {
    let [a, b] = match distinct(c).as_slice() {
        &[(a, _), (b, _)] => [a, b],
        _ => return None,
    };
    let boundary = Boundary::between(a, b)?;
    let mask = CornerMask::of(c, Terrain::Plain(boundary.upper()));
    Some(Shape::Boundary(boundary, mask))
}

/// Keep the most common terrain and the most common terrain that can
/// border it; every other corner collapses onto the dominant one.
fn best_effort_rule(c: &Corners) -> Option<Shape> {
    let counts = distinct(c);
    let dominant = pick_strongest(counts.iter().copied())?;

    let dominant_kind = match dominant {
        Terrain::Wall(wall) => return Some(Shape::Wall(wall)),
        Terrain::Plain(kind) => kind,
    };

    let secondary = pick_strongest(
        counts
            .iter()
            .copied()
            .filter(|&(t, _)| t != dominant && Boundary::between(t, dominant).is_some()),
    );

    let Some(secondary) = secondary else {
        return Some(Shape::Solid(dominant_kind));
    };

    let reduced = Corners::from_array(c.to_array().map(|t| {
        if t == secondary {
            secondary
        } else {
            dominant
        }
    }));
    let boundary = Boundary::between(dominant, secondary)?;
    let mask = CornerMask::of(&reduced, Terrain::Plain(boundary.upper()));
    Some(Shape::Boundary(boundary, mask))
}

/// Distinct corner terrains with their counts, in first-seen order
fn distinct(c: &Corners) -> Vec<(Terrain, usize)> {
    let mut seen: Vec<(Terrain, usize)> = Vec::with_capacity(4);
    for terrain in c.to_array() {
        match seen.iter_mut().find(|(t, _)| *t == terrain) {
            Some((_, count)) => *count += 1,
            None => seen.push((terrain, 1)),
        }
    }
    seen
}

/// Highest count wins, ties go to the terrain that wins conflicts
fn pick_strongest(candidates: impl Iterator<Item = (Terrain, usize)>) -> Option<Terrain> {
    candidates
        .reduce(|best, next| {
            let stronger = next.1 > best.1
                || (next.1 == best.1 && conflict_resolve(next.0, best.0) == next.0);
            if stronger {
                next
            } else {
                best
            }
        })
        .map(|(terrain, _)| terrain)
}

/// Result of running the rule chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Name of the rule that matched
    pub rule: &'static str,
    pub shape: Shape,
}

/// Run the rule chain and report which rule decided the shape
pub fn classify(c: &Corners) -> Classification {
    for rule in &RULES {
        if let Some(shape) = (rule.apply)(c) {
            return Classification {
                rule: rule.name,
                shape,
            };
        }
    }
    // best_effort always matches on a non-empty neighborhood
    Classification {
        rule: "best_effort",
        shape: Shape::Solid(TerrainKind::None),
    }
}

/// Number of interchangeable graphics per shape class, indexed by era
const VARIANTS: [[u8; 3]; 4] = [
    // solid, boundary, wall
    [12, 4, 1], // forest
    [12, 4, 1], // winter
    [10, 3, 1], // wasteland
    [10, 3, 1], // swamp
];

/// How many variants the era's tileset has for a shape class
pub fn variant_count(class: ShapeClass, era: Era) -> u8 {
    let count = VARIANTS[era.index()][class.index()];
    debug_assert!(count > 0 && count <= VARIANT_LIMIT);
    count
}

/// Tile code for the four corners; `seed` picks the decorative variant
pub fn calculate(c: &Corners, seed: u8, era: Era) -> TileCode {
    let shape = classify(c).shape;
    let variant = seed % variant_count(shape.class(), era);
    TileCode::new(shape, variant)
}

/// Tile code for the four corners without committing to a variant
pub fn mask_calculate(c: &Corners) -> TileCode {
    TileCode::new(classify(c).shape, 0)
}

/// Canonical corners and seed recovered from a tile code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposed {
    pub corners: Corners,
    pub seed: u8,
}

/// Inverse of [`calculate`]; `None` if the code encodes no shape
pub fn decompose(code: TileCode) -> Option<Decomposed> {
    let shape = code.shape()?;
    Some(Decomposed {
        corners: shape.corners(),
        seed: code.variant(),
    })
}

/// Draw a fresh decorative seed
pub fn random_seed(rng: &mut impl Rng) -> u8 {
    rng.gen()
}

/// Every solid grass and ground code of an era, all variants included
pub fn constructible_catalog(era: Era) -> Vec<TileCode> {
    let count = variant_count(ShapeClass::Solid, era);
    TerrainKind::CONSTRUCTIBLE
        .into_iter()
        .flat_map(|kind| (0..count).map(move |v| TileCode::new(Shape::Solid(kind), v)))
        .collect()
}

/// Every code the era's tileset can draw
pub fn renderable_codes(era: Era) -> Vec<TileCode> {
    let solids = TerrainKind::ALL.into_iter().map(Shape::Solid);
    let walls = crate::terrain::Wall::ALL.into_iter().map(Shape::Wall);
    let boundaries = Boundary::ALL.into_iter().flat_map(|boundary| {
        (1..15).map(move |bits| Shape::Boundary(boundary, CornerMask::new(bits)))
    });

    solids
        .chain(walls)
        .chain(boundaries)
        .flat_map(|shape| {
            let count = variant_count(shape.class(), era);
            (0..count).map(move |v| TileCode::new(shape, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::compatible;
    use crate::terrain::{Wall, WallRace, WallState};

    fn all_plain_quadruples() -> Vec<Corners> {
        let kinds: Vec<Terrain> = TerrainKind::ALL.into_iter().map(Terrain::Plain).collect();
        let mut out = Vec::new();
        for &tl in &kinds {
            for &tr in &kinds {
                for &bl in &kinds {
                    for &br in &kinds {
                        out.push(Corners::new(tl, tr, bl, br));
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_calculate_decompose_roundtrip() {
        let walls = Wall::ALL.into_iter().map(|w| Corners::uniform(Terrain::Wall(w)));
        for era in Era::ALL {
            for c in all_plain_quadruples().into_iter().chain(walls.clone()) {
                for seed in [0u8, 3, 7, 200, 255] {
                    let code = calculate(&c, seed, era);
                    let d = decompose(code).expect("calculate produced a malformed code");
                    assert_eq!(calculate(&d.corners, d.seed, era), code, "{c:?}");
                }
            }
        }
    }

    #[test]
    fn test_decomposed_corners_are_drawable() {
        for c in all_plain_quadruples() {
            let d = decompose(mask_calculate(&c)).unwrap();
            assert!(compatible(&d.corners), "{c:?} -> {:?}", d.corners);
        }
    }

    #[test]
    fn test_compatible_input_keeps_its_corners() {
        // a drawable tile mixes at most two terrains
        let drawable = all_plain_quadruples()
            .into_iter()
            .filter(|c| compatible(c) && distinct(c).len() <= 2);
        for c in drawable {
            let d = decompose(mask_calculate(&c)).unwrap();
            assert_eq!(d.corners, c);
        }
    }

    #[test]
    fn test_rule_priority_coast_corner() {
        let g = Terrain::LIGHT_GROUND;
        let c = Corners::new(g, Terrain::LIGHT_WATER, g, g);
        let class = classify(&c);
        assert_eq!(class.rule, "coast_corner");
        assert_eq!(
            class.shape,
            Shape::Boundary(Boundary::Coast, CornerMask::new(CornerMask::TR))
        );
    }

    #[test]
    fn test_rule_names_cover_each_case() {
        let g = Terrain::LIGHT_GROUND;
        let w = Terrain::LIGHT_WATER;
        let wall = Terrain::Wall(Wall::new(WallRace::Human, WallState::Open));
        let cases = [
            (Corners::uniform(Terrain::DARK_WATER), "solid"),
            (Corners::new(g, g, w, w), "coast"),
            (Corners::new(wall, g, g, g), "wall"),
            (
                Corners::new(
                    Terrain::DARK_GRASS,
                    Terrain::LIGHT_GRASS,
                    Terrain::LIGHT_GRASS,
                    Terrain::LIGHT_GRASS,
                ),
                "grass_blend",
            ),
            (
                Corners::new(
                    Terrain::TREES,
                    Terrain::TREES,
                    Terrain::LIGHT_GRASS,
                    Terrain::LIGHT_GRASS,
                ),
                "transition",
            ),
            (
                Corners::new(Terrain::LIGHT_GRASS, Terrain::DARK_WATER, g, Terrain::ROCKS),
                "best_effort",
            ),
        ];
        for (c, rule) in cases {
            assert_eq!(classify(&c).rule, rule, "{c:?}");
        }
    }

    #[test]
    fn test_best_effort_keeps_dominant_pair() {
        // three grass, one deep water: water cannot border grass
        let lg = Terrain::LIGHT_GRASS;
        let c = Corners::new(lg, lg, lg, Terrain::DARK_WATER);
        assert_eq!(classify(&c).shape, Shape::Solid(TerrainKind::LightGrass));

        // two trees, one grass, one water: trees dominate, grass can border them
        let t = Terrain::TREES;
        let c = Corners::new(t, t, lg, Terrain::LIGHT_WATER);
        assert_eq!(
            classify(&c).shape,
            Shape::Boundary(
                Boundary::Forest,
                CornerMask::new(CornerMask::TL | CornerMask::TR | CornerMask::BR)
            )
        );
    }

    #[test]
    fn test_best_effort_tie_uses_precedence() {
        let c = Corners::new(
            Terrain::LIGHT_WATER,
            Terrain::LIGHT_WATER,
            Terrain::LIGHT_GRASS,
            Terrain::LIGHT_GRASS,
        );
        // water outranks grass and grass cannot border it
        assert_eq!(classify(&c).shape, Shape::Solid(TerrainKind::LightWater));
    }

    #[test]
    fn test_seed_aliasing() {
        let c = Corners::uniform(Terrain::LIGHT_GRASS);
        let count = variant_count(ShapeClass::Solid, Era::Forest);
        assert_eq!(calculate(&c, 1, Era::Forest), calculate(&c, 1 + count, Era::Forest));
        assert_eq!(calculate(&c, 255, Era::Forest).variant(), 255 % count);
    }

    #[test]
    fn test_mask_calculate_has_no_variant() {
        let c = Corners::uniform(Terrain::DARK_GROUND);
        assert_eq!(mask_calculate(&c).variant(), 0);
        assert_eq!(mask_calculate(&c), calculate(&c, 99, Era::Winter).base());
    }

    #[test]
    fn test_decompose_rejects_garbage() {
        assert_eq!(decompose(TileCode(0)), None);
        assert_eq!(decompose(TileCode(0xffff)), None);
    }

    #[test]
    fn test_catalogs() {
        for era in Era::ALL {
            let catalog = constructible_catalog(era);
            let solid = variant_count(ShapeClass::Solid, era) as usize;
            assert_eq!(catalog.len(), TerrainKind::CONSTRUCTIBLE.len() * solid);

            let all = renderable_codes(era);
            assert!(catalog.iter().all(|code| all.contains(code)));
            assert!(all.iter().all(|code| decompose(*code).is_some()));
        }
    }
}
