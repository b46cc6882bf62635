//! Tile catalog, slot layout, and static configuration.
//!
//! This module contains:
//! - Planet types, including the seven home planet types
//! - The ten fixed sector tiles and their planet placements
//! - The ten board slots and the two shift vectors that place them
//! - `BoardLayout`, the validated bundle of all of the above
//!
//! The built-in layout is validated once per process and shared as `&'static`.

use crate::hex::CubeCoord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use thiserror::Error;

/// Radius of a single sector tile. Every tile is a radius-2 hexagon of 19 cells.
pub const TILE_RADIUS: u32 = 2;

/// Number of cells in one tile.
pub const TILE_CELLS: usize = 19;

/// Number of tiles (and slots) on a board.
pub const TILE_COUNT: usize = 10;

/// Planet type of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanetType {
    Terra,
    Desert,
    Swamp,
    Oxide,
    Volcanic,
    Ice,
    Titanium,
    Gaia,
    Transdim,
    /// Deep space, no planet
    Empty,
}

impl PlanetType {
    /// Planet types a faction can start on. These are subject to the reachability rule.
    pub const HOME: [PlanetType; 7] = [
        PlanetType::Terra,
        PlanetType::Desert,
        PlanetType::Swamp,
        PlanetType::Oxide,
        PlanetType::Volcanic,
        PlanetType::Ice,
        PlanetType::Titanium,
    ];

    pub fn is_empty(&self) -> bool {
        matches!(self, PlanetType::Empty)
    }

    pub fn is_home(&self) -> bool {
        Self::HOME.contains(self)
    }

    /// Lowercase tag, as used in catalogs and serialized boards
    pub fn name(&self) -> &'static str {
        match self {
            PlanetType::Terra => "terra",
            PlanetType::Desert => "desert",
            PlanetType::Swamp => "swamp",
            PlanetType::Oxide => "oxide",
            PlanetType::Volcanic => "volcanic",
            PlanetType::Ice => "ice",
            PlanetType::Titanium => "titanium",
            PlanetType::Gaia => "gaia",
            PlanetType::Transdim => "transdim",
            PlanetType::Empty => "empty",
        }
    }
}

impl std::fmt::Display for PlanetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A planet on a tile, in tile-local offset coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlanet {
    pub x: i32,
    pub y: i32,
    pub planet: PlanetType,
}

impl TilePlanet {
    pub const fn new(x: i32, y: i32, planet: PlanetType) -> Self {
        Self { x, y, planet }
    }

    /// Position relative to the tile center, unrotated
    pub fn coord(&self) -> CubeCoord {
        CubeCoord::from_offset(self.x, self.y)
    }
}

/// One of the sector tiles: a number and its non-empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub number: u8,
    pub planets: Vec<TilePlanet>,
}

impl TileSpec {
    /// Planet placements in cube coordinates, rotated clockwise `rotation` times.
    pub fn planet_cells(&self, rotation: u8) -> impl Iterator<Item = (CubeCoord, PlanetType)> + '_ {
        self.planets
            .iter()
            .map(move |p| (p.coord().rotate_cw(rotation), p.planet))
    }

    /// The ten standard tiles.
    pub fn standard_catalog() -> Vec<TileSpec> {
        STANDARD_TILES
            .iter()
            .map(|(number, planets)| TileSpec {
                number: *number,
                planets: planets.to_vec(),
            })
            .collect()
    }
}

/// A board slot. The tile origin lands at `x * shift_x + y * shift_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub x: i32,
    pub y: i32,
}

impl Slot {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Errors in static configuration. These are programming errors and surface at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },

    #[error("Tile number {0} is outside 1..=10")]
    TileNumberOutOfRange(u8),

    #[error("Tile number {0} appears more than once")]
    DuplicateTile(u8),

    #[error("Tile {tile} uses the empty planet type at ({x}, {y})")]
    EmptyPlanet { tile: u8, x: i32, y: i32 },

    #[error("Tile {tile} places a planet at ({x}, {y}), outside the tile radius")]
    PlanetOutsideTile { tile: u8, x: i32, y: i32 },

    #[error("Tile {tile} places two planets on cell ({x}, {y})")]
    DuplicatePlanetCell { tile: u8, x: i32, y: i32 },

    #[error("Home planet type {planet} appears {count} times in the catalog, need at least 2")]
    HomePlanetUnpaired { planet: PlanetType, count: usize },

    #[error("Expected {expected} slots, found {found}")]
    WrongSlotCount { expected: usize, found: usize },

    #[error("Slot ({x}, {y}) appears more than once")]
    DuplicateSlot { x: i32, y: i32 },

    #[error("Slot ({x}, {y}) places its tile outside the coordinate range")]
    SlotOutOfRange { x: i32, y: i32 },

    #[error("Tiles at slots {a:?} and {b:?} overlap")]
    OverlappingSlots { a: Slot, b: Slot },

    #[error("Invalid balance rules: {0}")]
    InvalidRules(String),

    #[error("Iteration budget must be at least 1")]
    ZeroIterations,

    #[error("Invalid layout JSON: {0}")]
    Json(String),
}

/// Static board configuration: the tile catalog, slots, and shift vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardLayout {
    tiles: Vec<TileSpec>,
    slots: Vec<Slot>,
    shift_x: CubeCoord,
    shift_y: CubeCoord,
}

/// Wire form of a layout, validated into a `BoardLayout`.
#[derive(Deserialize)]
struct LayoutFile {
    tiles: Vec<TileSpec>,
    slots: Vec<Slot>,
    shift_x: CubeCoord,
    shift_y: CubeCoord,
}

impl BoardLayout {
    /// Build and validate a layout.
    pub fn new(
        mut tiles: Vec<TileSpec>,
        slots: Vec<Slot>,
        shift_x: CubeCoord,
        shift_y: CubeCoord,
    ) -> Result<Self, ConfigError> {
        validate_tiles(&tiles)?;
        tiles.sort_by_key(|t| t.number);

        let layout = Self {
            tiles,
            slots,
            shift_x,
            shift_y,
        };
        layout.validate_slots()?;
        Ok(layout)
    }

    /// Parse and validate a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: LayoutFile =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        Self::new(file.tiles, file.slots, file.shift_x, file.shift_y)
    }

    /// The built-in layout, validated on first use.
    pub fn standard() -> &'static BoardLayout {
        static STANDARD: OnceLock<BoardLayout> = OnceLock::new();
        STANDARD.get_or_init(|| {
            BoardLayout::new(
                TileSpec::standard_catalog(),
                STANDARD_SLOTS.to_vec(),
                TILE_SHIFT_X,
                TILE_SHIFT_Y,
            )
            .expect("built-in tile catalog is well-formed")
        })
    }

    /// Tiles, sorted by number
    pub fn tiles(&self) -> &[TileSpec] {
        &self.tiles
    }

    pub fn tile(&self, number: u8) -> Option<&TileSpec> {
        self.tiles.iter().find(|t| t.number == number)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn shift_x(&self) -> CubeCoord {
        self.shift_x
    }

    pub fn shift_y(&self) -> CubeCoord {
        self.shift_y
    }

    /// Absolute position of the origin of a tile placed at `slot`.
    ///
    /// Only meaningful for slots that pass `checked_translation`; the layout's own
    /// slots always do.
    pub fn translation(&self, slot: Slot) -> CubeCoord {
        self.shift_x * slot.x + self.shift_y * slot.y
    }

    /// Tile origin for `slot`, or `None` if it falls outside `CubeCoord::MAX_COMPONENT`.
    pub fn checked_translation(&self, slot: Slot) -> Option<CubeCoord> {
        let origin = self
            .shift_x
            .checked_mul(slot.x)?
            .checked_add(self.shift_y.checked_mul(slot.y)?)?;
        origin.in_range().then_some(origin)
    }

    fn validate_slots(&self) -> Result<(), ConfigError> {
        if self.slots.len() != TILE_COUNT {
            return Err(ConfigError::WrongSlotCount {
                expected: TILE_COUNT,
                found: self.slots.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut origins = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            if !seen.insert(*slot) {
                return Err(ConfigError::DuplicateSlot {
                    x: slot.x,
                    y: slot.y,
                });
            }
            let origin = self
                .checked_translation(*slot)
                .ok_or(ConfigError::SlotOutOfRange {
                    x: slot.x,
                    y: slot.y,
                })?;
            origins.push((*slot, origin));
        }

        // Two radius-2 hexagons are disjoint iff their centers are at least 5 apart.
        let min_gap = 2 * TILE_RADIUS + 1;
        for (i, (a, a_origin)) in origins.iter().enumerate() {
            for (b, b_origin) in &origins[i + 1..] {
                if a_origin.distance_to(b_origin) < min_gap {
                    return Err(ConfigError::OverlappingSlots { a: *a, b: *b });
                }
            }
        }
        Ok(())
    }
}

fn validate_tiles(tiles: &[TileSpec]) -> Result<(), ConfigError> {
    if tiles.len() != TILE_COUNT {
        return Err(ConfigError::WrongTileCount {
            expected: TILE_COUNT,
            found: tiles.len(),
        });
    }

    let mut numbers = HashSet::new();
    let mut home_counts: HashMap<PlanetType, usize> = HashMap::new();

    for tile in tiles {
        if tile.number == 0 || tile.number as usize > TILE_COUNT {
            return Err(ConfigError::TileNumberOutOfRange(tile.number));
        }
        if !numbers.insert(tile.number) {
            return Err(ConfigError::DuplicateTile(tile.number));
        }

        let mut cells = HashSet::new();
        for p in &tile.planets {
            if p.planet.is_empty() {
                return Err(ConfigError::EmptyPlanet {
                    tile: tile.number,
                    x: p.x,
                    y: p.y,
                });
            }
            let in_bounds = p.x.unsigned_abs() <= TILE_RADIUS && p.y.unsigned_abs() <= TILE_RADIUS;
            if !in_bounds || p.coord().length() > TILE_RADIUS {
                return Err(ConfigError::PlanetOutsideTile {
                    tile: tile.number,
                    x: p.x,
                    y: p.y,
                });
            }
            if !cells.insert(p.coord()) {
                return Err(ConfigError::DuplicatePlanetCell {
                    tile: tile.number,
                    x: p.x,
                    y: p.y,
                });
            }
            if p.planet.is_home() {
                *home_counts.entry(p.planet).or_default() += 1;
            }
        }
    }

    for planet in PlanetType::HOME {
        let count = home_counts.get(&planet).copied().unwrap_or(0);
        if count < 2 {
            return Err(ConfigError::HomePlanetUnpaired { planet, count });
        }
    }
    Ok(())
}

/// Shift between horizontally adjacent slots
pub const TILE_SHIFT_X: CubeCoord = CubeCoord::new(5, -2);
/// Shift between vertically adjacent slots
pub const TILE_SHIFT_Y: CubeCoord = CubeCoord::new(3, -5);

pub const STANDARD_SLOTS: [Slot; TILE_COUNT] = [
    Slot::new(0, 1),
    Slot::new(0, 2),
    Slot::new(1, 0),
    Slot::new(1, 1),
    Slot::new(1, 2),
    Slot::new(2, 0),
    Slot::new(2, 1),
    Slot::new(2, 2),
    Slot::new(3, 0),
    Slot::new(3, 1),
];

use PlanetType::{Desert, Gaia, Ice, Oxide, Swamp, Terra, Titanium, Transdim, Volcanic};

const fn p(x: i32, y: i32, planet: PlanetType) -> TilePlanet {
    TilePlanet::new(x, y, planet)
}

#[rustfmt::skip]
const STANDARD_TILES: [(u8, &[TilePlanet]); TILE_COUNT] = [
    (1, &[p(-2, 0, Desert), p(-1, -1, Swamp), p(0, 2, Oxide), p(1, -1, Terra), p(1, 1, Volcanic), p(2, 0, Transdim)]),
    (2, &[p(-1, -2, Volcanic), p(-1, 0, Swamp), p(-1, 1, Oxide), p(0, -2, Titanium), p(1, -1, Ice), p(1, 1, Transdim), p(2, 0, Desert)]),
    (3, &[p(-1, -1, Gaia), p(-1, 1, Terra), p(0, -2, Transdim), p(0, 2, Desert), p(1, 0, Ice), p(2, 0, Titanium)]),
    (4, &[p(-2, 0, Ice), p(-1, 0, Volcanic), p(0, -2, Titanium), p(0, -1, Oxide), p(1, 0, Swamp), p(2, 1, Terra)]),
    (5, &[p(-1, -1, Gaia), p(-1, 1, Volcanic), p(0, -2, Ice), p(0, 2, Desert), p(2, -1, Transdim), p(2, 0, Oxide)]),
    (6, &[p(-1, -1, Swamp), p(0, 1, Gaia), p(1, -2, Transdim), p(1, -1, Terra), p(1, 1, Transdim), p(2, 1, Desert)]),
    (7, &[p(-2, -1, Transdim), p(-1, 0, Gaia), p(0, -1, Oxide), p(0, 2, Titanium), p(1, -2, Swamp), p(1, 0, Gaia)]),
    (8, &[p(-1, 0, Volcanic), p(-1, 1, Transdim), p(0, -2, Terra), p(0, -1, Ice), p(1, 0, Titanium), p(2, -1, Transdim)]),
    (9, &[p(-2, 1, Swamp), p(-1, -2, Volcanic), p(-1, 0, Titanium), p(1, -2, Transdim), p(1, 0, Gaia), p(2, -1, Ice)]),
    (10, &[p(-2, 1, Terra), p(-1, -1, Desert), p(-1, 1, Oxide), p(1, -2, Transdim), p(1, 0, Gaia), p(2, -1, Transdim)]),
];
