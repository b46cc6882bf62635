//! Assembled board representation.
//!
//! This module contains:
//! - `Hex`, one cell of an assembled board with its planet and tile provenance
//! - `Placement`, the slot and rotation chosen for one tile
//! - Tile assembly (`build_tile`) and board assembly (`Board::assemble`)
//! - Board queries: lookup by coordinate and board-restricted adjacency

use crate::hex::{hexagon, CubeCoord};
use crate::tiles::{BoardLayout, PlanetType, Slot, TileSpec, TILE_CELLS, TILE_RADIUS};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur when assembling tiles by number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("No tile numbered {0} in the catalog")]
    UnknownTile(u8),

    #[error("Rotation {0} is outside 0..=5")]
    InvalidRotation(u8),

    #[error("Slot {0:?} is outside the coordinate range")]
    SlotOutOfRange(Slot),

    #[error("Cell {0} appears more than once")]
    DuplicateCell(CubeCoord),
}

/// A single cell of an assembled board.
///
/// Serialized with camelCase keys and the cube coordinate flattened in, e.g.
/// `{"q":0,"r":1,"s":-1,"planet":"terra","isCenter":false,"tileNumber":4,...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hex {
    /// Absolute board position
    #[serde(flatten)]
    pub coord: CubeCoord,
    /// Planet on this cell, `Empty` for deep space
    pub planet: PlanetType,
    /// Whether this is the center cell of its tile
    pub is_center: bool,
    /// Tile this cell came from (1-10)
    pub tile_number: u8,
    /// Slot column of the tile
    pub tile_position_x: i32,
    /// Slot row of the tile
    pub tile_position_y: i32,
    /// Clockwise rotation of the tile, in 60° steps (0-5)
    pub rotation: u8,
}

impl Hex {
    /// Identity string `"q,r,s"`, unique per board
    pub fn id(&self) -> String {
        self.coord.to_string()
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.tile_position_x, self.tile_position_y)
    }

    pub fn is_planet(&self) -> bool {
        !self.planet.is_empty()
    }

    pub fn distance_to(&self, other: &Hex) -> u32 {
        self.coord.distance_to(&other.coord)
    }
}

/// Where one tile goes and how it is turned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub tile_number: u8,
    pub slot: Slot,
    pub rotation: u8,
}

impl Placement {
    pub const fn new(tile_number: u8, slot: Slot, rotation: u8) -> Self {
        Self {
            tile_number,
            slot,
            rotation,
        }
    }
}

/// Build the 19 cells of tile `tile_number`, rotated and translated to `slot`.
pub fn build_tile(
    layout: &BoardLayout,
    tile_number: u8,
    rotation: u8,
    slot: Slot,
) -> Result<Vec<Hex>, AssembleError> {
    let spec = layout
        .tile(tile_number)
        .ok_or(AssembleError::UnknownTile(tile_number))?;
    if rotation > 5 {
        return Err(AssembleError::InvalidRotation(rotation));
    }
    if layout.checked_translation(slot).is_none() {
        return Err(AssembleError::SlotOutOfRange(slot));
    }
    Ok(place_tile(layout, spec, rotation, slot))
}

/// Tile assembly for a spec already known to be in `layout`. `rotation` must be in 0..=5
/// and `slot` must have an in-range translation.
pub(crate) fn place_tile(
    layout: &BoardLayout,
    spec: &TileSpec,
    rotation: u8,
    slot: Slot,
) -> Vec<Hex> {
    let planets: HashMap<CubeCoord, PlanetType> = spec.planet_cells(rotation).collect();
    let translation = layout.translation(slot);

    hexagon(TILE_RADIUS)
        .into_iter()
        .map(|local| Hex {
            coord: local + translation,
            planet: planets.get(&local).copied().unwrap_or(PlanetType::Empty),
            is_center: local == CubeCoord::ORIGIN,
            tile_number: spec.number,
            tile_position_x: slot.x,
            tile_position_y: slot.y,
            rotation,
        })
        .collect()
}

/// A fully assembled candidate board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Hex>", into = "Vec<Hex>")]
pub struct Board {
    /// All cells, in assembly order
    hexes: Vec<Hex>,
    /// Position of each cell in `hexes`
    index: HashMap<CubeCoord, usize>,
}

impl Board {
    /// Wrap a list of cells. Coordinates are expected to be unique.
    pub fn from_hexes(hexes: Vec<Hex>) -> Self {
        let index = hexes
            .iter()
            .enumerate()
            .map(|(i, hex)| (hex.coord, i))
            .collect();
        Self { hexes, index }
    }

    /// Concatenate the tiles named by `placements`.
    ///
    /// Slots are taken as given; when they are a permutation of the layout's slots
    /// the tiles cannot overlap.
    pub fn assemble(layout: &BoardLayout, placements: &[Placement]) -> Result<Self, AssembleError> {
        let mut hexes = Vec::with_capacity(placements.len() * TILE_CELLS);
        for placement in placements {
            hexes.extend(build_tile(
                layout,
                placement.tile_number,
                placement.rotation,
                placement.slot,
            )?);
        }
        Ok(Self::from_hexes(hexes))
    }

    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    pub fn get(&self, coord: &CubeCoord) -> Option<&Hex> {
        self.index.get(coord).map(|&i| &self.hexes[i])
    }

    pub fn contains(&self, coord: &CubeCoord) -> bool {
        self.index.contains_key(coord)
    }

    /// Cells of this board adjacent to `hex`. Cells on the board edge have fewer than six.
    pub fn neighbors(&self, hex: &Hex) -> Vec<&Hex> {
        hex.coord
            .neighbors()
            .iter()
            .filter_map(|coord| self.get(coord))
            .collect()
    }

    /// All non-empty cells
    pub fn planets(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.iter().filter(|h| h.is_planet())
    }

    /// All cells carrying `planet`
    pub fn hexes_of(&self, planet: PlanetType) -> impl Iterator<Item = &Hex> {
        self.hexes.iter().filter(move |h| h.planet == planet)
    }

    pub fn count_of(&self, planet: PlanetType) -> usize {
        self.hexes_of(planet).count()
    }

    /// The center cell of every placed tile
    pub fn tile_centers(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.iter().filter(|h| h.is_center)
    }

    /// The placement each tile was assembled with, in assembly order
    pub fn placements(&self) -> Vec<Placement> {
        self.tile_centers()
            .map(|h| Placement::new(h.tile_number, h.slot(), h.rotation))
            .collect()
    }
}

impl TryFrom<Vec<Hex>> for Board {
    type Error = AssembleError;

    /// Like `from_hexes`, but rejects a list that repeats a coordinate.
    fn try_from(hexes: Vec<Hex>) -> Result<Self, Self::Error> {
        let board = Self::from_hexes(hexes);
        if board.index.len() != board.hexes.len() {
            let mut seen = HashSet::new();
            if let Some(hex) = board.hexes.iter().find(|h| !seen.insert(h.coord)) {
                return Err(AssembleError::DuplicateCell(hex.coord));
            }
        }
        Ok(board)
    }
}

impl From<Board> for Vec<Hex> {
    fn from(board: Board) -> Self {
        board.hexes
    }
}
