//! Gaia map generator - balanced random boards from ten sector tiles
//!
//! This crate provides the core board generation logic, including:
//! - Cube coordinate geometry for the hex grid
//! - The fixed catalog of ten sector tiles and their board slots
//! - Board assembly from tile placements and rotations
//! - Balance checks for planet clusters and home planet reachability
//! - A bounded generate-and-test loop that returns the first balanced board
//!
//! # Architecture
//!
//! The generator is platform-agnostic and performs no I/O. It can be compiled to:
//! - Native Rust, driven by the WebSocket server in `gaia-server`
//! - WebAssembly, called from a browser worker
//!
//! # Modules
//!
//! - [`hex`]: Cube coordinates, rotation, distance, and adjacency
//! - [`tiles`]: Planet types, tile catalog, slots, and layout validation
//! - [`board`]: Assembled boards and tile assembly
//! - [`balance`]: Cluster-size and home-planet reachability rules
//! - [`generator`]: Randomized generation with a bounded retry budget

pub mod balance;
pub mod board;
pub mod generator;
pub mod hex;
pub mod tiles;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use balance::{
    is_balanced, is_balanced_clusters, is_balanced_home_planets, BalanceRules, Violation,
};
pub use board::{build_tile, AssembleError, Board, Hex, Placement};
pub use generator::{
    generate, BoardGenerator, GenerationResult, GeneratorConfig, DEFAULT_MAX_ITERATIONS,
};
pub use hex::CubeCoord;
pub use tiles::{BoardLayout, ConfigError, PlanetType, Slot, TilePlanet, TileSpec};
