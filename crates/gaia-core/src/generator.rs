//! Randomized board generation.
//!
//! Boards are produced by rejection sampling: shuffle the slots, turn every tile at
//! random, assemble, and keep the first board that passes both balance checks.
//! The number of attempts is bounded; running out is reported as
//! `GenerationResult::Exhausted`, never as a partial board.

use crate::balance::{self, BalanceRules};
use crate::board::{place_tile, Board};
use crate::tiles::{BoardLayout, ConfigError, Slot};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Attempts made before giving up, unless configured otherwise
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Maximum number of boards to try
    pub max_iterations: u32,
    /// Balance thresholds a board must meet
    pub rules: BalanceRules,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rules: BalanceRules::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_max_iterations(max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        self.rules.validate()
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    /// A balanced board, found on attempt `iterations` (1-based)
    Found { board: Board, iterations: u32 },
    /// Every attempt was rejected
    Exhausted { attempts: u32 },
}

impl GenerationResult {
    pub fn board(&self) -> Option<&Board> {
        match self {
            GenerationResult::Found { board, .. } => Some(board),
            GenerationResult::Exhausted { .. } => None,
        }
    }

    pub fn into_board(self) -> Option<Board> {
        match self {
            GenerationResult::Found { board, .. } => Some(board),
            GenerationResult::Exhausted { .. } => None,
        }
    }

    /// Number of boards assembled during the run
    pub fn attempts(&self) -> u32 {
        match self {
            GenerationResult::Found { iterations, .. } => *iterations,
            GenerationResult::Exhausted { attempts } => *attempts,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, GenerationResult::Found { .. })
    }
}

/// Draws random boards from a layout until one is balanced
#[derive(Debug, Clone)]
pub struct BoardGenerator<'a> {
    layout: &'a BoardLayout,
    config: GeneratorConfig,
}

impl BoardGenerator<'static> {
    /// Generator over the built-in layout with default rules and budget
    pub fn standard() -> Self {
        Self {
            layout: BoardLayout::standard(),
            config: GeneratorConfig::default(),
        }
    }
}

impl<'a> BoardGenerator<'a> {
    pub fn new(layout: &'a BoardLayout, config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { layout, config })
    }

    pub fn layout(&self) -> &BoardLayout {
        self.layout
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate using the thread-local RNG
    pub fn generate(&self) -> GenerationResult {
        let mut rng = rand::thread_rng();
        self.generate_with_rng(&mut rng)
    }

    /// Generate reproducibly from a seed
    pub fn generate_seeded(&self, seed: u64) -> GenerationResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with_rng(&mut rng)
    }

    /// Generate with a provided RNG.
    /// This allows for deterministic board generation when needed
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> GenerationResult {
        for iteration in 1..=self.config.max_iterations {
            let board = self.random_board(rng);
            match balance::check(&board, &self.config.rules) {
                Ok(()) => {
                    debug!(iterations = iteration, "Balanced board found");
                    return GenerationResult::Found {
                        board,
                        iterations: iteration,
                    };
                }
                Err(violation) => {
                    trace!(iteration, %violation, "Board rejected");
                }
            }
        }

        debug!(
            attempts = self.config.max_iterations,
            "No balanced board within budget"
        );
        GenerationResult::Exhausted {
            attempts: self.config.max_iterations,
        }
    }

    /// Assemble one unvalidated board: tile `i` goes to the `i`-th slot of a fresh
    /// permutation, each with an independent uniform rotation.
    pub fn random_board<R: Rng + ?Sized>(&self, rng: &mut R) -> Board {
        let mut slots: Vec<Slot> = self.layout.slots().to_vec();
        slots.shuffle(rng);

        let hexes = self
            .layout
            .tiles()
            .iter()
            .zip(slots)
            .flat_map(|(spec, slot)| {
                let rotation = rng.gen_range(0..6);
                place_tile(self.layout, spec, rotation, slot)
            })
            .collect();
        Board::from_hexes(hexes)
    }
}

/// Generate a board from the built-in layout with default rules.
pub fn generate(max_iterations: u32) -> GenerationResult {
    let generator = BoardGenerator {
        layout: BoardLayout::standard(),
        config: GeneratorConfig::with_max_iterations(max_iterations),
    };
    generator.generate()
}
