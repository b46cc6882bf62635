//! WebAssembly bindings for the map generator.
//!
//! This module exposes board generation to a JavaScript worker through wasm-bindgen.
//! Results cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::balance;
use crate::board::Board;
use crate::generator::{BoardGenerator, GeneratorConfig};
use crate::tiles::BoardLayout;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Generate a board with default rules. Returns the JSON-encoded result.
#[wasm_bindgen(js_name = generateBoard)]
pub fn generate_board(max_iterations: u32, seed: Option<u64>) -> Result<String, JsValue> {
    let generator = WasmBoardGenerator::new(max_iterations)?;
    match seed {
        Some(seed) => generator.generate_seeded(seed),
        None => generator.generate(),
    }
}

/// WASM-exposed generator wrapper
#[wasm_bindgen]
pub struct WasmBoardGenerator {
    config: GeneratorConfig,
}

#[wasm_bindgen]
impl WasmBoardGenerator {
    /// Create a generator over the built-in tiles with the given budget
    #[wasm_bindgen(constructor)]
    pub fn new(max_iterations: u32) -> Result<WasmBoardGenerator, JsValue> {
        let config = GeneratorConfig::with_max_iterations(max_iterations);
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmBoardGenerator { config })
    }

    /// Create a generator from a JSON-encoded `GeneratorConfig`
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config_json: &str) -> Result<WasmBoardGenerator, JsValue> {
        let config: GeneratorConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmBoardGenerator { config })
    }

    /// Generate a board, returning the result as JSON
    pub fn generate(&self) -> Result<String, JsValue> {
        let result = self.generator()?.generate();
        serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Generate a board from a seed, returning the result as JSON
    #[wasm_bindgen(js_name = generateSeeded)]
    pub fn generate_seeded(&self, seed: u64) -> Result<String, JsValue> {
        let result = self.generator()?.generate_seeded(seed);
        serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Re-run both balance checks over a JSON board. Boards that repeat a cell are rejected.
    #[wasm_bindgen(js_name = isBalanced)]
    pub fn is_balanced(&self, board_json: &str) -> Result<bool, JsValue> {
        let board: Board = serde_json::from_str(board_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid board JSON: {}", e)))?;
        Ok(balance::is_balanced(&board, &self.config.rules))
    }
}

impl WasmBoardGenerator {
    fn generator(&self) -> Result<BoardGenerator<'static>, JsValue> {
        BoardGenerator::new(BoardLayout::standard(), self.config)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
