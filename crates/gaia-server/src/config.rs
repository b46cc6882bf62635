//! Server configuration from environment variables.

use anyhow::Context;
use gaia_core::{BoardLayout, GeneratorConfig, DEFAULT_MAX_ITERATIONS};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Startup configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (`SERVER_ADDR`)
    pub addr: SocketAddr,
    /// Default generator settings (`MAX_ITERATIONS`)
    pub generator: GeneratorConfig,
    /// Custom tile catalog (`TILE_CATALOG`), built-in tiles when unset
    pub catalog_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr: SocketAddr = var("SERVER_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".into())
            .parse()
            .context("SERVER_ADDR is not a socket address")?;

        let max_iterations = match var("MAX_ITERATIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("MAX_ITERATIONS={raw} is not a number"))?,
            None => DEFAULT_MAX_ITERATIONS,
        };
        let generator = GeneratorConfig::with_max_iterations(max_iterations);
        generator.validate()?;

        Ok(Self {
            addr,
            generator,
            catalog_path: var("TILE_CATALOG").map(PathBuf::from),
        })
    }

    /// Load and validate the tile layout.
    pub fn load_layout(&self) -> anyhow::Result<BoardLayout> {
        match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading tile catalog {}", path.display()))?;
                BoardLayout::from_json(&json)
                    .with_context(|| format!("loading tile catalog {}", path.display()))
            }
            None => Ok(BoardLayout::standard().clone()),
        }
    }
}
