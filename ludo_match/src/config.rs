use std::path::Path;

use anyhow::Context;
use ludo::{ConfigError, MAX_PIECES};
use serde::{Deserialize, Serialize};

/// Settings fixed at the start of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Pieces per player, between 1 and 4.
    pub piece_count: u8,
    /// Seeds turn order and dice. A random seed is picked if missing.
    pub seed: Option<u64>,
    /// Time between two orchestrator ticks.
    pub tick_interval_ms: u64,
    /// How long an agent waits for a click before checking its cancel flag again.
    pub agent_poll_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            piece_count: MAX_PIECES,
            seed: None,
            tick_interval_ms: 16,
            agent_poll_ms: 50,
        }
    }
}

impl MatchConfig {
    /// Loads a config from a JSON file. Missing fields take their default value.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read match config {}", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Could not parse match config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PIECES).contains(&self.piece_count) {
            return Err(ConfigError::InvalidPieceCount(self.piece_count));
        }
        Ok(())
    }
}
