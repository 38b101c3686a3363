//! Session configuration.

use serde::{Deserialize, Serialize};

use super::board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
use super::error::{ConfigError, SetupError};
use super::summoning::DEFAULT_SUMMON_RADIUS;

/// Cards drawn into the first player's hand at game start.
pub const DEFAULT_OPENING_HAND_SIZE: usize = 5;

/// Tunable rules of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board edge length; must be odd.
    pub board_size: u32,
    pub opening_hand_size: usize,
    /// Chebyshev radius of legal summon targets around the leader.
    pub summon_radius: i32,
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            opening_hand_size: DEFAULT_OPENING_HAND_SIZE,
            summon_radius: DEFAULT_SUMMON_RADIUS,
        }
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.board_size == 0 || self.board_size % 2 == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(SetupError::InvalidBoardSize(self.board_size));
        }
        if self.summon_radius < 1 {
            return Err(SetupError::InvalidSummonRadius(self.summon_radius));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
