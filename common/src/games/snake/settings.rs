use std::time::Duration;

use crate::error::{SnakeError, SnakeResult};
use super::types::{DEFAULT_TICK_INTERVAL_MS, GRID_SIZE, GameMode, MAX_GRID_SIZE, MIN_GRID_SIZE};

pub const MIN_TICK_INTERVAL_MS: u64 = 50;
pub const MAX_TICK_INTERVAL_MS: u64 = 5000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSessionSettings {
    pub grid_size: i32,
    pub mode: GameMode,
    pub tick_interval: Duration,
    /// Session ends on its own after this many ticks, game over or not.
    pub max_ticks: Option<u64>,
}

impl Default for SnakeSessionSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            mode: GameMode::Walls,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            max_ticks: None,
        }
    }
}

impl SnakeSessionSettings {
    pub fn validate(&self) -> SnakeResult<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(SnakeError::invalid_argument(format!(
                "grid size must be between {} and {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE
            )));
        }
        let tick_ms = self.tick_interval.as_millis();
        if tick_ms < MIN_TICK_INTERVAL_MS as u128 || tick_ms > MAX_TICK_INTERVAL_MS as u128 {
            return Err(SnakeError::invalid_argument(format!(
                "tick interval must be between {}ms and {}ms",
                MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS
            )));
        }
        if self.max_ticks == Some(0) {
            return Err(SnakeError::invalid_argument("max ticks must be greater than 0"));
        }
        Ok(())
    }
}
