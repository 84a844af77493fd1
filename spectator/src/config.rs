use std::time::Duration;

pub(crate) use snake_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use snake_common::games::snake::{
    DEFAULT_TICK_INTERVAL_MS, GRID_SIZE, GameMode, MAX_GRID_SIZE, MAX_TICK_INTERVAL_MS, MIN_GRID_SIZE,
    MIN_TICK_INTERVAL_MS, SnakeSessionSettings,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "snake_spectator_config.yaml";

const MAX_GAMES: u32 = 16;
const MAX_LEADERBOARD_SIZE: u32 = 100;

pub fn get_config_manager(path: &str) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub spectate: SpectateConfig,
}

impl Config {
    pub fn session_settings(&self, mode: GameMode) -> SnakeSessionSettings {
        SnakeSessionSettings {
            grid_size: self.game.grid_size,
            mode,
            tick_interval: Duration::from_millis(self.game.tick_interval_ms as u64),
            max_ticks: Some(self.spectate.max_ticks),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.spectate.validate()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub grid_size: i32,
    pub tick_interval_ms: u32,
    pub mode: GameMode,
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(format!("grid_size must be at least {}", MIN_GRID_SIZE));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(format!("grid_size must not exceed {}", MAX_GRID_SIZE));
        }
        if (self.tick_interval_ms as u64) < MIN_TICK_INTERVAL_MS {
            return Err(format!("tick_interval_ms must be at least {}", MIN_TICK_INTERVAL_MS));
        }
        if self.tick_interval_ms as u64 > MAX_TICK_INTERVAL_MS {
            return Err(format!("tick_interval_ms must not exceed {}", MAX_TICK_INTERVAL_MS));
        }
        Ok(())
    }
}

/// Bounds for the number of concurrent games, shared with the `--games` flag.
pub fn validate_games(games: u32) -> Result<(), String> {
    if games == 0 {
        return Err("games must be greater than 0".to_string());
    }
    if games > MAX_GAMES {
        return Err(format!("games must not exceed {}", MAX_GAMES));
    }
    Ok(())
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SpectateConfig {
    pub games: u32,
    pub max_ticks: u64,
    pub leaderboard_size: u32,
    pub log_every_ticks: u32,
}

impl Validate for SpectateConfig {
    fn validate(&self) -> Result<(), String> {
        validate_games(self.games)?;
        if self.max_ticks == 0 {
            return Err("max_ticks must be greater than 0".to_string());
        }
        if self.leaderboard_size == 0 {
            return Err("leaderboard_size must be greater than 0".to_string());
        }
        if self.leaderboard_size > MAX_LEADERBOARD_SIZE {
            return Err(format!("leaderboard_size must not exceed {}", MAX_LEADERBOARD_SIZE));
        }
        if self.log_every_ticks == 0 {
            return Err("log_every_ticks must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig {
                grid_size: GRID_SIZE,
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS as u32,
                mode: GameMode::Walls,
            },
            spectate: SpectateConfig {
                games: 3,
                max_ticks: 2000,
                leaderboard_size: 10,
                log_every_ticks: 25,
            },
        }
    }
}
