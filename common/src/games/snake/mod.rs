mod bot_controller;
mod food;
mod game_state;
mod session;
mod settings;
mod snake;
mod types;

pub use bot_controller::BotController;
pub use food::spawn_food;
pub use game_state::{FinalScore, GameState};
pub use session::{
    Controller, GameResult, SessionCommand, SessionController, SessionEnd, SessionHandle,
    SnakeSession,
};
pub use settings::{MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS, SnakeSessionSettings};
pub use snake::Snake;
pub use types::{
    DEFAULT_TICK_INTERVAL_MS, DeathReason, Direction, FOOD_REWARD, GRID_SIZE, GameMode,
    INITIAL_DIRECTION, INITIAL_SNAKE_LENGTH, MAX_FOOD_SPAWN_ATTEMPTS, MAX_GRID_SIZE,
    MIN_GRID_SIZE, Point,
};
