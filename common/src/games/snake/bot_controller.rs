use super::game_state::GameState;
use super::types::{Direction, GameMode};

const COLLISION_PENALTY: i32 = 1000;
const STRAIGHT_BONUS: i32 = 5;

/// Greedy one-step lookahead used for spectator games.
pub struct BotController;

impl BotController {
    /// Picks the best-scoring non-reversing direction for the next tick.
    ///
    /// Ties resolve to the earliest candidate in `Direction::ALL` order.
    pub fn choose_direction(state: &GameState) -> Direction {
        let mut best_direction = state.direction;
        let mut best_score = i32::MIN;

        for direction in Self::get_valid_directions(state.direction) {
            let score = Self::score_direction(state, direction);
            if score > best_score {
                best_score = score;
                best_direction = direction;
            }
        }

        best_direction
    }

    fn get_valid_directions(current: Direction) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| !direction.is_opposite(&current))
    }

    fn score_direction(state: &GameState, direction: Direction) -> i32 {
        let mut next_head = state.snake.head().offset(direction);
        if state.mode == GameMode::PassThrough {
            next_head = next_head.wrapped(state.grid_size);
        }

        let mut score = 0;

        if state.mode == GameMode::Walls && !next_head.is_within(state.grid_size) {
            score -= COLLISION_PENALTY;
        }
        if state.snake.contains(&next_head) {
            score -= COLLISION_PENALTY;
        }

        score -= next_head.manhattan_distance(&state.food);

        if direction == state.direction {
            score += STRAIGHT_BONUS;
        }

        score
    }
}
