use rand::Rng;

use crate::error::{SnakeError, SnakeResult};
use crate::log;
use super::food::spawn_food;
use super::snake::Snake;
use super::types::{
    DeathReason, Direction, FOOD_REWARD, GRID_SIZE, GameMode, INITIAL_DIRECTION,
    INITIAL_SNAKE_LENGTH, MAX_GRID_SIZE, MIN_GRID_SIZE, Point,
};

/// Score and mode handed to the score keeper once a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub mode: GameMode,
}

/// One snake game as a plain value.
///
/// Every transition (`step`, `toggle_pause`, `reset`) returns a new state and
/// leaves its input untouched. Hitting a wall or the snake's own body is not
/// an error: the returned state is terminal (`is_game_over`) and keeps the
/// pre-move snake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub food: Point,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub mode: GameMode,
    pub grid_size: i32,
    pub death_reason: Option<DeathReason>,
}

impl GameState {
    /// Fresh game on the default grid.
    pub fn create<R: Rng + ?Sized>(mode: GameMode, rng: &mut R) -> Self {
        Self::create_on_grid(GRID_SIZE, mode, rng)
            .expect("default grid size is within bounds and leaves room for food")
    }

    pub fn create_on_grid<R: Rng + ?Sized>(
        grid_size: i32,
        mode: GameMode,
        rng: &mut R,
    ) -> SnakeResult<Self> {
        validate_grid_size(grid_size)?;

        let center = grid_size / 2;
        let snake = Snake::new(
            Point::new(center, center),
            INITIAL_DIRECTION,
            INITIAL_SNAKE_LENGTH,
        );
        let food = spawn_food(grid_size, &snake, rng)
            .ok_or_else(|| SnakeError::invalid_argument("grid has no room for food"))?;

        Ok(Self {
            snake,
            direction: INITIAL_DIRECTION,
            food,
            score: 0,
            is_game_over: false,
            is_paused: false,
            mode,
            grid_size,
            death_reason: None,
        })
    }

    /// Discards everything and starts over; same as `create`.
    pub fn reset<R: Rng + ?Sized>(mode: GameMode, rng: &mut R) -> Self {
        Self::create(mode, rng)
    }

    pub fn reset_on_grid<R: Rng + ?Sized>(
        grid_size: i32,
        mode: GameMode,
        rng: &mut R,
    ) -> SnakeResult<Self> {
        Self::create_on_grid(grid_size, mode, rng)
    }

    /// Advances the game by one tick.
    ///
    /// A `requested` direction opposite to the current one is ignored and the
    /// snake keeps going the way it was heading. Paused and finished games
    /// come back unchanged.
    pub fn step<R: Rng + ?Sized>(
        &self,
        requested: Option<Direction>,
        rng: &mut R,
    ) -> SnakeResult<GameState> {
        self.validate()?;

        if self.is_game_over || self.is_paused {
            return Ok(self.clone());
        }

        let direction = self.effective_direction(requested);
        let mut new_head = self.snake.head().offset(direction);

        match self.mode {
            GameMode::PassThrough => new_head = new_head.wrapped(self.grid_size),
            GameMode::Walls => {
                if !new_head.is_within(self.grid_size) {
                    return Ok(self.terminated(DeathReason::WallCollision));
                }
            }
        }

        // The tail still counts: it only moves away after the head has moved.
        if self.snake.contains(&new_head) {
            return Ok(self.terminated(DeathReason::SelfCollision));
        }

        if new_head != self.food {
            let snake = self.snake.advanced(new_head, false);
            return Ok(self.moved(snake, direction));
        }

        let snake = self.snake.advanced(new_head, true);
        let mut next = self.moved(snake, direction);
        next.score += FOOD_REWARD;
        log!("Food eaten at {}. Score: {}", new_head, next.score);

        match spawn_food(self.grid_size, &next.snake, rng) {
            Some(food) => next.food = food,
            None => {
                log!("Board is full. Final score: {}", next.score);
                next.is_game_over = true;
                next.death_reason = Some(DeathReason::BoardFull);
            }
        }

        Ok(next)
    }

    /// Flips the pause flag and nothing else, even on a finished game.
    pub fn toggle_pause(&self) -> GameState {
        let mut next = self.clone();
        next.is_paused = !self.is_paused;
        next
    }

    /// `Some` once the game is over.
    pub fn result(&self) -> Option<FinalScore> {
        self.is_game_over.then_some(FinalScore {
            score: self.score,
            mode: self.mode,
        })
    }

    pub fn effective_direction(&self, requested: Option<Direction>) -> Direction {
        match requested {
            Some(direction) if !direction.is_opposite(&self.direction) => direction,
            _ => self.direction,
        }
    }

    /// Rejects states no sequence of transitions could have produced.
    pub fn validate(&self) -> SnakeResult<()> {
        validate_grid_size(self.grid_size)?;

        if self.snake.len() < INITIAL_SNAKE_LENGTH {
            return Err(SnakeError::invalid_argument(format!(
                "snake must have at least {} segments, got {}",
                INITIAL_SNAKE_LENGTH,
                self.snake.len()
            )));
        }
        if self.snake.has_duplicates() {
            return Err(SnakeError::invalid_argument("snake segments must be unique"));
        }
        if let Some((front, back)) = self
            .snake
            .segments()
            .zip(self.snake.segments().skip(1))
            .find(|(front, back)| !self.are_neighbours(front, back))
        {
            return Err(SnakeError::invalid_argument(format!(
                "snake segments {} and {} are not adjacent",
                front, back
            )));
        }
        if let Some(outside) = self
            .snake
            .segments()
            .find(|segment| !segment.is_within(self.grid_size))
        {
            return Err(SnakeError::invalid_argument(format!(
                "snake segment {} is outside the {}x{} grid",
                outside, self.grid_size, self.grid_size
            )));
        }
        if !self.food.is_within(self.grid_size) {
            return Err(SnakeError::invalid_argument(format!(
                "food {} is outside the {}x{} grid",
                self.food, self.grid_size, self.grid_size
            )));
        }
        if !self.is_game_over && self.snake.contains(&self.food) {
            return Err(SnakeError::invalid_argument(format!(
                "food {} overlaps the snake",
                self.food
            )));
        }

        Ok(())
    }

    /// Cells one step apart; in pass-through mode opposite edges touch.
    fn are_neighbours(&self, a: &Point, b: &Point) -> bool {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        match self.mode {
            GameMode::Walls => dx + dy == 1,
            GameMode::PassThrough => {
                dx.min(self.grid_size - dx) + dy.min(self.grid_size - dy) == 1
            }
        }
    }

    fn terminated(&self, reason: DeathReason) -> GameState {
        log!("Game over ({:?}) with score {}", reason, self.score);
        let mut next = self.clone();
        next.is_game_over = true;
        next.death_reason = Some(reason);
        next
    }

    fn moved(&self, snake: Snake, direction: Direction) -> GameState {
        GameState {
            snake,
            direction,
            food: self.food,
            score: self.score,
            is_game_over: self.is_game_over,
            is_paused: self.is_paused,
            mode: self.mode,
            grid_size: self.grid_size,
            death_reason: self.death_reason,
        }
    }
}

fn validate_grid_size(grid_size: i32) -> SnakeResult<()> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
        return Err(SnakeError::invalid_argument(format!(
            "grid size must be between {} and {}, got {}",
            MIN_GRID_SIZE, MAX_GRID_SIZE, grid_size
        )));
    }
    Ok(())
}
