use rand::Rng;

use super::snake::Snake;
use super::types::{MAX_FOOD_SPAWN_ATTEMPTS, Point};

/// Picks a uniformly random free cell for the next food item.
///
/// Random probing is tried first; a crowded board falls back to scanning
/// every free cell. `None` only when the snake covers the whole grid.
pub fn spawn_food<R: Rng + ?Sized>(grid_size: i32, snake: &Snake, rng: &mut R) -> Option<Point> {
    for _ in 0..MAX_FOOD_SPAWN_ATTEMPTS {
        let candidate = Point::new(
            rng.random_range(0..grid_size),
            rng.random_range(0..grid_size),
        );
        if !snake.contains(&candidate) {
            return Some(candidate);
        }
    }

    let free_cells: Vec<Point> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| Point::new(x, y)))
        .filter(|cell| !snake.contains(cell))
        .collect();

    if free_cells.is_empty() {
        return None;
    }

    Some(free_cells[rng.random_range(0..free_cells.len())])
}
