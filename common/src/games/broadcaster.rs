use std::future::Future;

use crate::SessionId;
use crate::games::snake::{GameResult, GameState};

/// Receives what a running session produces: a snapshot per tick for
/// whoever draws the board, and the final result for whoever records scores.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(
        &self,
        session_id: &SessionId,
        state: &GameState,
        tick: u64,
    ) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, result: GameResult) -> impl Future<Output = ()> + Send;
}
