use std::sync::Arc;
use chrono::Local;
use tokio::sync::Mutex;

use snake_common::games::GameBroadcaster;
use snake_common::games::snake::{GameResult, GameState};
use snake_common::{SessionId, log};
use crate::leaderboard::Leaderboard;
use crate::live_games::LiveGames;

/// Feeds running sessions into the live-games registry and finished games
/// into the leaderboard, logging progress every `log_every_ticks` ticks.
#[derive(Clone)]
pub struct SpectatorBroadcaster {
    live_games: LiveGames,
    leaderboard: Arc<Mutex<Leaderboard>>,
    log_every_ticks: u64,
}

impl std::fmt::Debug for SpectatorBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectatorBroadcaster")
            .field("log_every_ticks", &self.log_every_ticks)
            .finish()
    }
}

impl SpectatorBroadcaster {
    pub fn new(live_games: LiveGames, leaderboard: Arc<Mutex<Leaderboard>>, log_every_ticks: u64) -> Self {
        Self {
            live_games,
            leaderboard,
            log_every_ticks: log_every_ticks.max(1),
        }
    }
}

impl GameBroadcaster for SpectatorBroadcaster {
    async fn broadcast_state(&self, session_id: &SessionId, state: &GameState, tick: u64) {
        let Some(game) = self.live_games.update(session_id, state.score, tick).await else {
            return;
        };

        if tick % self.log_every_ticks == 0 {
            let status = if state.is_paused { " (paused)" } else { "" };
            log!(
                "[session:{}] {} tick {}: score {}, length {}, head {}{}",
                session_id,
                game.player_id,
                tick,
                state.score,
                state.snake.len(),
                state.snake.head(),
                status
            );
        }
    }

    async fn broadcast_game_over(&self, result: GameResult) {
        self.live_games.remove(&result.session_id).await;

        if result.score == 0 {
            log!(
                "[session:{}] {} finished without points, not submitted",
                result.session_id,
                result.player_id
            );
            return;
        }

        let rank = self.leaderboard.lock().await.submit(&result, Local::now());
        let reason = result
            .death_reason
            .map(|reason| format!("{:?}", reason))
            .unwrap_or_else(|| "unknown".to_string());
        match rank {
            Some(rank) => log!(
                "[session:{}] {} scored {} ({}), leaderboard rank #{}",
                result.session_id,
                result.player_id,
                result.score,
                reason,
                rank
            ),
            None => log!(
                "[session:{}] {} scored {} ({}), not ranked",
                result.session_id,
                result.player_id,
                result.score,
                reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_common::PlayerId;
    use snake_common::games::SessionRng;
    use snake_common::games::snake::{DeathReason, GameMode};

    fn broadcaster() -> (SpectatorBroadcaster, LiveGames, Arc<Mutex<Leaderboard>>) {
        let live_games = LiveGames::new();
        let leaderboard = Arc::new(Mutex::new(Leaderboard::new(3)));
        let broadcaster = SpectatorBroadcaster::new(live_games.clone(), leaderboard.clone(), 5);
        (broadcaster, live_games, leaderboard)
    }

    fn result(session_id: &SessionId, score: u32) -> GameResult {
        GameResult {
            session_id: session_id.clone(),
            player_id: PlayerId::from("Quiet Viper"),
            score,
            mode: GameMode::Walls,
            ticks: 42,
            death_reason: Some(DeathReason::WallCollision),
        }
    }

    #[tokio::test]
    async fn test_state_updates_live_game() {
        let (broadcaster, live_games, _) = broadcaster();
        let session_id = SessionId::from("live-1");
        live_games
            .register(session_id.clone(), PlayerId::from("Quiet Viper"), GameMode::Walls)
            .await;

        let mut state = GameState::create(GameMode::Walls, &mut SessionRng::new(4));
        state.score = 20;
        broadcaster.broadcast_state(&session_id, &state, 7).await;

        let game = live_games.list().await.pop().unwrap();
        assert_eq!(game.current_score, 20);
        assert_eq!(game.ticks, 7);
    }

    #[tokio::test]
    async fn test_unknown_session_is_ignored() {
        let (broadcaster, live_games, _) = broadcaster();
        let state = GameState::create(GameMode::Walls, &mut SessionRng::new(4));
        broadcaster.broadcast_state(&SessionId::from("ghost"), &state, 5).await;
        assert!(live_games.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_game_over_moves_result_to_leaderboard() {
        let (broadcaster, live_games, leaderboard) = broadcaster();
        let session_id = SessionId::from("live-2");
        live_games
            .register(session_id.clone(), PlayerId::from("Quiet Viper"), GameMode::Walls)
            .await;

        broadcaster.broadcast_game_over(result(&session_id, 30)).await;

        assert!(live_games.list().await.is_empty());
        let board = leaderboard.lock().await;
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0].score, 30);
        assert_eq!(board.entries()[0].ticks, 42);
    }

    #[tokio::test]
    async fn test_scoreless_game_is_not_submitted() {
        let (broadcaster, live_games, leaderboard) = broadcaster();
        let session_id = SessionId::from("live-3");
        live_games
            .register(session_id.clone(), PlayerId::from("Quiet Viper"), GameMode::Walls)
            .await;

        broadcaster.broadcast_game_over(result(&session_id, 0)).await;

        assert!(live_games.list().await.is_empty());
        assert!(leaderboard.lock().await.entries().is_empty());
    }
}
