use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Local};
use tokio::sync::Mutex;

use snake_common::games::snake::GameMode;
use snake_common::{PlayerId, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub struct LiveGame {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub mode: GameMode,
    pub current_score: u32,
    pub ticks: u64,
    pub started_at: DateTime<Local>,
}

/// Registry of sessions currently being spectated.
#[derive(Debug, Clone, Default)]
pub struct LiveGames {
    games: Arc<Mutex<HashMap<SessionId, LiveGame>>>,
}

impl LiveGames {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, session_id: SessionId, player_id: PlayerId, mode: GameMode) {
        let game = LiveGame {
            session_id: session_id.clone(),
            player_id,
            mode,
            current_score: 0,
            ticks: 0,
            started_at: Local::now(),
        };
        self.games.lock().await.insert(session_id, game);
    }

    /// Returns the updated entry, or `None` for an unknown session.
    pub async fn update(&self, session_id: &SessionId, score: u32, ticks: u64) -> Option<LiveGame> {
        let mut games = self.games.lock().await;
        let game = games.get_mut(session_id)?;
        game.current_score = score;
        game.ticks = ticks;
        Some(game.clone())
    }

    pub async fn remove(&self, session_id: &SessionId) -> Option<LiveGame> {
        self.games.lock().await.remove(session_id)
    }

    /// Highest score first, then by session id.
    pub async fn list(&self) -> Vec<LiveGame> {
        let games = self.games.lock().await;
        let mut list: Vec<LiveGame> = games.values().cloned().collect();
        list.sort_by(|a, b| {
            b.current_score
                .cmp(&a.current_score)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_update_remove() {
        let live = LiveGames::new();
        let id = SessionId::from("live-1");
        live.register(id.clone(), PlayerId::from("Swift Mamba"), GameMode::Walls).await;

        let updated = live.update(&id, 30, 12).await.unwrap();
        assert_eq!(updated.current_score, 30);
        assert_eq!(updated.ticks, 12);
        assert_eq!(live.list().await, vec![updated.clone()]);

        assert_eq!(live.remove(&id).await, Some(updated));
        assert!(live.list().await.is_empty());
        assert!(live.update(&id, 40, 13).await.is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_score() {
        let live = LiveGames::new();
        for (id, score) in [("live-1", 10), ("live-2", 50), ("live-3", 10)] {
            let session_id = SessionId::from(id);
            live.register(session_id.clone(), PlayerId::from(id), GameMode::PassThrough).await;
            live.update(&session_id, score, 1).await;
        }

        let order: Vec<String> = live
            .list()
            .await
            .into_iter()
            .map(|game| game.session_id.to_string())
            .collect();
        assert_eq!(order, vec!["live-2", "live-1", "live-3"]);
    }
}
