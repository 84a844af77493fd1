use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::error::{SnakeError, SnakeResult};
use crate::games::{GameBroadcaster, SessionRng};
use crate::{PlayerId, SessionId, log};
use super::bot_controller::BotController;
use super::game_state::GameState;
use super::settings::SnakeSessionSettings;
use super::types::{DeathReason, Direction, GameMode};

/// Who decides the requested direction on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    Human,
    Bot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Turn(Direction),
    TogglePause,
    Stop,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub score: u32,
    pub mode: GameMode,
    pub ticks: u64,
    pub death_reason: Option<DeathReason>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    GameOver(GameResult),
    /// Cancelled or out of ticks before the game finished.
    Stopped { state: GameState, ticks: u64 },
}

/// Cloneable input side of a running session.
///
/// Each method returns `false` once the session has ended.
#[derive(Clone)]
pub struct SessionController {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionController {
    pub fn turn(&self, direction: Direction) -> bool {
        self.send(SessionCommand::Turn(direction))
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(SessionCommand::TogglePause)
    }

    pub fn stop(&self) -> bool {
        self.send(SessionCommand::Stop)
    }

    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}

/// Owner of a spawned session. Dropping it (and every cloned controller)
/// stops the session before its next tick.
pub struct SessionHandle {
    session_id: SessionId,
    controller: SessionController,
    task: JoinHandle<SnakeResult<SessionEnd>>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn controller(&self) -> SessionController {
        self.controller.clone()
    }

    pub async fn join(self) -> SnakeResult<SessionEnd> {
        let Self {
            session_id,
            controller,
            task,
        } = self;

        // keep the channel open while waiting, otherwise the session sees a hang-up
        let outcome = task.await;
        drop(controller);

        outcome.map_err(|e| SnakeError::SessionAborted(format!("{}: {}", session_id, e)))?
    }
}

pub struct SnakeSession;

impl SnakeSession {
    /// Creates a fresh game and drives it on its own tokio task.
    pub fn spawn(
        session_id: SessionId,
        player_id: PlayerId,
        controller: Controller,
        settings: &SnakeSessionSettings,
        seed: u64,
        broadcaster: impl GameBroadcaster,
    ) -> SnakeResult<SessionHandle> {
        settings.validate()?;

        let mut rng = SessionRng::new(seed);
        let state = GameState::create_on_grid(settings.grid_size, settings.mode, &mut rng)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let runner = SessionRunner {
            session_id: session_id.clone(),
            player_id,
            controller,
            tick_interval: settings.tick_interval,
            max_ticks: settings.max_ticks,
            rng,
        };
        let task = tokio::spawn(runner.run(state, command_rx, broadcaster));

        Ok(SessionHandle {
            session_id,
            controller: SessionController {
                commands: command_tx,
            },
            task,
        })
    }
}

struct SessionRunner {
    session_id: SessionId,
    player_id: PlayerId,
    controller: Controller,
    tick_interval: Duration,
    max_ticks: Option<u64>,
    rng: SessionRng,
}

impl SessionRunner {
    async fn run(
        mut self,
        mut state: GameState,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: impl GameBroadcaster,
    ) -> SnakeResult<SessionEnd> {
        log!(
            "[session:{}] {} started ({:?}, {}, seed {})",
            self.session_id,
            self.player_id,
            self.controller,
            state.mode,
            self.rng.seed()
        );

        let mut timer = interval(self.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        timer.tick().await;

        let mut pending_turn: Option<Direction> = None;
        let mut pause_requested = false;
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(SessionCommand::Turn(direction)) => pending_turn = Some(direction),
                    Some(SessionCommand::TogglePause) => pause_requested = !pause_requested,
                    Some(SessionCommand::Stop) | None => {
                        log!("[session:{}] stopped after {} ticks", self.session_id, ticks);
                        return Ok(SessionEnd::Stopped { state, ticks });
                    }
                },

                _ = timer.tick() => {
                    if std::mem::take(&mut pause_requested) {
                        state = state.toggle_pause();
                    }

                    let requested = match self.controller {
                        Controller::Bot => Some(BotController::choose_direction(&state)),
                        Controller::Human => pending_turn.take(),
                    };

                    state = state.step(requested, &mut self.rng)?;
                    ticks += 1;
                    broadcaster.broadcast_state(&self.session_id, &state, ticks).await;

                    if let Some(final_score) = state.result() {
                        let result = GameResult {
                            session_id: self.session_id.clone(),
                            player_id: self.player_id.clone(),
                            score: final_score.score,
                            mode: final_score.mode,
                            ticks,
                            death_reason: state.death_reason,
                        };
                        log!(
                            "[session:{}] {} finished with {} points after {} ticks",
                            self.session_id,
                            self.player_id,
                            result.score,
                            ticks
                        );
                        broadcaster.broadcast_game_over(result.clone()).await;
                        return Ok(SessionEnd::GameOver(result));
                    }

                    if self.max_ticks.is_some_and(|max_ticks| ticks >= max_ticks) {
                        log!("[session:{}] reached tick limit {}", self.session_id, ticks);
                        return Ok(SessionEnd::Stopped { state, ticks });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::{GRID_SIZE, Point};
    use std::sync::{Arc, Mutex};

    const TICK_MS: u64 = 150;

    #[derive(Clone, Default)]
    struct RecordingBroadcaster {
        states: Arc<Mutex<Vec<GameState>>>,
        results: Arc<Mutex<Vec<GameResult>>>,
    }

    impl RecordingBroadcaster {
        fn states(&self) -> Vec<GameState> {
            self.states.lock().unwrap().clone()
        }

        fn results(&self) -> Vec<GameResult> {
            self.results.lock().unwrap().clone()
        }
    }

    impl GameBroadcaster for RecordingBroadcaster {
        async fn broadcast_state(&self, _session_id: &SessionId, state: &GameState, _tick: u64) {
            self.states.lock().unwrap().push(state.clone());
        }

        async fn broadcast_game_over(&self, result: GameResult) {
            self.results.lock().unwrap().push(result);
        }
    }

    fn settings(mode: GameMode, max_ticks: Option<u64>) -> SnakeSessionSettings {
        SnakeSessionSettings {
            grid_size: GRID_SIZE,
            mode,
            tick_interval: Duration::from_millis(TICK_MS),
            max_ticks,
        }
    }

    fn spawn(
        controller: Controller,
        settings: &SnakeSessionSettings,
        broadcaster: &RecordingBroadcaster,
    ) -> SessionHandle {
        SnakeSession::spawn(
            SessionId::from("test-session"),
            PlayerId::from("tester"),
            controller,
            settings,
            42,
            broadcaster.clone(),
        )
        .unwrap()
    }

    async fn wait_ticks(count: u64) {
        tokio::time::sleep(Duration::from_millis(TICK_MS * count + TICK_MS / 3)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_snake_runs_into_right_wall() {
        let broadcaster = RecordingBroadcaster::default();
        let handle = spawn(Controller::Human, &settings(GameMode::Walls, None), &broadcaster);

        let end = handle.join().await.unwrap();

        // head starts at x = 10 and needs ten moves to leave a 20-wide grid
        let result = match end {
            SessionEnd::GameOver(result) => result,
            other => panic!("expected game over, got {:?}", other),
        };
        assert_eq!(result.ticks, 10);
        assert_eq!(result.death_reason, Some(DeathReason::WallCollision));
        assert_eq!(result.mode, GameMode::Walls);

        let states = broadcaster.states();
        assert_eq!(states.len(), 10);
        assert!(states.last().unwrap().is_game_over);
        assert_eq!(states.last().unwrap().snake.head().x, GRID_SIZE - 1);
        assert_eq!(broadcaster.results(), vec![result]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_steps() {
        let broadcaster = RecordingBroadcaster::default();
        let handle = spawn(Controller::Human, &settings(GameMode::PassThrough, None), &broadcaster);

        wait_ticks(3).await;
        assert!(handle.controller().stop());

        let end = handle.join().await.unwrap();
        let (state, ticks) = match end {
            SessionEnd::Stopped { state, ticks } => (state, ticks),
            other => panic!("expected stop, got {:?}", other),
        };
        assert_eq!(ticks, 3);
        assert_eq!(state.snake.head(), Point::new(13, 10));

        wait_ticks(5).await;
        assert_eq!(broadcaster.states().len(), 3);
        assert!(broadcaster.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_session() {
        let broadcaster = RecordingBroadcaster::default();
        let handle = spawn(Controller::Bot, &settings(GameMode::PassThrough, None), &broadcaster);
        drop(handle);

        wait_ticks(10).await;
        assert!(broadcaster.states().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_is_applied_on_next_tick() {
        let broadcaster = RecordingBroadcaster::default();
        let handle = spawn(Controller::Human, &settings(GameMode::Walls, None), &broadcaster);
        let controller = handle.controller();

        controller.turn(Direction::Left);
        controller.turn(Direction::Up);
        wait_ticks(1).await;

        // last request wins
        let states = broadcaster.states();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].direction, Direction::Up);
        assert_eq!(states[0].snake.head(), Point::new(10, 9));

        // reversal is ignored, the snake keeps heading up
        controller.turn(Direction::Down);
        wait_ticks(1).await;
        let states = broadcaster.states();
        assert_eq!(states[1].direction, Direction::Up);
        assert_eq!(states[1].snake.head(), Point::new(10, 8));

        controller.stop();
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_until_toggled_again() {
        let broadcaster = RecordingBroadcaster::default();
        let handle = spawn(Controller::Human, &settings(GameMode::PassThrough, None), &broadcaster);
        let controller = handle.controller();

        controller.toggle_pause();
        wait_ticks(4).await;

        let frozen = broadcaster.states();
        assert_eq!(frozen.len(), 4);
        for state in &frozen {
            assert!(state.is_paused);
            assert_eq!(state.snake.head(), Point::new(10, 10));
        }

        controller.toggle_pause();
        wait_ticks(2).await;
        let last = broadcaster.states().last().cloned().unwrap();
        assert!(!last.is_paused);
        assert_eq!(last.snake.head(), Point::new(12, 10));

        controller.stop();
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_limit_ends_session() {
        let broadcaster = RecordingBroadcaster::default();
        let handle = spawn(Controller::Bot, &settings(GameMode::PassThrough, Some(20)), &broadcaster);

        let end = handle.join().await.unwrap();
        assert!(matches!(end, SessionEnd::Stopped { ticks: 20, .. }));
        assert_eq!(broadcaster.states().len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_with_same_seed_run_independently_and_identically() {
        let first = RecordingBroadcaster::default();
        let second = RecordingBroadcaster::default();
        let settings = settings(GameMode::Walls, Some(30));

        let a = spawn(Controller::Bot, &settings, &first);
        let b = spawn(Controller::Bot, &settings, &second);

        let (end_a, end_b) = tokio::join!(a.join(), b.join());
        assert_eq!(end_a.unwrap(), end_b.unwrap());
        assert_eq!(first.states(), second.states());
    }

    #[tokio::test]
    async fn test_invalid_settings_are_rejected() {
        let broadcaster = RecordingBroadcaster::default();
        let bad = SnakeSessionSettings {
            grid_size: 2,
            ..settings(GameMode::Walls, None)
        };
        let result = SnakeSession::spawn(
            SessionId::from("bad"),
            PlayerId::from("tester"),
            Controller::Human,
            &bad,
            1,
            broadcaster,
        );
        assert!(matches!(result, Err(SnakeError::InvalidArgument(_))));
    }
}
