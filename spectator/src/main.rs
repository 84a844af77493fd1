mod broadcaster;
mod config;
mod leaderboard;
mod live_games;

use std::sync::Arc;
use chrono::Local;
use clap::Parser;
use tokio::sync::Mutex;

use snake_common::games::SessionRng;
use snake_common::games::snake::{Controller, GameMode, SessionController, SessionEnd, SnakeSession};
use snake_common::id_generator::generate_player_name;
use snake_common::{PlayerId, SessionId, log, logger};
use broadcaster::SpectatorBroadcaster;
use leaderboard::Leaderboard;
use live_games::LiveGames;

#[derive(Parser)]
#[command(name = "snake_spectator", about = "Runs bot-driven snake games and ranks the results")]
struct Args {
    /// Path to the YAML config; defaults are used when the file is missing
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: String,

    /// Number of concurrent games, overrides the config
    #[arg(long)]
    games: Option<u32>,

    /// walls or pass-through, overrides the config
    #[arg(long)]
    mode: Option<String>,

    /// Base seed; game N uses seed + N
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Spectator".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = config::get_config_manager(&args.config).get_config()?;
    let mode = match args.mode.as_deref() {
        Some(mode) => mode.parse::<GameMode>()?,
        None => config.game.mode,
    };
    let games = args.games.unwrap_or(config.spectate.games);
    config::validate_games(games).map_err(|e| format!("--games: {}", e))?;
    let base_seed = match args.seed {
        Some(seed) => seed,
        None => rand::random(),
    };

    let settings = config.session_settings(mode);
    let live_games = LiveGames::new();
    let leaderboard = Arc::new(Mutex::new(Leaderboard::new(config.spectate.leaderboard_size as usize)));
    let broadcaster = SpectatorBroadcaster::new(
        live_games.clone(),
        leaderboard.clone(),
        config.spectate.log_every_ticks as u64,
    );

    log!(
        "Spectating {} {} games on a {}x{} grid (seed {})",
        games,
        mode,
        settings.grid_size,
        settings.grid_size,
        base_seed
    );

    let mut name_rng = SessionRng::new(base_seed);
    let mut handles = Vec::with_capacity(games as usize);
    for index in 0..games {
        let session_id = SessionId::new(format!("live-{}", index + 1));
        let player_id = PlayerId::new(generate_player_name(&mut name_rng));
        live_games.register(session_id.clone(), player_id.clone(), mode).await;

        let seed = base_seed.wrapping_add(index as u64);
        let handle = SnakeSession::spawn(
            session_id,
            player_id,
            Controller::Bot,
            &settings,
            seed,
            broadcaster.clone(),
        )?;
        handles.push(handle);
    }

    let controllers: Vec<SessionController> = handles.iter().map(|handle| handle.controller()).collect();
    let running = live_games.clone();
    let shutdown_signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log!("Shutdown signal received, stopping {} games...", controllers.len());
            for game in running.list().await {
                log!(
                    "[session:{}] {} ({}) at {} points, {} ticks, running for {}s",
                    game.session_id,
                    game.player_id,
                    game.mode,
                    game.current_score,
                    game.ticks,
                    (Local::now() - game.started_at).num_seconds()
                );
            }
            for controller in &controllers {
                controller.stop();
            }
        }
    });

    for handle in handles {
        let session_id = handle.session_id().clone();
        match handle.join().await {
            Ok(SessionEnd::GameOver(_)) => {}
            Ok(SessionEnd::Stopped { state, ticks }) => {
                let player = live_games
                    .remove(&session_id)
                    .await
                    .map(|game| game.player_id.to_string())
                    .unwrap_or_default();
                log!(
                    "[session:{}] {} stopped with {} points after {} ticks",
                    session_id,
                    player,
                    state.score,
                    ticks
                );
            }
            Err(e) => log!("[session:{}] failed: {}", session_id, e),
        }
    }
    shutdown_signal.abort();

    let leaderboard = leaderboard.lock().await;
    if leaderboard.entries().is_empty() {
        log!("No finished games made the leaderboard");
    }
    for (index, entry) in leaderboard.entries().iter().enumerate() {
        log!(
            "#{} {} - {} points ({}, {} ticks) at {}",
            index + 1,
            entry.player_id,
            entry.score,
            entry.mode,
            entry.ticks,
            entry.timestamp.format("%H:%M:%S")
        );
    }

    Ok(())
}
