mod config;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use snake_engine::config::load_yaml_config;
use snake_engine::game::{
    Direction, GameBroadcaster, GameSession, GameSnapshot, InputEvent, SessionEvent, SessionRng,
    run,
};
use snake_engine::highscore::FileHighScoreStore;
use snake_engine::{log, logger};

use config::AppConfig;

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    /// Path to the YAML config file
    #[arg(long, default_value = "snake.yaml")]
    config: PathBuf,

    /// Fixed RNG seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

/// Logs semantic events; frames are for a real renderer, which this headless
/// shell does not have.
#[derive(Clone)]
struct LogBroadcaster;

impl GameBroadcaster for LogBroadcaster {
    async fn broadcast_frame(&self, _frame: GameSnapshot) {}

    async fn broadcast_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::FoodEaten => log!("Food eaten"),
            SessionEvent::GameOver {
                final_score,
                new_high_score,
                reason,
            } => {
                if new_high_score {
                    log!("Game over ({:?}). New high score: {}", reason, final_score);
                } else {
                    log!("Game over ({:?}). Score: {}", reason, final_score);
                }
            }
        }
    }
}

fn decode_line(line: &str) -> Option<InputEvent> {
    let event = match line.trim().to_lowercase().as_str() {
        "" => return None,
        "up" | "w" | "k" => InputEvent::Turn(Direction::Up),
        "down" | "s" | "j" => InputEvent::Turn(Direction::Down),
        "left" | "a" | "h" => InputEvent::Turn(Direction::Left),
        "right" | "d" | "l" => InputEvent::Turn(Direction::Right),
        "p" | "pause" => InputEvent::TogglePause,
        "r" | "restart" => InputEvent::Restart,
        "q" | "quit" => InputEvent::Quit,
        _ => InputEvent::AnyKey,
    };
    Some(event)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let app_config: AppConfig = load_yaml_config(&args.config)?;

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Session seed: {}", rng.seed());

    let store = FileHighScoreStore::new(app_config.high_score_file.as_str());
    let session = GameSession::new(app_config.game, store, rng);

    let (command_tx, command_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(event) = decode_line(&line) else {
                continue;
            };
            if command_tx.send(event).is_err() {
                break;
            }
        }
        // EOF drops the sender; the closed channel stops the session loop.
    });

    run(session, command_rx, LogBroadcaster).await?;

    log!("Exited cleanly");
    Ok(())
}
