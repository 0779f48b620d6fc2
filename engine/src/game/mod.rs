mod difficulty;
mod events;
mod game_state;
mod session;
mod session_rng;
mod settings;
mod snake;
mod snapshot;
mod spawn;
mod types;

pub use difficulty::DifficultyCurve;
pub use events::{InputEvent, SessionEvent};
pub use game_state::{SnakeGameState, StepOutcome};
pub use session::{GameBroadcaster, GameSession, Phase, SessionReaction, run};
pub use session_rng::SessionRng;
pub use settings::GameSettings;
pub use snake::Snake;
pub use snapshot::GameSnapshot;
pub use spawn::{SpawnError, free_cell};
pub use types::{DeathReason, Direction, FieldSize, Point};
