use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;

use crate::highscore::HighScoreStore;
use crate::log;

use super::events::{InputEvent, SessionEvent};
use super::game_state::SnakeGameState;
use super::session_rng::SessionRng;
use super::settings::GameSettings;
use super::snapshot::GameSnapshot;
use super::spawn::SpawnError;

/// Lifecycle phase of a play session. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    Paused,
    GameOver {
        final_score: u32,
        new_high_score: bool,
    },
}

/// What the driver should do after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionReaction {
    Continue,
    Exit,
}

/// Outbound boundary towards the renderer and the audio/UI hooks.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_frame(&self, frame: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_event(&self, event: SessionEvent) -> impl Future<Output = ()> + Send;
}

/// The session state machine. Owns every per-session entity and the cached
/// high score; routes input events to lifecycle transitions or the engine.
pub struct GameSession<S: HighScoreStore> {
    settings: GameSettings,
    rng: SessionRng,
    store: S,
    high_score: u32,
    phase: Phase,
    world: Option<SnakeGameState>,
}

impl<S: HighScoreStore> GameSession<S> {
    pub fn new(settings: GameSettings, store: S, rng: SessionRng) -> Self {
        let high_score = store.load();
        Self {
            settings,
            rng,
            store,
            high_score,
            phase: Phase::Start,
            world: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Duration of one tick at the current speed.
    pub fn tick_interval(&self) -> Duration {
        let speed = self
            .world
            .as_ref()
            .map_or(self.settings.initial_speed, |world| world.speed());
        // interval() panics on a zero period.
        Duration::from_millis((1000 / u64::from(speed.max(1))).max(1))
    }

    /// Routes one input event. Inputs a phase does not accept are silently
    /// ignored; `Quit` is honored in every phase.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<SessionReaction, SpawnError> {
        if event == InputEvent::Quit {
            return Ok(SessionReaction::Exit);
        }

        match self.phase {
            // Any key leaves the start screen.
            Phase::Start => self.begin_session()?,
            Phase::Playing => match event {
                InputEvent::Turn(direction) => {
                    if let Some(world) = self.world.as_mut() {
                        world.set_direction(direction);
                    }
                }
                InputEvent::TogglePause => self.phase = Phase::Paused,
                _ => {}
            },
            Phase::Paused => {
                if event == InputEvent::TogglePause {
                    self.phase = Phase::Playing;
                }
            }
            Phase::GameOver { .. } => {
                if event == InputEvent::Restart {
                    self.begin_session()?;
                }
            }
        }

        Ok(SessionReaction::Continue)
    }

    /// Advances the simulation by one tick. A no-op outside the Playing
    /// phase, so a stray tick while paused cannot move the snake.
    pub fn tick(&mut self) -> Result<Vec<SessionEvent>, SpawnError> {
        if self.phase != Phase::Playing {
            return Ok(Vec::new());
        }
        let Some(world) = self.world.as_mut() else {
            return Ok(Vec::new());
        };

        let outcome = world.advance(&mut self.rng)?;
        let mut events = Vec::new();

        if outcome.ate_food {
            events.push(SessionEvent::FoodEaten);
        }

        if let Some(reason) = outcome.death {
            let final_score = world.score();
            let new_high_score = final_score > self.high_score;
            if new_high_score {
                self.high_score = final_score;
                if let Err(e) = self.store.save(final_score) {
                    log!("Failed to persist high score {}: {}", final_score, e);
                }
            }

            self.world = None;
            self.phase = Phase::GameOver {
                final_score,
                new_high_score,
            };
            events.push(SessionEvent::GameOver {
                final_score,
                new_high_score,
                reason,
            });
        }

        Ok(events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (score, speed) = match (&self.phase, self.world.as_ref()) {
            (Phase::GameOver { final_score, .. }, _) => (*final_score, self.settings.initial_speed),
            (_, Some(world)) => (world.score(), world.speed()),
            (_, None) => (0, self.settings.initial_speed),
        };

        GameSnapshot {
            phase: self.phase,
            snake: self
                .world
                .as_ref()
                .map(|world| world.snake().segments().collect())
                .unwrap_or_default(),
            food: self.world.as_ref().map(|world| world.food()),
            poison: self.world.as_ref().map(|world| world.poison()),
            obstacles: self
                .world
                .as_ref()
                .map(|world| world.obstacles().iter().copied().collect())
                .unwrap_or_default(),
            score,
            speed,
            high_score: self.high_score,
            field_size: self.settings.field_size(),
        }
    }

    fn begin_session(&mut self) -> Result<(), SpawnError> {
        self.world = Some(SnakeGameState::new(&self.settings, &mut self.rng)?);
        self.phase = Phase::Playing;
        log!(
            "New session started on a {}x{} field",
            self.settings.field_width,
            self.settings.field_height
        );
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut SnakeGameState {
        self.world.as_mut().expect("No active session")
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

/// Drives a session until the player quits or the command stream closes.
///
/// While Playing, ticks race against incoming commands; in every other phase
/// the loop parks on the command channel, so idle screens consume nothing.
pub async fn run<S, B>(
    mut session: GameSession<S>,
    mut commands: mpsc::UnboundedReceiver<InputEvent>,
    broadcaster: B,
) -> Result<(), SpawnError>
where
    S: HighScoreStore,
    B: GameBroadcaster,
{
    broadcaster.broadcast_frame(session.snapshot()).await;

    let mut ticker = interval(session.tick_interval());

    loop {
        if session.phase() == Phase::Playing {
            tokio::select! {
                _ = ticker.tick() => {
                    for event in session.tick()? {
                        broadcaster.broadcast_event(event).await;
                    }
                    broadcaster.broadcast_frame(session.snapshot()).await;
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if session.handle_input(command)? == SessionReaction::Exit {
                        break;
                    }
                    broadcaster.broadcast_frame(session.snapshot()).await;
                }
            }

            // Difficulty bumps shorten the tick on the fly.
            if ticker.period() != session.tick_interval() {
                ticker = interval(session.tick_interval());
            }
        } else {
            let Some(command) = commands.recv().await else { break };
            if session.handle_input(command)? == SessionReaction::Exit {
                break;
            }
            broadcaster.broadcast_frame(session.snapshot()).await;
            ticker = interval(session.tick_interval());
        }
    }

    log!("Session loop stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscore::{HighScoreError, MemoryHighScoreStore};
    use crate::game::types::{DeathReason, Direction, Point};

    fn new_session() -> GameSession<MemoryHighScoreStore> {
        GameSession::new(
            GameSettings::default(),
            MemoryHighScoreStore::default(),
            SessionRng::new(42),
        )
    }

    fn playing_session() -> GameSession<MemoryHighScoreStore> {
        let mut session = new_session();
        session.handle_input(InputEvent::AnyKey).unwrap();
        session
    }

    /// Parks the snake on a known row with the doom cell one step ahead.
    fn doom_next_step<S: HighScoreStore>(session: &mut GameSession<S>, score: u32) {
        let world = session.world_mut();
        world.place_snake(
            &[Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)],
            Direction::Right,
        );
        world.set_food(Point::new(20, 20));
        world.set_poison(Point::new(25, 25));
        world.add_obstacle(Point::new(6, 5));
        world.set_score(score);
    }

    #[test]
    fn test_any_key_starts_a_session() {
        let mut session = new_session();
        assert_eq!(session.phase(), Phase::Start);

        session.handle_input(InputEvent::AnyKey).unwrap();
        assert_eq!(session.phase(), Phase::Playing);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.snake.len(), 3);
        assert_eq!(snapshot.score, 0);
        assert!(snapshot.food.is_some());
        assert!(snapshot.poison.is_some());
    }

    #[test]
    fn test_direction_key_also_starts_a_session() {
        let mut session = new_session();
        session
            .handle_input(InputEvent::Turn(Direction::Up))
            .unwrap();
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_quit_exits_from_every_phase() {
        let mut session = new_session();
        assert_eq!(
            session.handle_input(InputEvent::Quit).unwrap(),
            SessionReaction::Exit
        );

        let mut session = playing_session();
        assert_eq!(
            session.handle_input(InputEvent::Quit).unwrap(),
            SessionReaction::Exit
        );

        session.handle_input(InputEvent::TogglePause).unwrap();
        assert_eq!(
            session.handle_input(InputEvent::Quit).unwrap(),
            SessionReaction::Exit
        );
    }

    #[test]
    fn test_pause_freezes_the_simulation() {
        let mut session = playing_session();
        session.handle_input(InputEvent::TogglePause).unwrap();
        assert_eq!(session.phase(), Phase::Paused);

        let before = session.snapshot();
        assert!(session.tick().unwrap().is_empty());
        let after = session.snapshot();
        assert_eq!(before.snake, after.snake);
        assert_eq!(before.score, after.score);

        session.handle_input(InputEvent::TogglePause).unwrap();
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_paused_ignores_other_input() {
        let mut session = playing_session();
        session.handle_input(InputEvent::TogglePause).unwrap();

        session
            .handle_input(InputEvent::Turn(Direction::Up))
            .unwrap();
        session.handle_input(InputEvent::Restart).unwrap();
        assert_eq!(session.phase(), Phase::Paused);
    }

    #[test]
    fn test_restart_is_ignored_while_playing() {
        let mut session = playing_session();
        session.handle_input(InputEvent::Restart).unwrap();
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_tick_outside_playing_is_a_noop() {
        let mut session = new_session();
        assert!(session.tick().unwrap().is_empty());
        assert_eq!(session.phase(), Phase::Start);
    }

    #[test]
    fn test_fatal_collision_reports_pre_collision_score() {
        let mut session = playing_session();
        doom_next_step(&mut session, 3);

        let events = session.tick().unwrap();

        assert_eq!(
            events,
            vec![SessionEvent::GameOver {
                final_score: 3,
                new_high_score: true,
                reason: DeathReason::ObstacleCollision,
            }]
        );
        assert_eq!(
            session.phase(),
            Phase::GameOver {
                final_score: 3,
                new_high_score: true
            }
        );
        assert_eq!(session.high_score(), 3);
        assert_eq!(session.store().load(), 3);
    }

    #[test]
    fn test_high_score_is_never_lowered() {
        let mut session = GameSession::new(
            GameSettings::default(),
            MemoryHighScoreStore::new(100),
            SessionRng::new(42),
        );
        session.handle_input(InputEvent::AnyKey).unwrap();
        doom_next_step(&mut session, 7);

        let events = session.tick().unwrap();

        assert_eq!(
            events,
            vec![SessionEvent::GameOver {
                final_score: 7,
                new_high_score: false,
                reason: DeathReason::ObstacleCollision,
            }]
        );
        assert_eq!(session.high_score(), 100);
        assert_eq!(session.store().load(), 100);
    }

    #[test]
    fn test_failed_save_keeps_in_memory_high_score() {
        #[derive(Default)]
        struct FailingStore;

        impl HighScoreStore for FailingStore {
            fn load(&self) -> u32 {
                0
            }

            fn save(&mut self, _value: u32) -> Result<(), HighScoreError> {
                Err(HighScoreError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only storage",
                )))
            }
        }

        let mut session = GameSession::new(
            GameSettings::default(),
            FailingStore,
            SessionRng::new(42),
        );
        session.handle_input(InputEvent::AnyKey).unwrap();
        doom_next_step(&mut session, 7);

        session.tick().unwrap();
        assert_eq!(session.high_score(), 7);
    }

    #[test]
    fn test_restart_resets_all_session_entities() {
        let mut session = playing_session();
        doom_next_step(&mut session, 12);
        session.tick().unwrap();
        assert!(matches!(session.phase(), Phase::GameOver { .. }));

        // Only restart and quit are accepted here.
        session
            .handle_input(InputEvent::Turn(Direction::Up))
            .unwrap();
        session.handle_input(InputEvent::TogglePause).unwrap();
        assert!(matches!(session.phase(), Phase::GameOver { .. }));

        session.handle_input(InputEvent::Restart).unwrap();
        assert_eq!(session.phase(), Phase::Playing);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.speed, 10);
        assert_eq!(snapshot.snake.len(), 3);
        assert!(snapshot.obstacles.is_empty());
        assert_eq!(snapshot.high_score, 12);
    }

    #[test]
    fn test_game_over_snapshot_has_no_session_entities() {
        let mut session = playing_session();
        doom_next_step(&mut session, 2);
        session.tick().unwrap();

        let snapshot = session.snapshot();
        assert!(snapshot.snake.is_empty());
        assert!(snapshot.food.is_none());
        assert!(snapshot.poison.is_none());
        assert_eq!(snapshot.score, 2);
    }

    #[test]
    fn test_tick_interval_follows_speed() {
        let session = playing_session();
        assert_eq!(session.tick_interval(), Duration::from_millis(100));
    }

    #[derive(Clone)]
    struct NullBroadcaster;

    impl GameBroadcaster for NullBroadcaster {
        async fn broadcast_frame(&self, _frame: GameSnapshot) {}

        async fn broadcast_event(&self, _event: SessionEvent) {}
    }

    #[tokio::test]
    async fn test_run_exits_on_quit() {
        let session = new_session();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        command_tx.send(InputEvent::Quit).unwrap();

        run(session, command_rx, NullBroadcaster).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_exits_when_commands_close() {
        let session = new_session();
        let (command_tx, command_rx) = mpsc::unbounded_channel::<InputEvent>();
        drop(command_tx);

        run(session, command_rx, NullBroadcaster).await.unwrap();
    }
}
