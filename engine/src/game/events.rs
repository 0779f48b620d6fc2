use super::types::{DeathReason, Direction};

/// Decoded input events, fed to the session strictly one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
    /// Any other key press. Only meaningful on the start screen.
    AnyKey,
}

/// Events the session emits for external audio/UI hooks. They carry no
/// behavior of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    FoodEaten,
    GameOver {
        final_score: u32,
        new_high_score: bool,
        reason: DeathReason,
    },
}
