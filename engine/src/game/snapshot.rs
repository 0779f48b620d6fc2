use super::session::Phase;
use super::types::{FieldSize, Point};

/// Read-only view of the simulation, rebuilt for the renderer on every tick.
/// Carries everything needed to draw a frame without simulation knowledge.
#[derive(Clone, Debug)]
pub struct GameSnapshot {
    pub phase: Phase,
    /// Snake segments, head first. Empty outside a session.
    pub snake: Vec<Point>,
    pub food: Option<Point>,
    pub poison: Option<Point>,
    pub obstacles: Vec<Point>,
    pub score: u32,
    pub speed: u32,
    pub high_score: u32,
    pub field_size: FieldSize,
}
