use std::collections::HashSet;

use super::session_rng::SessionRng;
use super::types::{FieldSize, Point};

const MAX_SAMPLE_ATTEMPTS: usize = 100;

/// Raised when every cell of the grid is excluded. This is an internal
/// invariant violation, not an ordinary game over.
#[derive(Debug)]
pub enum SpawnError {
    GridExhausted { cells: usize },
}

impl std::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnError::GridExhausted { cells } => {
                write!(f, "No free cell left on a grid of {} cells", cells)
            }
        }
    }
}

impl std::error::Error for SpawnError {}

/// Picks a cell uniformly from the complement of `occupied`.
///
/// Rejection sampling is tried first; once that gives up the free cells are
/// enumerated outright, so the call always terminates.
pub fn free_cell(
    field_size: &FieldSize,
    occupied: &HashSet<Point>,
    rng: &mut SessionRng,
) -> Result<Point, SpawnError> {
    if occupied.len() < field_size.cell_count() {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let candidate = Point::new(
                rng.random_range(0..field_size.width),
                rng.random_range(0..field_size.height),
            );
            if !occupied.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }

    let free: Vec<Point> = (0..field_size.height)
        .flat_map(|y| (0..field_size.width).map(move |x| Point::new(x, y)))
        .filter(|position| !occupied.contains(position))
        .collect();

    if free.is_empty() {
        return Err(SpawnError::GridExhausted {
            cells: field_size.cell_count(),
        });
    }

    Ok(free[rng.random_range(0..free.len())])
}
