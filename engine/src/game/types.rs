#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }
}

/// Extents of the toroidal playing field, in grid cells. Up decreases `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSize {
    pub width: usize,
    pub height: usize,
}

impl FieldSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn wrapping_inc(value: usize, max: usize) -> usize {
        if value + 1 >= max {
            0
        } else {
            value + 1
        }
    }

    pub fn wrapping_dec(value: usize, max: usize) -> usize {
        if value == 0 {
            max - 1
        } else {
            value - 1
        }
    }

    /// One-cell step with wraparound on both axes.
    pub fn step(&self, from: Point, direction: Direction) -> Point {
        match direction {
            Direction::Up => Point::new(from.x, Self::wrapping_dec(from.y, self.height)),
            Direction::Down => Point::new(from.x, Self::wrapping_inc(from.y, self.height)),
            Direction::Left => Point::new(Self::wrapping_dec(from.x, self.width), from.y),
            Direction::Right => Point::new(Self::wrapping_inc(from.x, self.width), from.y),
        }
    }

    /// Arbitrary displacement with wraparound. Negative results wrap to
    /// `extent - 1` instead of going out of bounds.
    pub fn offset(&self, from: Point, dx: i32, dy: i32) -> Point {
        let width = self.width as i64;
        let height = self.height as i64;
        Point::new(
            (from.x as i64 + i64::from(dx)).rem_euclid(width) as usize,
            (from.y as i64 + i64::from(dy)).rem_euclid(height) as usize,
        )
    }
}

/// Cause of a fatal collision, carried by the game-over notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    PoisonEaten,
    ObstacleCollision,
    SelfCollision,
}
