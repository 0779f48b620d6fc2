use std::collections::{HashSet, VecDeque};

use super::types::{Direction, FieldSize, Point};

/// The player snake. Head at the front of the deque; the hash set mirrors the
/// body for O(1) collision lookups.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
}

impl Snake {
    pub fn new(head: Point, direction: Direction, length: usize, field_size: &FieldSize) -> Self {
        // Body segments extend behind the head, against the travel direction.
        let (dx, dy) = match direction {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (1, 0),
            Direction::Right => (-1, 0),
        };

        let mut body = VecDeque::with_capacity(length);
        let mut body_set = HashSet::with_capacity(length);
        let mut segment = head;
        for _ in 0..length {
            body.push_back(segment);
            body_set.insert(segment);
            segment = field_size.offset(segment, dx, dy);
        }

        Self {
            body,
            body_set,
            direction,
            pending_direction: None,
        }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, position: Point) -> bool {
        self.body_set.contains(&position)
    }

    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn grow_head(&mut self, position: Point) {
        self.body.push_front(position);
        self.body_set.insert(position);
    }

    pub fn drop_tail(&mut self) {
        let tail = self
            .body
            .pop_back()
            .expect("Snake body should never be empty");
        self.body_set.remove(&tail);
    }

    #[cfg(test)]
    pub(crate) fn from_segments(segments: &[Point], direction: Direction) -> Self {
        Self {
            body: segments.iter().copied().collect(),
            body_set: segments.iter().copied().collect(),
            direction,
            pending_direction: None,
        }
    }
}
