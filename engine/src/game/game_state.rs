use std::collections::HashSet;

use crate::log;

use super::difficulty::DifficultyCurve;
use super::session_rng::SessionRng;
use super::settings::GameSettings;
use super::snake::Snake;
use super::spawn::{self, SpawnError};
use super::types::{DeathReason, Direction, FieldSize, Point};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub ate_food: bool,
    pub death: Option<DeathReason>,
}

/// One session worth of simulation state: the snake, the consumables, the
/// obstacles and the score/speed counters. Mutated only by `advance` and
/// `set_direction`; everything is rebuilt from settings on a new session.
pub struct SnakeGameState {
    snake: Snake,
    food: Point,
    poison: Point,
    obstacles: HashSet<Point>,
    score: u32,
    speed: u32,
    field_size: FieldSize,
    difficulty: DifficultyCurve,
    death_reason: Option<DeathReason>,
}

impl SnakeGameState {
    pub fn new(settings: &GameSettings, rng: &mut SessionRng) -> Result<Self, SpawnError> {
        let field_size = settings.field_size();
        let start = Point::new(field_size.width / 2, field_size.height / 2);
        let snake = Snake::new(start, Direction::Right, settings.initial_snake_length, &field_size);

        let mut occupied: HashSet<Point> = snake.segments().collect();
        let food = spawn::free_cell(&field_size, &occupied, rng)?;
        occupied.insert(food);
        let poison = spawn::free_cell(&field_size, &occupied, rng)?;

        Ok(Self {
            snake,
            food,
            poison,
            obstacles: HashSet::new(),
            score: 0,
            speed: settings.initial_speed,
            field_size,
            difficulty: DifficultyCurve::new(settings.obstacle_threshold, settings.speed_increment),
            death_reason: None,
        })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn poison(&self) -> Point {
        self.poison
    }

    pub fn obstacles(&self) -> &HashSet<Point> {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn field_size(&self) -> FieldSize {
        self.field_size
    }

    pub fn is_alive(&self) -> bool {
        self.death_reason.is_none()
    }

    /// Queues a direction change for the next tick. A request for the exact
    /// opposite of the current travel direction is ignored; among valid
    /// requests the most recent one wins.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.is_alive() && !direction.is_opposite(&self.snake.direction) {
            self.snake.pending_direction = Some(direction);
        }
    }

    /// Advances the simulation by one cell.
    pub fn advance(&mut self, rng: &mut SessionRng) -> Result<StepOutcome, SpawnError> {
        if let Some(reason) = self.death_reason {
            return Ok(StepOutcome {
                ate_food: false,
                death: Some(reason),
            });
        }

        if let Some(direction) = self.snake.pending_direction.take() {
            self.snake.direction = direction;
        }

        let next_head = self.field_size.step(self.snake.head(), self.snake.direction);

        if let Some(reason) = self.check_collision(next_head) {
            self.death_reason = Some(reason);
            log!(
                "Fatal collision at ({}, {}): {:?}. Final score: {}",
                next_head.x,
                next_head.y,
                reason,
                self.score
            );
            return Ok(StepOutcome {
                ate_food: false,
                death: Some(reason),
            });
        }

        let grows = next_head == self.food;

        // The tail leaves before the head lands, keeping the body set exact
        // when the head moves into the cell the tail is vacating.
        if !grows {
            self.snake.drop_tail();
        }
        self.snake.grow_head(next_head);

        if grows {
            self.score += 1;
            log!(
                "Ate food at ({}, {}). Score: {}",
                next_head.x,
                next_head.y,
                self.score
            );
            self.respawn_consumables(rng)?;
            if self.difficulty.should_advance(self.score) {
                self.raise_difficulty(rng)?;
            }
        }

        Ok(StepOutcome {
            ate_food: grows,
            death: None,
        })
    }

    fn check_collision(&self, next_head: Point) -> Option<DeathReason> {
        if next_head == self.poison {
            return Some(DeathReason::PoisonEaten);
        }
        if self.obstacles.contains(&next_head) {
            return Some(DeathReason::ObstacleCollision);
        }

        // The tail cell is vacated on the same tick unless the snake grows,
        // so moving into it is only fatal on a growth tick.
        let grows = next_head == self.food;
        if self.snake.occupies(next_head) && (grows || next_head != self.snake.tail()) {
            return Some(DeathReason::SelfCollision);
        }

        None
    }

    fn respawn_consumables(&mut self, rng: &mut SessionRng) -> Result<(), SpawnError> {
        let mut occupied: HashSet<Point> = self.snake.segments().collect();
        occupied.extend(self.obstacles.iter().copied());

        self.food = spawn::free_cell(&self.field_size, &occupied, rng)?;
        occupied.insert(self.food);
        self.poison = spawn::free_cell(&self.field_size, &occupied, rng)?;
        Ok(())
    }

    fn raise_difficulty(&mut self, rng: &mut SessionRng) -> Result<(), SpawnError> {
        self.speed += self.difficulty.speed_increment();

        let mut occupied: HashSet<Point> = self.snake.segments().collect();
        occupied.extend(self.obstacles.iter().copied());
        occupied.insert(self.food);
        occupied.insert(self.poison);

        let obstacle = spawn::free_cell(&self.field_size, &occupied, rng)?;
        self.obstacles.insert(obstacle);
        log!(
            "Speed raised to {}, obstacle added at ({}, {})",
            self.speed,
            obstacle.x,
            obstacle.y
        );
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn place_snake(&mut self, segments: &[Point], direction: Direction) {
        self.snake = Snake::from_segments(segments, direction);
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, position: Point) {
        self.food = position;
    }

    #[cfg(test)]
    pub(crate) fn set_poison(&mut self, position: Point) {
        self.poison = position;
    }

    #[cfg(test)]
    pub(crate) fn add_obstacle(&mut self, position: Point) {
        self.obstacles.insert(position);
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
