use crate::entities::{Direction, Food, Position, Role, Segment};
use crate::pathfinding::find_path;
use crate::perception::Perception;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use tracing::trace;
use uuid::Uuid;

/// A snake splits in two once it reaches this many segments.
pub const MAX_SIZE: usize = 8;

/// The action a snake chose for the current tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Stay,
    Move(Direction),
    Eat(Direction),
    Reproduce,
}

/// A chain of segments hunting for food.
///
/// The front of `segments` is the head and the back is the tail.
#[derive(Clone, Debug)]
pub struct Snake {
    id: String,
    segments: VecDeque<Segment>,
    path: Option<VecDeque<Direction>>,
    needs_new_path: bool,
}

impl Snake {
    /// Creates the snake every simulation starts with: four segments on row 1,
    /// head at (4, 1) facing right.
    pub fn initial() -> Snake {
        Snake::from_positions(&[
            Position::new(4, 1),
            Position::new(3, 1),
            Position::new(2, 1),
            Position::new(1, 1),
        ])
    }

    /// Creates a snake from its positions, head first.
    pub fn from_positions(positions: &[Position]) -> Snake {
        let mut snake = Snake::empty();
        for position in positions {
            snake.push_back(Segment::new(*position, Role::Body));
        }
        snake
    }

    fn empty() -> Snake {
        Snake {
            id: Uuid::new_v4().to_string(),
            segments: VecDeque::new(),
            path: None,
            needs_new_path: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Position of the head.
    ///
    /// # Panics
    /// Panics if the snake has no segments. Snakes are always built with at least one.
    pub fn head(&self) -> Position {
        self.segments
            .front()
            .map(|segment| segment.position)
            .expect("A snake always has a head")
    }

    pub fn tail(&self) -> Option<Position> {
        self.segments.back().map(|segment| segment.position)
    }

    /// Segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.segments
            .iter()
            .map(|segment| segment.position)
            .collect()
    }

    pub fn path(&self) -> Option<&VecDeque<Direction>> {
        self.path.as_ref()
    }

    pub fn needs_new_path(&self) -> bool {
        self.needs_new_path
    }

    /// Forces the path to be recomputed the next time the snake needs it.
    pub fn invalidate_path(&mut self) {
        self.needs_new_path = true;
    }

    /// Moves the snake one cell by recycling the tail segment as the new head.
    pub fn move_towards(&mut self, direction: Direction) {
        let head = self.head();
        if let Some(mut segment) = self.segments.pop_back() {
            segment.position = head.step(direction);
            self.push_front(segment);
        }
    }

    /// Grows the snake onto the food's cell and returns the new head segment.
    pub fn eat(&mut self, food: &Food) -> Segment {
        let segment = Segment::new(food.position, Role::Head);
        self.push_front(segment);
        segment
    }

    /// Splits off the back half of the snake into a new snake.
    ///
    /// Segments are taken from the tail one by one, so the old tail becomes the new snake's head.
    pub fn reproduce(&mut self) -> Snake {
        let mut offspring = Snake::empty();
        for _ in 0..MAX_SIZE / 2 {
            if self.segments.len() <= 1 {
                break;
            }

            if let Some(segment) = self.segments.pop_back() {
                offspring.push_back(segment);
            }
        }
        offspring
    }

    /// Decides what to do this tick.
    ///
    /// In order: reproduce when full, eat adjacent food (checking down, up, left, right),
    /// stay when boxed in, otherwise follow the cached path to the food, replanning when
    /// needed and falling back to a random free direction.
    pub fn choose_action<R: Rng + ?Sized>(&mut self, perception: &Perception, rng: &mut R) -> Action {
        if self.len() == MAX_SIZE {
            return Action::Reproduce;
        }

        for direction in [
            Direction::Down,
            Direction::Up,
            Direction::Left,
            Direction::Right,
        ] {
            if perception.neighbor(direction).is_some_and(|occupant| occupant.is_food()) {
                return Action::Eat(direction);
            }
        }

        let free_directions = perception.free_directions();
        if free_directions.is_empty() {
            return Action::Stay;
        }

        if self.path.is_none() || self.needs_new_path {
            self.path = Some(find_path(perception));
            self.needs_new_path = false;
        }

        if let Some(direction) = self.follow_path(perception) {
            return Action::Move(direction);
        }

        // The cached path is blocked, try once more with a fresh one
        if self.path.as_ref().is_some_and(|path| !path.is_empty()) {
            trace!(snake = %self.id, "cached path is blocked, replanning");
            self.path = Some(find_path(perception));
            if let Some(direction) = self.follow_path(perception) {
                return Action::Move(direction);
            }
        }

        self.needs_new_path = true;
        match free_directions.choose(rng) {
            Some(direction) => Action::Move(*direction),
            None => Action::Stay,
        }
    }

    // Consumes the next step of the path if it leads to a free cell
    fn follow_path(&mut self, perception: &Perception) -> Option<Direction> {
        let path = self.path.as_mut()?;
        let next = *path.front()?;
        if !perception.is_free(next) {
            return None;
        }
        path.pop_front()
    }

    fn push_front(&mut self, mut segment: Segment) {
        if let Some(head) = self.segments.front_mut() {
            head.role = Role::Body;
        }
        segment.role = Role::Head;
        self.segments.push_front(segment);
    }

    fn push_back(&mut self, mut segment: Segment) {
        segment.role = match self.segments.is_empty() {
            true => Role::Head,
            false => Role::Body,
        };
        self.segments.push_back(segment);
    }
}
