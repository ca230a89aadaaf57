use crossterm::style::Color;
use serde::Serialize;

/// A cell coordinate on the grid. `y` grows downwards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// The position one step away in the given direction. May be out of bounds.
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl From<Position> for (i32, i32) {
    fn from(position: Position) -> (i32, i32) {
        (position.x, position.y)
    }
}

/// Represents the direction a snake can move.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction in the order free directions are reported.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The direction a snake standing at `from` has to take to arrive at `to`.
    ///
    /// Returns `None` when the two positions are not 4-directionally adjacent.
    pub fn towards(from: Position, to: Position) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Role {
    Head,
    Body,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Segment {
    pub position: Position,
    pub role: Role,
}

impl Segment {
    pub fn new(position: Position, role: Role) -> Segment {
        Segment { position, role }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    pub fn new(position: Position) -> Food {
        Food { position }
    }
}

/// What a grid cell can hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Occupant {
    /// A segment of the snake registered at index `snake`.
    Segment { snake: usize, role: Role },
    Food,
}

impl Occupant {
    pub fn is_food(&self) -> bool {
        matches!(self, Occupant::Food)
    }

    pub fn char(&self) -> char {
        style(self.role()).0
    }

    pub fn color(&self) -> Color {
        style(self.role()).1
    }

    fn role(&self) -> Option<Role> {
        match self {
            Occupant::Segment { role, .. } => Some(*role),
            Occupant::Food => None,
        }
    }
}

// Food is the only occupant without a role
fn style(role: Option<Role>) -> (char, Color) {
    match role {
        Some(Role::Head) => ('@', Color::Blue),
        Some(Role::Body) => ('o', Color::Red),
        None => ('*', Color::Green),
    }
}

/// Everything a renderer needs to paint one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCell {
    pub position: Position,
    pub char: char,
    pub color: Color,
}

/// An entity that can be drawn by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drawable {
    Segment(Segment),
    Food(Food),
}

impl Drawable {
    pub fn render(&self) -> RenderCell {
        let (position, role) = match self {
            Drawable::Segment(segment) => (segment.position, Some(segment.role)),
            Drawable::Food(food) => (food.position, None),
        };
        let (char, color) = style(role);

        RenderCell {
            position,
            char,
            color,
        }
    }
}
