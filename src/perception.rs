use crate::entities::{Direction, Occupant, Position};
use crate::grid::Grid;

/// What a single snake knows about the world when it decides its next action.
///
/// Built by the simulation for one snake on one tick and dropped right after.
#[derive(Clone, Debug)]
pub struct Perception {
    head: Position,
    food: Option<Position>,
    neighbors: [Option<Occupant>; 4],
    free_directions: Vec<Direction>,
    grid: Grid,
}

impl Perception {
    /// Creates the perception of a snake whose head is at `head`.
    ///
    /// # Arguments
    /// * `head` - The position of the snake's head.
    /// * `food` - The position of the food, if there is one in the world.
    /// * `grid` - A copy of the occupancy table taken before the snake acts.
    pub fn new(head: Position, food: Option<Position>, grid: Grid) -> Perception {
        let neighbors = Direction::ALL.map(|direction| grid.get(head.step(direction)));
        let free_directions = Direction::ALL
            .into_iter()
            .zip(neighbors)
            .filter(|(direction, occupant)| {
                occupant.is_none() && grid.contains(head.step(*direction))
            })
            .map(|(direction, _)| direction)
            .collect();

        Perception {
            head,
            food,
            neighbors,
            free_directions,
            grid,
        }
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The occupant one cell away from the head in `direction`.
    pub fn neighbor(&self, direction: Direction) -> Option<Occupant> {
        self.neighbors[direction_index(direction)]
    }

    /// Directions leading to an empty cell inside the grid, in the order up, down, left, right.
    pub fn free_directions(&self) -> &[Direction] {
        &self.free_directions
    }

    pub fn is_free(&self, direction: Direction) -> bool {
        self.free_directions.contains(&direction)
    }
}

fn direction_index(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    #[test]
    fn when_the_head_is_in_an_empty_grid_every_direction_is_free() {
        let perception = Perception::new(Position::new(1, 1), None, Grid::new(3, 3));

        assert_eq!(perception.free_directions(), &Direction::ALL);
        assert!(Direction::ALL
            .iter()
            .all(|direction| perception.neighbor(*direction).is_none()));
    }

    #[test]
    fn when_the_head_is_in_a_corner_directions_out_of_the_grid_are_not_free() {
        let perception = Perception::new(Position::new(0, 0), None, Grid::new(3, 3));

        assert_eq!(
            perception.free_directions(),
            &[Direction::Down, Direction::Right]
        );
    }

    #[test]
    fn when_neighbors_are_occupied_they_are_reported_and_not_free() {
        let mut grid = Grid::new(3, 3);
        let body = Occupant::Segment {
            snake: 0,
            role: Role::Body,
        };
        grid.set(Position::new(1, 0), Some(body));
        grid.set(Position::new(2, 1), Some(Occupant::Food));

        let perception = Perception::new(Position::new(1, 1), Some(Position::new(2, 1)), grid);

        assert_eq!(perception.neighbor(Direction::Up), Some(body));
        assert_eq!(perception.neighbor(Direction::Right), Some(Occupant::Food));
        assert_eq!(
            perception.free_directions(),
            &[Direction::Down, Direction::Left]
        );
        assert!(!perception.is_free(Direction::Right));
        assert_eq!(perception.food(), Some(Position::new(2, 1)));
    }
}
