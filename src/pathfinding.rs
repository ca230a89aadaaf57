use crate::entities::{Direction, Position};
use crate::perception::Perception;
use std::collections::VecDeque;

const UNVISITED: i32 = 0;
const HEAD: i32 = 1;
const FOOD: i32 = -1;

/// Computes the shortest sequence of moves from the snake's head to the food.
///
/// The food cell can be entered, every other occupied cell blocks. The search runs a
/// breadth-first search from the head that labels cells with their layer (the head is
/// layer 1) and stops as soon as the food is reached. The path is then rebuilt walking
/// backwards from the food, one layer at a time, taking the first matching neighbor in
/// the order right, left, down, up.
///
/// Returns an empty path when the food is unreachable or when there is no food.
pub fn find_path(perception: &Perception) -> VecDeque<Direction> {
    let Some(food) = perception.food() else {
        return VecDeque::new();
    };

    let levels = match Levels::search(perception, food) {
        Some(levels) => levels,
        None => return VecDeque::new(),
    };

    levels.reconstruct(food)
}

/// The BFS layer of every cell, stored row by row.
struct Levels {
    width: usize,
    height: usize,
    levels: Vec<i32>,
}

impl Levels {
    fn new(width: usize, height: usize) -> Levels {
        Levels {
            width,
            height,
            levels: vec![UNVISITED; width * height],
        }
    }

    /// Labels the grid from the head outwards. `None` when the food is never reached.
    fn search(perception: &Perception, food: Position) -> Option<Levels> {
        let grid = perception.grid();
        let head = perception.head();

        let mut levels = Levels::new(perception.width(), perception.height());
        levels.set(food, FOOD);
        levels.set(head, HEAD);

        let mut queue = VecDeque::from([head]);

        while let Some(current) = queue.pop_front() {
            let level = levels.get(current)?;

            for next in levels.expansion_candidates(current) {
                let Some(next_level) = levels.get(next) else {
                    continue;
                };

                if next_level == FOOD {
                    return Some(levels);
                }

                if next_level == UNVISITED && grid.get(next).is_none() {
                    levels.set(next, level + 1);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    fn reconstruct(&self, food: Position) -> VecDeque<Direction> {
        let mut path = VecDeque::new();

        let Some(mut level) = self.smallest_level_around(food) else {
            return path;
        };

        let mut current = food;
        while self.get(current) != Some(HEAD) {
            let next = self
                .reconstruction_candidates(current)
                .into_iter()
                .find(|next| self.get(*next) == Some(level));

            // Each labelled cell was reached from a cell one layer below, so this only
            // fails on a corrupted level matrix
            let Some(next) = next else {
                return VecDeque::new();
            };

            // The path reads from the head to the food, so the move goes from `next` to `current`
            let Some(direction) = Direction::towards(next, current) else {
                return VecDeque::new();
            };

            path.push_front(direction);
            current = next;
            level -= 1;
        }

        path
    }

    /// The layer that first reached the food.
    fn smallest_level_around(&self, food: Position) -> Option<i32> {
        self.reconstruction_candidates(food)
            .into_iter()
            .filter_map(|next| self.get(next))
            .filter(|level| *level > 0)
            .min()
    }

    // Order in which the search enqueues neighbors
    fn expansion_candidates(&self, position: Position) -> Vec<Position> {
        self.inside([
            Position::new(position.x - 1, position.y),
            Position::new(position.x + 1, position.y),
            Position::new(position.x, position.y + 1),
            Position::new(position.x, position.y - 1),
        ])
    }

    // Tie-break order when several neighbors sit on the same layer
    fn reconstruction_candidates(&self, position: Position) -> Vec<Position> {
        self.inside([
            Position::new(position.x + 1, position.y),
            Position::new(position.x - 1, position.y),
            Position::new(position.x, position.y + 1),
            Position::new(position.x, position.y - 1),
        ])
    }

    fn inside(&self, candidates: [Position; 4]) -> Vec<Position> {
        candidates
            .into_iter()
            .filter(|position| self.index(*position).is_some())
            .collect()
    }

    fn get(&self, position: Position) -> Option<i32> {
        self.index(position).map(|index| self.levels[index])
    }

    fn set(&mut self, position: Position, level: i32) {
        if let Some(index) = self.index(position) {
            self.levels[index] = level;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.y < 0 {
            return None;
        }

        let (x, y) = (position.x as usize, position.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Occupant, Role};
    use crate::grid::Grid;

    fn perception(
        width: usize,
        height: usize,
        head: (i32, i32),
        food: (i32, i32),
        obstacles: &[(i32, i32)],
    ) -> Perception {
        let mut grid = Grid::new(width, height);
        let head = Position::new(head.0, head.1);
        let food = Position::new(food.0, food.1);

        grid.set(
            head,
            Some(Occupant::Segment {
                snake: 0,
                role: Role::Head,
            }),
        );
        grid.set(food, Some(Occupant::Food));
        for (x, y) in obstacles {
            grid.set(
                Position::new(*x, *y),
                Some(Occupant::Segment {
                    snake: 1,
                    role: Role::Body,
                }),
            );
        }

        Perception::new(head, Some(food), grid)
    }

    fn walk(start: Position, path: &VecDeque<Direction>) -> Vec<Position> {
        path.iter()
            .scan(start, |position, direction| {
                *position = position.step(*direction);
                Some(*position)
            })
            .collect()
    }

    #[test]
    fn when_the_food_is_right_below_the_head_the_path_is_a_single_down_move() {
        let perception = perception(5, 5, (2, 2), (2, 3), &[]);

        let path = find_path(&perception);

        assert_eq!(path, VecDeque::from([Direction::Down]));
    }

    #[test]
    fn when_the_grid_is_unobstructed_the_path_length_is_the_manhattan_distance() {
        let perception = perception(7, 6, (1, 1), (5, 4), &[]);

        let path = find_path(&perception);
        let steps = walk(Position::new(1, 1), &path);

        assert_eq!(path.len(), 7);
        assert_eq!(steps.last(), Some(&Position::new(5, 4)));
        // Every step stays inside the grid
        assert!(steps
            .iter()
            .all(|p| p.x >= 0 && p.x < 7 && p.y >= 0 && p.y < 6));
    }

    #[test]
    fn when_the_food_is_in_a_straight_line_the_path_goes_straight() {
        let perception = perception(8, 3, (0, 1), (6, 1), &[]);

        let path = find_path(&perception);

        assert_eq!(path, VecDeque::from([Direction::Right; 6]));
    }

    #[test]
    fn when_several_shortest_paths_exist_the_reconstruction_prefers_right_left_down_up() {
        // Head at (0, 0), food at (1, 1): both (1, 0) and (0, 1) are on layer 2.
        // Walking back from the food, (x + 1, y) is out of reach, (x - 1, y) = (0, 1) comes first,
        // so the path goes down first then right.
        let perception = perception(3, 3, (0, 0), (1, 1), &[]);

        let path = find_path(&perception);

        assert_eq!(path, VecDeque::from([Direction::Down, Direction::Right]));
    }

    #[test]
    fn when_the_head_is_to_the_right_the_tie_break_picks_the_right_hand_neighbor() {
        // Head at (2, 0), food at (1, 1): (2, 1) and (1, 0) are on layer 2.
        // Walking back, (x + 1, y) = (2, 1) is checked first, so the path goes down then left.
        let perception = perception(3, 3, (2, 0), (1, 1), &[]);

        let path = find_path(&perception);

        assert_eq!(path, VecDeque::from([Direction::Down, Direction::Left]));
    }

    #[test]
    fn when_many_shortest_paths_exist_the_path_runs_down_the_left_column_first() {
        // Walking back from the food, (x - 1, y) is preferred at every layer until the
        // head's column is reached, then (x, y - 1) leads up to the head
        let perception = perception(4, 4, (0, 0), (3, 3), &[(1, 1)]);

        let path = find_path(&perception);

        assert_eq!(
            path,
            VecDeque::from([
                Direction::Down,
                Direction::Down,
                Direction::Down,
                Direction::Right,
                Direction::Right,
                Direction::Right
            ])
        );
    }

    #[test]
    fn when_obstacles_block_the_direct_route_the_path_goes_around_them() {
        // A wall on column 2 with a gap at the bottom
        let perception = perception(5, 4, (0, 0), (4, 0), &[(2, 0), (2, 1), (2, 2)]);

        let path = find_path(&perception);
        let steps = walk(Position::new(0, 0), &path);

        assert_eq!(path.len(), 10);
        assert_eq!(steps.last(), Some(&Position::new(4, 0)));
        assert!(!steps.contains(&Position::new(2, 0)));
        assert!(!steps.contains(&Position::new(2, 1)));
        assert!(!steps.contains(&Position::new(2, 2)));
        assert!(steps.contains(&Position::new(2, 3)));
    }

    #[test]
    fn when_the_food_is_fully_enclosed_the_path_is_empty() {
        let perception = perception(5, 5, (0, 0), (3, 3), &[(3, 2), (2, 3), (4, 3), (3, 4)]);

        let path = find_path(&perception);

        assert!(path.is_empty());
    }

    #[test]
    fn when_the_head_is_fully_enclosed_the_path_is_empty() {
        let perception = perception(5, 5, (0, 0), (4, 4), &[(1, 0), (0, 1)]);

        let path = find_path(&perception);

        assert!(path.is_empty());
    }

    #[test]
    fn when_there_is_no_food_the_path_is_empty() {
        let grid = Grid::new(4, 4);
        let perception = Perception::new(Position::new(1, 1), None, grid);

        assert!(find_path(&perception).is_empty());
    }

    #[test]
    fn when_the_snake_body_blocks_the_way_it_is_treated_as_an_obstacle() {
        // The snake's own body is part of the snapshot and cannot be crossed
        let perception = perception(4, 3, (1, 1), (3, 1), &[(2, 1), (2, 0)]);

        let path = find_path(&perception);

        assert_eq!(
            path,
            VecDeque::from([
                Direction::Down,
                Direction::Right,
                Direction::Right,
                Direction::Up
            ])
        );
    }
}
