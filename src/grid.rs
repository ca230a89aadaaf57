use crate::entities::{Occupant, Position};
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};

/// The occupancy table: which entity, if any, sits on each cell.
///
/// Reads outside the grid return `None` and writes outside the grid are ignored,
/// so callers can probe the neighbors of an edge cell without checking bounds first.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Occupant>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    pub fn get(&self, position: Position) -> Option<Occupant> {
        self.index(position).and_then(|index| self.cells[index])
    }

    pub fn set(&mut self, position: Position, value: Option<Occupant>) {
        if let Some(index) = self.index(position) {
            self.cells[index] = value;
        }
    }

    pub fn remove(&mut self, position: Position) {
        self.set(position, None);
    }

    /// Location of the food, scanning the whole table row by row.
    pub fn food(&self) -> Option<Position> {
        self.all(|occupant| occupant.is_food()).into_iter().next()
    }

    /// Number of cells holding food.
    pub fn food_count(&self) -> usize {
        self.all(|occupant| occupant.is_food()).len()
    }

    /// Every empty cell, row by row.
    pub fn land(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| self.position(index))
            .collect()
    }

    pub fn draw(&self, turn: usize, snakes: usize) -> std::io::Result<()> {
        let mut stdout = stdout();

        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print("Turn: "),
            Print(turn.to_string()),
            Print("\nSnakes: "),
            Print(snakes.to_string()),
            Print("\n\n")
        )?;

        for y in 0..self.height {
            for x in 0..self.width {
                let occupant = self.get(Position::new(x as i32, y as i32));
                execute!(
                    stdout,
                    SetForegroundColor(occupant.map_or(Color::Reset, |occupant| occupant.color())),
                    Print(occupant.map_or('.', |occupant| occupant.char())),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        stdout.flush()
    }

    fn all(&self, filter: fn(&Occupant) -> bool) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| match cell {
                Some(occupant) if filter(occupant) => Some(self.position(index)),
                _ => None,
            })
            .collect()
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

    fn position(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    fn segment(snake: usize) -> Option<Occupant> {
        Some(Occupant::Segment {
            snake,
            role: Role::Body,
        })
    }

    #[test]
    fn when_creating_a_grid_every_cell_is_empty() {
        let grid = Grid::new(3, 2);

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.land().len(), 6);
        assert!(grid.food().is_none());
    }

    #[test]
    fn when_setting_a_cell_the_occupant_is_returned_by_get() {
        let mut grid = Grid::new(3, 3);
        grid.set(Position::new(2, 1), Some(Occupant::Food));
        grid.set(Position::new(0, 2), segment(4));

        assert_eq!(grid.get(Position::new(2, 1)), Some(Occupant::Food));
        assert_eq!(grid.get(Position::new(0, 2)), segment(4));
        assert!(grid.get(Position::new(1, 2)).is_none());
    }

    #[test]
    fn when_removing_an_occupant_the_cell_becomes_empty() {
        let mut grid = Grid::new(2, 2);
        grid.set(Position::new(1, 1), segment(0));
        grid.remove(Position::new(1, 1));

        assert!(grid.get(Position::new(1, 1)).is_none());
    }

    #[test]
    fn when_reading_outside_the_grid_empty_is_returned() {
        let mut grid = Grid::new(2, 2);
        grid.set(Position::new(0, 0), segment(0));

        assert!(grid.get(Position::new(-1, 0)).is_none());
        assert!(grid.get(Position::new(0, -1)).is_none());
        assert!(grid.get(Position::new(2, 0)).is_none());
        assert!(grid.get(Position::new(0, 2)).is_none());
        assert!(!grid.contains(Position::new(2, 1)));
        assert!(grid.contains(Position::new(1, 1)));
    }

    #[test]
    fn when_writing_outside_the_grid_the_write_is_ignored() {
        let mut grid = Grid::new(2, 2);
        let before = grid.clone();

        grid.set(Position::new(-1, 0), Some(Occupant::Food));
        grid.set(Position::new(2, 2), Some(Occupant::Food));

        assert_eq!(grid, before);
    }

    #[test]
    fn when_copying_a_grid_changes_to_the_copy_do_not_affect_the_original() {
        let mut grid = Grid::new(2, 2);
        grid.set(Position::new(0, 0), Some(Occupant::Food));

        let mut copy = grid.clone();
        copy.remove(Position::new(0, 0));
        copy.set(Position::new(1, 1), segment(1));

        assert_eq!(grid.get(Position::new(0, 0)), Some(Occupant::Food));
        assert!(grid.get(Position::new(1, 1)).is_none());
    }

    #[test]
    fn when_getting_the_food_the_scan_finds_its_position() {
        let mut grid = Grid::new(4, 3);
        grid.set(Position::new(3, 2), Some(Occupant::Food));
        grid.set(Position::new(0, 0), segment(0));

        assert_eq!(grid.food(), Some(Position::new(3, 2)));
        assert_eq!(grid.food_count(), 1);
    }

    #[test]
    fn when_getting_all_land_the_empty_cells_are_returned_row_by_row() {
        let mut grid = Grid::new(3, 2);
        grid.set(Position::new(1, 0), segment(0));
        grid.set(Position::new(0, 1), Some(Occupant::Food));

        let expected_land = vec![
            Position::new(0, 0),
            Position::new(2, 0),
            Position::new(1, 1),
            Position::new(2, 1),
        ];

        assert_eq!(grid.land(), expected_land);
    }
}
