use crate::entities::Position;
use crate::error::{Error, Result};
use crate::snake::MAX_SIZE;
use regex::Regex;
use std::collections::HashSet;

/// A world described as text.
///
/// ```text
/// rows 3
/// cols 5
/// m .....
/// m ....*
/// m .....
/// s 2,1 1,1 0,1
/// ```
///
/// `rows` and `cols` give the grid size, each `m` line is one row of cells (`.` empty,
/// `*` food) and each `s` line is one snake as `x,y` cells listed from head to tail.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub food: Option<Position>,
    pub snakes: Vec<Vec<Position>>,
}

impl Layout {
    pub fn parse(contents: &str) -> Result<Layout> {
        let metadata = Regex::new(r"rows (\d+)\s+cols (\d+)")
            .expect("layout header regex is valid")
            .captures(contents)
            .ok_or_else(|| Error::Layout("missing `rows` and `cols` header".to_string()))?;

        let height = parse_number(&metadata[1])?;
        let width = parse_number(&metadata[2])?;
        if width == 0 || height == 0 {
            return Err(Error::Layout(format!(
                "grid must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        let food = parse_rows(contents, width, height)?;
        let snakes = parse_snakes(contents)?;

        let layout = Layout {
            width,
            height,
            food,
            snakes,
        };
        layout.validate_snakes()?;

        Ok(layout)
    }

    fn validate_snakes(&self) -> Result<()> {
        let mut taken: HashSet<Position> = self.food.into_iter().collect();

        for (index, snake) in self.snakes.iter().enumerate() {
            if snake.is_empty() {
                return Err(Error::Layout(format!("snake {} has no cells", index)));
            }

            if snake.len() > MAX_SIZE {
                return Err(Error::Layout(format!(
                    "snake {} has {} cells but the maximum is {}",
                    index,
                    snake.len(),
                    MAX_SIZE
                )));
            }

            for position in snake {
                if position.x < 0
                    || position.y < 0
                    || position.x as usize >= self.width
                    || position.y as usize >= self.height
                {
                    return Err(Error::Layout(format!(
                        "snake {} cell {},{} is outside the grid",
                        index, position.x, position.y
                    )));
                }

                if !taken.insert(*position) {
                    return Err(Error::Layout(format!(
                        "snake {} cell {},{} is already occupied",
                        index, position.x, position.y
                    )));
                }
            }

            if let Some(pair) = snake.windows(2).find(|pair| !pair[0].is_adjacent(pair[1])) {
                return Err(Error::Layout(format!(
                    "snake {} cells {},{} and {},{} are not adjacent",
                    index, pair[0].x, pair[0].y, pair[1].x, pair[1].y
                )));
            }
        }

        Ok(())
    }
}

fn parse_number(value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::Layout(format!("`{}` is not a valid size", value)))
}

// Returns the position of the food, if any
fn parse_rows(contents: &str, width: usize, height: usize) -> Result<Option<Position>> {
    let rows: Vec<&str> = Regex::new(r"(?m)^\s*m (.*)$")
        .expect("layout row regex is valid")
        .captures_iter(contents)
        .filter_map(|captures| captures.get(1))
        .map(|row| row.as_str().trim())
        .collect();

    if rows.len() != height {
        return Err(Error::Layout(format!(
            "expected {} rows but found {}",
            height,
            rows.len()
        )));
    }

    let mut food = None;
    for (y, line) in rows.iter().enumerate() {
        if line.chars().count() != width {
            return Err(Error::Layout(format!(
                "row {} has {} cells but expected {}",
                y,
                line.chars().count(),
                width
            )));
        }

        for (x, value) in line.chars().enumerate() {
            match value {
                '.' => {}
                '*' => {
                    if food.is_some() {
                        return Err(Error::Layout("more than one food".to_string()));
                    }
                    food = Some(Position::new(x as i32, y as i32));
                }
                _ => {
                    return Err(Error::Layout(format!(
                        "invalid cell `{}` at {},{}",
                        value, x, y
                    )))
                }
            }
        }
    }

    Ok(food)
}

fn parse_snakes(contents: &str) -> Result<Vec<Vec<Position>>> {
    let cell = Regex::new(r"^(-?\d+),(-?\d+)$").expect("layout cell regex is valid");

    Regex::new(r"(?m)^\s*s\b(.*)$")
        .expect("layout snake regex is valid")
        .captures_iter(contents)
        .filter_map(|captures| captures.get(1))
        .map(|line| {
            line.as_str()
                .split_whitespace()
                .map(|value| parse_cell(&cell, value))
                .collect::<Result<Vec<Position>>>()
        })
        .collect()
}

fn parse_cell(cell: &Regex, value: &str) -> Result<Position> {
    let invalid = || Error::Layout(format!("`{}` is not a valid snake cell", value));

    let captures = cell.captures(value).ok_or_else(invalid)?;
    let x = captures[1].parse().map_err(|_| invalid())?;
    let y = captures[2].parse().map_err(|_| invalid())?;

    Ok(Position::new(x, y))
}
