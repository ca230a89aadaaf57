//! # snakes_engine
//!
//! The core engine for a grid world of snakes hunting for food.
//! Every snake plans its way to the single food with a breadth-first search,
//! grows when it eats and splits in two once it is long enough.

pub mod config;
pub mod entities;
pub mod error;
pub mod grid;
pub mod layout;
pub mod pathfinding;
pub mod perception;
pub mod simulation;
pub mod snake;

pub use config::SimulationConfig;
pub use entities::Direction;
pub use entities::Drawable;
pub use entities::Food;
pub use entities::Position;
pub use error::Error;
pub use grid::Grid;
pub use layout::Layout;
pub use pathfinding::find_path;
pub use perception::Perception;
pub use simulation::spawn_food;
pub use simulation::Simulation;
pub use simulation::SimulationState;
pub use simulation::SnakeState;
pub use snake::Action;
pub use snake::Snake;

mod replay;

#[cfg(feature = "python")]
mod python;
