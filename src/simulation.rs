use crate::config::SimulationConfig;
use crate::entities::{Direction, Drawable, Food, Occupant, Position};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::layout::Layout;
use crate::perception::Perception;
use crate::replay::{create_replay_logger, ReplayLogger};
use crate::snake::{Action, Snake, MAX_SIZE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// A simulation of snakes hunting for food.
/// Main entry point for running the simulation.
pub struct Simulation {
    grid: Grid,
    snakes: Vec<Snake>,
    turn: usize,
    config: SimulationConfig,
    replay_logger: Box<dyn ReplayLogger>,
    rng: StdRng,
}

/// Represents the state of the simulation after a tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "python", pyo3::pyclass(module = "snakes_engine", get_all))]
pub struct SimulationState {
    /// The current turn.
    pub turn: usize,
    /// The number of cells along the x axis.
    pub width: usize,
    /// The number of cells along the y axis.
    pub height: usize,
    /// The location of the food as `(x, y)`. `None` if the grid had no room left for it.
    pub food: Option<(i32, i32)>,
    /// Every snake, in registration order.
    pub snakes: Vec<SnakeState>,
}

/// Represents a snake in the simulation state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "python", pyo3::pyclass(name = "Snake", module = "snakes_engine", get_all))]
pub struct SnakeState {
    /// The unique identifier for the snake.
    pub id: String,
    /// The cells of the snake as `(x, y)`, from head to tail.
    pub cells: Vec<(i32, i32)>,
    /// The number of steps left on the snake's cached path.
    pub path_length: usize,
    /// Whether the snake will recompute its path the next time it needs one.
    pub needs_new_path: bool,
}

/// Picks a uniformly random empty cell of `grid` for a new food.
///
/// Returns `None` when the grid is full.
pub fn spawn_food<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Food> {
    grid.land()
        .choose(rng)
        .map(|position| Food::new(*position))
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// # Arguments
    /// * `config` - The size of the grid, the seed and whether to record a replay.
    pub fn new(config: SimulationConfig) -> Result<Simulation> {
        config.validate()?;

        Ok(Simulation {
            grid: Grid::new(config.width, config.height),
            snakes: Vec::new(),
            turn: 0,
            replay_logger: create_replay_logger(config.record_replay, config.width, config.height),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    /// Creates a simulation with the initial snake and one food placed at random.
    pub fn with_initial_snake(config: SimulationConfig) -> Result<Simulation> {
        let mut simulation = Simulation::new(config)?;

        let snake = Snake::initial();
        if !snake.segments().all(|segment| simulation.grid.contains(segment.position)) {
            return Err(Error::Config(format!(
                "grid of {}x{} is too small for the initial snake",
                simulation.width(),
                simulation.height()
            )));
        }
        simulation.register_snake(snake)?;

        if let Some(food) = simulation.spawn_food() {
            simulation.register_food(food)?;
        }

        Ok(simulation)
    }

    /// Creates a simulation from a text layout. The layout's size replaces the configured one.
    ///
    /// # Arguments
    /// * `contents` - The layout as a string, see [`Layout`].
    /// * `config` - The seed and whether to record a replay.
    pub fn from_layout(contents: &str, config: SimulationConfig) -> Result<Simulation> {
        let layout = Layout::parse(contents)?;
        let mut simulation = Simulation::new(SimulationConfig {
            width: layout.width,
            height: layout.height,
            ..config
        })?;

        for cells in &layout.snakes {
            simulation.register_snake(Snake::from_positions(cells))?;
        }

        if let Some(position) = layout.food {
            simulation.register_food(Food::new(position))?;
        }

        Ok(simulation)
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    /// Adds a snake to the simulation. It acts from the next tick on.
    ///
    /// The snake must have between one and [`MAX_SIZE`] contiguous segments, all on empty
    /// cells inside the grid.
    pub fn register_snake(&mut self, snake: Snake) -> Result<()> {
        if snake.is_empty() || snake.len() > MAX_SIZE {
            return Err(Error::Placement(format!(
                "snake has {} segments but must have between 1 and {}",
                snake.len(),
                MAX_SIZE
            )));
        }

        let positions = snake.positions();
        for (index, position) in positions.iter().enumerate() {
            self.check_empty(*position)?;

            if positions[..index].contains(position) {
                return Err(Error::Placement(format!(
                    "snake covers {},{} twice",
                    position.x, position.y
                )));
            }
        }

        if let Some(pair) = positions.windows(2).find(|pair| !pair[0].is_adjacent(pair[1])) {
            return Err(Error::Placement(format!(
                "snake cells {},{} and {},{} are not adjacent",
                pair[0].x, pair[0].y, pair[1].x, pair[1].y
            )));
        }

        self.add_snake(snake);
        Ok(())
    }

    /// Places a food on an empty cell inside the grid.
    pub fn register_food(&mut self, food: Food) -> Result<()> {
        self.check_empty(food.position)?;
        self.add_food(food);
        Ok(())
    }

    /// Picks a random empty cell for a new food without placing it.
    pub fn spawn_food(&mut self) -> Option<Food> {
        spawn_food(&self.grid, &mut self.rng)
    }

    /// Advances the simulation by one step, letting every snake act once.
    ///
    /// Snakes act in registration order. Each one sees the world as left by the snakes
    /// before it in this tick. Snakes born during the tick act from the next one.
    pub fn tick(&mut self) -> SimulationState {
        self.turn += 1;

        let snakes = self.snakes.len();
        for index in 0..snakes {
            let food = self.grid.food();
            let snapshot = self.grid.clone();

            // Its old cells are cleared and marked again once it has acted
            self.remove_snake_from_grid(index);

            let perception = Perception::new(self.snakes[index].head(), food, snapshot);
            let action = self.snakes[index].choose_action(&perception, &mut self.rng);
            trace!(snake = %self.snakes[index].id(), ?action, "snake decided");

            self.apply(index, action, perception.grid());
            self.add_snake_to_grid(index);
        }

        self.replay_logger.log_turn(self.turn, self.snakes.len());
        self.state()
    }

    /// Every entity that should be on screen: all snake segments and the food.
    pub fn drawables(&self) -> Vec<Drawable> {
        let mut drawables: Vec<Drawable> = self
            .snakes
            .iter()
            .flat_map(|snake| snake.segments().copied().map(Drawable::Segment))
            .collect();

        if let Some(position) = self.grid.food() {
            drawables.push(Drawable::Food(Food::new(position)));
        }

        drawables
    }

    /// Draws the simulation to the console.
    pub fn draw(&self) -> std::io::Result<()> {
        self.grid.draw(self.turn, self.snakes.len())
    }

    pub fn state(&self) -> SimulationState {
        SimulationState {
            turn: self.turn,
            width: self.width(),
            height: self.height(),
            food: self.grid.food().map(Into::into),
            snakes: self
                .snakes
                .iter()
                .map(|snake| SnakeState {
                    id: snake.id().to_string(),
                    cells: snake.positions().into_iter().map(Into::into).collect(),
                    path_length: snake.path().map_or(0, |path| path.len()),
                    needs_new_path: snake.needs_new_path(),
                })
                .collect(),
        }
    }

    /// The recorded replay, if recording was enabled.
    pub fn replay(&self) -> Option<Value> {
        self.replay_logger.to_json()
    }

    fn apply(&mut self, index: usize, action: Action, snapshot: &Grid) {
        match action {
            Action::Stay => {}
            Action::Move(direction) => {
                let snake = &mut self.snakes[index];
                snake.move_towards(direction);
                self.replay_logger.log_move(
                    self.turn,
                    snake.id().to_string(),
                    snake.head(),
                    direction,
                );
            }
            Action::Reproduce => {
                let offspring = self.snakes[index].reproduce();
                debug!(
                    parent = %self.snakes[index].id(),
                    offspring = %offspring.id(),
                    "snake reproduced"
                );
                self.replay_logger.log_reproduce(
                    self.turn,
                    self.snakes[index].id().to_string(),
                    self.snakes[index].head(),
                );
                self.add_snake(offspring);
            }
            Action::Eat(direction) => self.eat(index, direction, snapshot),
        }
    }

    fn eat(&mut self, index: usize, direction: Direction, snapshot: &Grid) {
        let target = self.snakes[index].head().step(direction);

        if !snapshot.get(target).is_some_and(|occupant| occupant.is_food()) {
            return;
        }

        let food = Food::new(target);
        self.snakes[index].eat(&food);
        self.grid.remove(target);
        debug!(snake = %self.snakes[index].id(), x = target.x, y = target.y, "snake ate food");

        self.replay_logger.log_eat(
            self.turn,
            self.snakes[index].id().to_string(),
            target,
            direction,
        );
        self.replay_logger.log_remove_food(self.turn, target);

        // The snapshot still holds the eaten food and the eater's body, so neither is picked
        match spawn_food(snapshot, &mut self.rng) {
            Some(food) => self.add_food(food),
            None => warn!("no empty cell left to spawn food"),
        }

        // The only planning target moved
        for snake in &mut self.snakes {
            snake.invalidate_path();
        }
    }

    fn check_empty(&self, position: Position) -> Result<()> {
        if !self.grid.contains(position) {
            return Err(Error::Placement(format!(
                "cell {},{} is outside the grid",
                position.x, position.y
            )));
        }

        if self.grid.get(position).is_some() {
            return Err(Error::Placement(format!(
                "cell {},{} is already occupied",
                position.x, position.y
            )));
        }

        Ok(())
    }

    // Offspring and respawned food land on cells the simulation already knows are free
    fn add_snake(&mut self, snake: Snake) {
        self.replay_logger
            .log_spawn_snake(self.turn, snake.id().to_string(), snake.positions());
        self.snakes.push(snake);
        self.add_snake_to_grid(self.snakes.len() - 1);
    }

    fn add_food(&mut self, food: Food) {
        debug!(x = food.position.x, y = food.position.y, "food spawned");
        self.grid.set(food.position, Some(Occupant::Food));
        self.replay_logger.log_spawn_food(self.turn, food.position);
    }

    fn add_snake_to_grid(&mut self, index: usize) {
        for segment in self.snakes[index].segments() {
            self.grid.set(
                segment.position,
                Some(Occupant::Segment {
                    snake: index,
                    role: segment.role,
                }),
            );
        }
    }

    fn remove_snake_from_grid(&mut self, index: usize) {
        for position in self.snakes[index].positions() {
            self.grid.remove(position);
        }
    }
}
