use crate::config::SimulationConfig;
use crate::error::Error;
use crate::simulation::{SimulationState, SnakeState};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<Error> for PyErr {
    fn from(error: Error) -> PyErr {
        PyValueError::new_err(error.to_string())
    }
}

/// The snakes simulation, as seen from Python.
#[pyclass(name = "Simulation", module = "snakes_engine")]
pub struct PySimulation {
    simulation: crate::Simulation,
}

#[pymethods]
impl PySimulation {
    /// Creates a new simulation.
    ///
    /// # Arguments
    /// * `width` - The number of cells along the x axis. Ignored when a layout is given.
    /// * `height` - The number of cells along the y axis. Ignored when a layout is given.
    /// * `seed` - The seed for the random number generator.
    /// * `layout` - The world as text. If `None`, the world starts with the initial snake and one food.
    /// * `record_replay` - Whether to record every tick so it can be read back with `replay()`.
    #[new]
    #[pyo3(signature = (width=40, height=40, seed=0, layout=None, record_replay=false))]
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        layout: Option<&str>,
        record_replay: bool,
    ) -> PyResult<PySimulation> {
        let config = SimulationConfig {
            width,
            height,
            seed,
            record_replay,
            ..SimulationConfig::default()
        };

        let simulation = match layout {
            Some(layout) => crate::Simulation::from_layout(layout, config)?,
            None => crate::Simulation::with_initial_snake(config)?,
        };

        Ok(PySimulation { simulation })
    }

    /// Advances the simulation by one tick and returns the new state.
    pub fn tick(&mut self) -> SimulationState {
        self.simulation.tick()
    }

    pub fn state(&self) -> SimulationState {
        self.simulation.state()
    }

    #[getter]
    pub fn width(&self) -> usize {
        self.simulation.width()
    }

    #[getter]
    pub fn height(&self) -> usize {
        self.simulation.height()
    }

    /// The recorded replay as a JSON string. `None` if recording is disabled.
    pub fn replay(&self) -> Option<String> {
        self.simulation.replay().map(|replay| replay.to_string())
    }

    /// Draws the simulation to the console.
    pub fn draw(&self) -> PyResult<()> {
        Ok(self.simulation.draw()?)
    }
}

#[pymodule]
fn snakes_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimulation>()?;
    m.add_class::<SimulationState>()?;
    m.add_class::<SnakeState>()?;
    Ok(())
}
