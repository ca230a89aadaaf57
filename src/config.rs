use crate::error::{Error, Result};

/// Settings for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of cells along the x axis.
    pub width: usize,
    /// Number of cells along the y axis.
    pub height: usize,
    /// Ticks per second requested from the host loop.
    pub frame_rate: u32,
    /// The seed for the random number generator.
    pub seed: u64,
    /// Whether every tick should be recorded in the replay log.
    pub record_replay: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            width: 40,
            height: 40,
            frame_rate: 100,
            seed: 0,
            record_replay: false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(Error::Config(format!(
                "grid of {}x{} does not fit in i32 coordinates",
                self.width, self.height
            )));
        }

        if self.frame_rate == 0 {
            return Err(Error::Config("frame rate must be positive".to_string()));
        }

        Ok(())
    }

    /// Milliseconds the host waits between two ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        1000 / self.frame_rate.max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_using_the_default_config_it_is_valid() {
        let config = SimulationConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 40);
        assert_eq!(config.tick_interval_ms(), 10);
    }

    #[test]
    fn when_a_dimension_is_zero_the_config_is_rejected() {
        let config = SimulationConfig {
            width: 0,
            ..SimulationConfig::default()
        };

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn when_the_frame_rate_is_zero_the_config_is_rejected() {
        let config = SimulationConfig {
            frame_rate: 0,
            ..SimulationConfig::default()
        };

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
