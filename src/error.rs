use thiserror::Error;

/// Errors that can occur while setting up a simulation.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid layout: {0}")]
    Layout(String),

    #[error("Invalid placement: {0}")]
    Placement(String),
}

pub type Result<T> = std::result::Result<T, Error>;
