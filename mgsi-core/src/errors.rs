use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum ExsolutionError {
    #[error("{0}")]
    Error(String),
    #[error("Composition does not sum to 1 (sum={sum}, tolerance={tolerance})")]
    CompositionNotNormalised { sum: f64, tolerance: f64 },
    #[error("Expected {expected} species, got {got}")]
    SpeciesCountMismatch { expected: usize, got: usize },
    #[error("Unknown chemical species: {0}")]
    UnknownSpecies(String),
    #[error("The rate of CMB temperature change is zero; erosion cannot be expressed per kelvin")]
    ZeroCoolingRate,
    #[error("No equilibrium layer composition exists: {0}")]
    NoEquilibrium(String),
    #[error("Integration failed at t={time}: {reason}")]
    IntegrationFailed { time: f64, reason: String },
    #[error("Non-finite value in state variable {index} at t={time}")]
    NonFiniteState { index: usize, time: f64 },
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, ExsolutionError>`.
pub type ExsolutionResult<T> = Result<T, ExsolutionError>;
