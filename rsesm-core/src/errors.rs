use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RSESMError {
    #[error("{0}")]
    Error(String),
    #[error("Missing variables needed for calculation: {0:?}")]
    MissingVariables(Vec<String>),
    #[error("Please provide the order of polynomial to remove from your time series if you are using detrend")]
    MissingDetrendOrder,
    #[error("Dimension '{0}' not found")]
    MissingDimension(String),
    #[error("Dimension '{0}' is repeated")]
    DuplicateDimension(String),
    #[error("Expected {expected} dimensions, got an array with {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Coordinates are not consistent: {0}")]
    CoordinateMismatch(String),
    #[error("Cannot broadcast dimensions {rhs:?} onto {lhs:?}")]
    IncompatibleDimensions { lhs: Vec<String>, rhs: Vec<String> },
    #[error("Time axes do not match: {0}")]
    TimeAxisMismatch(String),
    #[error("Time coordinate must be strictly increasing")]
    NonMonotonicTime,
    #[error("Depth coordinate '{0}' must start at the surface and increase downwards")]
    InvalidDepthOrdering(String),
    #[error("No complete {window}-year window between {first_year} and {last_year}")]
    NoCompleteWindow {
        window: i32,
        first_year: i32,
        last_year: i32,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, RSESMError>`.
pub type RSESMResult<T> = Result<T, RSESMError>;
