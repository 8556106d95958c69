use std::error::Error;
use std::fmt;

/// Error types raised before a clustering run starts
#[derive(Debug, Clone, PartialEq)]
pub enum ClusteringError {
    /// A parameter violates its precondition (k < 1, floor < 1, ...)
    InvalidConfiguration(String),
    /// The input cannot be clustered or scored as given
    DegenerateInput(String),
    /// A vector's length differs from the dataset's in strict mode
    DimensionMismatch {
        id: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ClusteringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusteringError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            ClusteringError::DegenerateInput(msg) => write!(f, "Degenerate input: {}", msg),
            ClusteringError::DimensionMismatch {
                id,
                expected,
                found,
            } => write!(
                f,
                "Dimension mismatch: point {} has {} coordinates, expected {}",
                id, found, expected
            ),
        }
    }
}

impl Error for ClusteringError {}

pub type ClusteringResult<T> = Result<T, ClusteringError>;
