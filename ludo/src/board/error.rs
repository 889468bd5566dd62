use std::collections::TryReserveError;

use crate::ConfigError;

/// The error type for allocating the shared board state.
///
/// Either is fatal to the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Config(ConfigError),
    Allocation(TryReserveError),
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::Config(err) => Some(err),
            GridError::Allocation(err) => Some(err),
        }
    }
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::Config(_) => write!(f, "Invalid board configuration"),
            GridError::Allocation(_) => write!(f, "Could not allocate the board"),
        }
    }
}

impl From<ConfigError> for GridError {
    fn from(err: ConfigError) -> Self {
        GridError::Config(err)
    }
}

impl From<TryReserveError> for GridError {
    fn from(err: TryReserveError) -> Self {
        GridError::Allocation(err)
    }
}
