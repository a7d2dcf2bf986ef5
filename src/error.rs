//! Error types for grid setup, map fetching, configuration and persistence

use std::fmt;

use crate::sim::GamePhase;

/// Grid geometry that cannot produce a playable brick field
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    InvalidField { width: f32, height: f32 },
    NonPositiveDimensions { columns: i64, rows: i64 },
    InvalidCellPitch { cell_size: f32, padding: f32 },
    TooLarge { columns: usize, rows: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField { width, height } => {
                write!(f, "invalid play field: {width}x{height}")
            }
            Self::NonPositiveDimensions { columns, rows } => {
                write!(f, "grid dimensions must be positive: {columns} columns, {rows} rows")
            }
            Self::InvalidCellPitch { cell_size, padding } => {
                write!(
                    f,
                    "brick cell size {cell_size} with padding {padding} has no positive pitch"
                )
            }
            Self::TooLarge { columns, rows } => {
                write!(f, "grid too large: {columns} columns, {rows} rows")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Procedural map could not be fetched or did not match the request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    Unavailable(String),
    Malformed(String),
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    InvalidCell { column: usize, row: usize, value: u8 },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "map service unavailable: {reason}"),
            Self::Malformed(reason) => write!(f, "malformed map response: {reason}"),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "map dimensions mismatch: requested {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::InvalidCell { column, row, value } => {
                write!(f, "invalid cell value {value} at ({column}, {row})")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Tuning values that would break the engine's invariants
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f32 },
    OutOfRange { field: &'static str, value: f64 },
    PaddleWidthBounds { default_width: f32, max_width: f32 },
    ZeroBallCapacity,
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
            Self::PaddleWidthBounds {
                default_width,
                max_width,
            } => write!(
                f,
                "paddle default width {default_width} exceeds max width {max_width}"
            ),
            Self::ZeroBallCapacity => write!(f, "ball capacity must be at least 1"),
            Self::Parse(reason) => write!(f, "invalid tuning json: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Unlocked-level progress could not be read or written
#[derive(Debug)]
pub enum ProgressError {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "progress storage error: {err}"),
            Self::Serde(err) => write!(f, "progress encoding error: {err}"),
        }
    }
}

impl std::error::Error for ProgressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ProgressError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

/// Session action rejected by the controller
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    Config(ConfigError),
    Grid(GridError),
    UnknownLevel(u32),
    LevelLocked(u32),
    InvalidTransition {
        from: GamePhase,
        action: &'static str,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Grid(err) => write!(f, "{err}"),
            Self::UnknownLevel(level) => write!(f, "unknown level {level}"),
            Self::LevelLocked(level) => write!(f, "level {level} is locked"),
            Self::InvalidTransition { from, action } => {
                write!(f, "cannot {action} while {from:?}")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<GridError> for SessionError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}
