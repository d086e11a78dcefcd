//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `stoat-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("land mask contains no land cells")]
    NoLand,

    #[error("land mask has {got} cells, expected {rows} x {cols}")]
    MaskShape { rows: usize, cols: usize, got: usize },

    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("no on-land point found after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trap file error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
