use thiserror::Error;

use stoat_core::CoreError;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("all {candidates} attraction weights are zero")]
    DegenerateAttraction { candidates: usize },

    #[error("no on-land step found after {attempts} attempts")]
    MovementExhausted { attempts: u32 },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
