use thiserror::Error;

use stoat_core::{AgentId, CoreError, Slot};
use stoat_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("population capacity of {capacity} agents exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("{ledger} ledger full ({capacity} entries)")]
    LedgerFull { ledger: &'static str, capacity: usize },

    #[error("{0} cannot mate with itself")]
    SelfMating(AgentId),

    #[error("mating between {male} and {female} is already recorded")]
    DuplicateMating { male: AgentId, female: AgentId },

    #[error("{0} holds no live agent")]
    EmptySlot(Slot),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type AgentResult<T> = Result<T, AgentError>;
