use thiserror::Error;

use stoat_agent::AgentError;
use stoat_behavior::BehaviorError;
use stoat_core::CoreError;
use stoat_schedule::ScheduleError;
use stoat_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("model configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type SimResult<T> = Result<T, SimError>;
