use arena_core::types::TankId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Controller pool exhausted (capacity {capacity})")]
    PoolExhausted { capacity: usize },

    #[error("Tank pool refused to spawn a tank")]
    TankSpawnFailed,

    #[error("No controller for {0}")]
    UnknownTank(TankId),

    #[error("Invalid tuning config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;
