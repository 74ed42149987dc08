use thiserror::Error;
use uuid::Uuid;

/// Errors for db stuff.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Village with ID {0} not found")]
    VillageNotFound(u32),

    #[error("Movement with ID {0} not found")]
    MovementNotFound(Uuid),

    #[error("Player with ID {0} not found")]
    PlayerNotFound(Uuid),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Column decode error: {0}")]
    Decode(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
