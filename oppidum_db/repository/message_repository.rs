use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use oppidum_app::repository::{MessageRepository, NewBattleMessage};
use oppidum_types::errors::{ApplicationError, DbError};

#[derive(Clone)]
pub struct PostgresMessageRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresMessageRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> MessageRepository for PostgresMessageRepository<'a> {
    async fn add(&self, message: &NewBattleMessage) -> Result<(), ApplicationError> {
        let payload = serde_json::to_value(&message.payload)
            .map_err(|e| ApplicationError::Db(DbError::Json(e)))?;

        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO battle_messages (id, to_player_id, message, payload, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.to_player_id)
        .bind(&message.message)
        .bind(payload)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }
}
