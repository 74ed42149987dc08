use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use oppidum_app::repository::{BuildingEventRepository, TrainingEventRepository};
use oppidum_game::models::events::{BuildingEvent, UnitTrainingEvent};
use oppidum_types::errors::{ApplicationError, DbError};

use crate::mapping::{building_kind_to_str, unit_kind_to_str};
use crate::models::{BuildingEventRow, UnitTrainingEventRow};

#[derive(Clone)]
pub struct PostgresBuildingEventRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresBuildingEventRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> BuildingEventRepository for PostgresBuildingEventRepository<'a> {
    async fn list_open(&self, village_id: u32) -> Result<Vec<BuildingEvent>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = sqlx::query_as::<_, BuildingEventRow>(
            r#"
            SELECT * FROM building_events
            WHERE village_id = $1 AND completed = FALSE
            ORDER BY created_at
            "#,
        )
        .bind(village_id as i32)
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        rows.into_iter()
            .map(|row| BuildingEvent::try_from(row).map_err(ApplicationError::Db))
            .collect()
    }

    async fn save(&self, event: &BuildingEvent) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO building_events (id, village_id, building_kind, created_at, complete_at, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET complete_at = EXCLUDED.complete_at,
                completed = EXCLUDED.completed
            "#,
        )
        .bind(event.id)
        .bind(event.village_id as i32)
        .bind(building_kind_to_str(event.building))
        .bind(event.created_at)
        .bind(event.complete_at)
        .bind(event.completed)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresTrainingEventRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresTrainingEventRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> TrainingEventRepository for PostgresTrainingEventRepository<'a> {
    async fn list_open(
        &self,
        village_id: u32,
    ) -> Result<Vec<UnitTrainingEvent>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = sqlx::query_as::<_, UnitTrainingEventRow>(
            r#"
            SELECT * FROM unit_training_events
            WHERE village_id = $1 AND completed = FALSE
            ORDER BY created_at
            "#,
        )
        .bind(village_id as i32)
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        rows.into_iter()
            .map(|row| UnitTrainingEvent::try_from(row).map_err(ApplicationError::Db))
            .collect()
    }

    async fn save(&self, event: &UnitTrainingEvent) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO unit_training_events (id, village_id, unit_kind, count, created_at, complete_at, completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET count = EXCLUDED.count,
                complete_at = EXCLUDED.complete_at,
                completed = EXCLUDED.completed
            "#,
        )
        .bind(event.id)
        .bind(event.village_id as i32)
        .bind(unit_kind_to_str(event.unit))
        .bind(event.count as i32)
        .bind(event.created_at)
        .bind(event.complete_at)
        .bind(event.completed)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }

    async fn delete(&self, event_id: Uuid) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query("DELETE FROM unit_training_events WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }
}
