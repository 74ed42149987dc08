use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use oppidum_app::repository::MovementRepository;
use oppidum_game::models::movement::UnitMovement;
use oppidum_types::battle::MovementKind;
use oppidum_types::errors::{ApplicationError, DbError};

use crate::mapping::movement_kind_to_str;
use crate::models::UnitMovementRow;

#[derive(Clone)]
pub struct PostgresMovementRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresMovementRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }

    fn convert_rows(rows: Vec<UnitMovementRow>) -> Result<Vec<UnitMovement>, ApplicationError> {
        rows.into_iter()
            .map(|row| UnitMovement::try_from(row).map_err(ApplicationError::Db))
            .collect()
    }
}

#[async_trait::async_trait]
impl<'a> MovementRepository for PostgresMovementRepository<'a> {
    async fn get_by_id(&self, movement_id: Uuid) -> Result<UnitMovement, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let row = sqlx::query_as::<_, UnitMovementRow>(
            "SELECT * FROM unit_movements WHERE id = $1",
        )
        .bind(movement_id)
        .fetch_optional(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?
        .ok_or(ApplicationError::Db(DbError::MovementNotFound(movement_id)))?;

        Ok(UnitMovement::try_from(row)?)
    }

    async fn save(&self, movement: &UnitMovement) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO unit_movements (
                id, village_id, target_village_id, kind,
                archer, swordsman, knight, skirmisher, nobleman,
                return_wood, return_clay, return_iron,
                created_at, arrival_at, return_at, completed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO UPDATE
            SET archer = EXCLUDED.archer,
                swordsman = EXCLUDED.swordsman,
                knight = EXCLUDED.knight,
                skirmisher = EXCLUDED.skirmisher,
                nobleman = EXCLUDED.nobleman,
                return_wood = EXCLUDED.return_wood,
                return_clay = EXCLUDED.return_clay,
                return_iron = EXCLUDED.return_iron,
                return_at = EXCLUDED.return_at,
                completed = EXCLUDED.completed
            "#,
        )
        .bind(movement.id)
        .bind(movement.village_id as i32)
        .bind(movement.target_village_id as i32)
        .bind(movement_kind_to_str(movement.kind))
        .bind(movement.units.archer as i32)
        .bind(movement.units.swordsman as i32)
        .bind(movement.units.knight as i32)
        .bind(movement.units.skirmisher as i32)
        .bind(movement.units.nobleman as i32)
        .bind(movement.return_resources.wood() as i32)
        .bind(movement.return_resources.clay() as i32)
        .bind(movement.return_resources.iron() as i32)
        .bind(movement.created_at)
        .bind(movement.arrival_at)
        .bind(movement.return_at)
        .bind(movement.completed)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }

    async fn list_open_by_origin(
        &self,
        village_id: u32,
    ) -> Result<Vec<UnitMovement>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = sqlx::query_as::<_, UnitMovementRow>(
            r#"
            SELECT * FROM unit_movements
            WHERE village_id = $1 AND completed = FALSE
            ORDER BY created_at
            "#,
        )
        .bind(village_id as i32)
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Self::convert_rows(rows)
    }

    async fn list_returning(
        &self,
        village_id: u32,
        upto: DateTime<Utc>,
    ) -> Result<Vec<UnitMovement>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = sqlx::query_as::<_, UnitMovementRow>(
            r#"
            SELECT * FROM unit_movements
            WHERE village_id = $1
              AND completed = FALSE
              AND return_at IS NOT NULL
              AND return_at <= $2
            ORDER BY return_at
            "#,
        )
        .bind(village_id as i32)
        .bind(upto)
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Self::convert_rows(rows)
    }

    async fn list_ripe(
        &self,
        target_village_id: u32,
        kind: MovementKind,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnitMovement>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = sqlx::query_as::<_, UnitMovementRow>(
            r#"
            SELECT * FROM unit_movements
            WHERE target_village_id = $1
              AND kind = $2
              AND completed = FALSE
              AND return_at IS NULL
              AND arrival_at <= $3
            ORDER BY created_at
            "#,
        )
        .bind(target_village_id as i32)
        .bind(movement_kind_to_str(kind))
        .bind(now)
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Self::convert_rows(rows)
    }

    async fn list_ripe_attack_targets(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<u32>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT target_village_id FROM unit_movements
            WHERE kind = 'attack'
              AND completed = FALSE
              AND return_at IS NULL
              AND arrival_at <= $1
            "#,
        )
        .bind(now)
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(|(id,)| id as u32).collect())
    }
}
