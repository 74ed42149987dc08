use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use oppidum_app::repository::VillageRepository;
use oppidum_game::models::village::Village;
use oppidum_types::errors::{ApplicationError, DbError};

use crate::models::VillageRow;

/// Village rows, read plain or under `FOR UPDATE`, within the shared
/// transaction.
#[derive(Clone)]
pub struct PostgresVillageRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresVillageRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }

    async fn fetch(&self, village_id: u32, lock: bool) -> Result<Village, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let query = if lock {
            "SELECT * FROM villages WHERE id = $1 FOR UPDATE"
        } else {
            "SELECT * FROM villages WHERE id = $1"
        };

        let row = sqlx::query_as::<_, VillageRow>(query)
            .bind(village_id as i32)
            .fetch_optional(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?
            .ok_or(ApplicationError::Db(DbError::VillageNotFound(village_id)))?;

        Ok(Village::try_from(row)?)
    }
}

#[async_trait::async_trait]
impl<'a> VillageRepository for PostgresVillageRepository<'a> {
    async fn get_by_id(&self, village_id: u32) -> Result<Village, ApplicationError> {
        self.fetch(village_id, false).await
    }

    async fn get_by_id_for_update(&self, village_id: u32) -> Result<Village, ApplicationError> {
        self.fetch(village_id, true).await
    }

    async fn save(&self, village: &Village) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO villages (
                id, name, player_id, x, y,
                headquarters_lvl, woodcutter_lvl, clay_pit_lvl, iron_mine_lvl,
                farm_lvl, storage_lvl, barracks_lvl,
                archer, swordsman, knight, skirmisher, nobleman,
                wood, clay, iron, loyalty,
                created_at, last_wood_update, last_clay_update, last_iron_update
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            ON CONFLICT (id) DO UPDATE
            SET
                name = EXCLUDED.name,
                player_id = EXCLUDED.player_id,
                headquarters_lvl = EXCLUDED.headquarters_lvl,
                woodcutter_lvl = EXCLUDED.woodcutter_lvl,
                clay_pit_lvl = EXCLUDED.clay_pit_lvl,
                iron_mine_lvl = EXCLUDED.iron_mine_lvl,
                farm_lvl = EXCLUDED.farm_lvl,
                storage_lvl = EXCLUDED.storage_lvl,
                barracks_lvl = EXCLUDED.barracks_lvl,
                archer = EXCLUDED.archer,
                swordsman = EXCLUDED.swordsman,
                knight = EXCLUDED.knight,
                skirmisher = EXCLUDED.skirmisher,
                nobleman = EXCLUDED.nobleman,
                wood = EXCLUDED.wood,
                clay = EXCLUDED.clay,
                iron = EXCLUDED.iron,
                loyalty = EXCLUDED.loyalty,
                last_wood_update = EXCLUDED.last_wood_update,
                last_clay_update = EXCLUDED.last_clay_update,
                last_iron_update = EXCLUDED.last_iron_update
            "#,
        )
        .bind(village.id as i32)
        .bind(&village.name)
        .bind(village.player_id)
        .bind(village.position.x)
        .bind(village.position.y)
        .bind(village.headquarters_lvl as i16)
        .bind(village.woodcutter_lvl as i16)
        .bind(village.clay_pit_lvl as i16)
        .bind(village.iron_mine_lvl as i16)
        .bind(village.farm_lvl as i16)
        .bind(village.storage_lvl as i16)
        .bind(village.barracks_lvl as i16)
        .bind(village.units.archer as i32)
        .bind(village.units.swordsman as i32)
        .bind(village.units.knight as i32)
        .bind(village.units.skirmisher as i32)
        .bind(village.units.nobleman as i32)
        .bind(village.wood as i32)
        .bind(village.clay as i32)
        .bind(village.iron as i32)
        .bind(village.loyalty)
        .bind(village.created_at)
        .bind(village.last_wood_update)
        .bind(village.last_clay_update)
        .bind(village.last_iron_update)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }
}
