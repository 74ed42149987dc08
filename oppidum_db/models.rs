use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct VillageRow {
    pub id: i32,
    pub name: String,
    pub player_id: Option<Uuid>,
    pub x: i32,
    pub y: i32,
    pub headquarters_lvl: i16,
    pub woodcutter_lvl: i16,
    pub clay_pit_lvl: i16,
    pub iron_mine_lvl: i16,
    pub farm_lvl: i16,
    pub storage_lvl: i16,
    pub barracks_lvl: i16,
    pub archer: i32,
    pub swordsman: i32,
    pub knight: i32,
    pub skirmisher: i32,
    pub nobleman: i32,
    pub wood: i32,
    pub clay: i32,
    pub iron: i32,
    pub loyalty: f64,
    pub created_at: DateTime<Utc>,
    pub last_wood_update: DateTime<Utc>,
    pub last_clay_update: DateTime<Utc>,
    pub last_iron_update: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BuildingEventRow {
    pub id: Uuid,
    pub village_id: i32,
    pub building_kind: String,
    pub created_at: DateTime<Utc>,
    pub complete_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct UnitTrainingEventRow {
    pub id: Uuid,
    pub village_id: i32,
    pub unit_kind: String,
    pub count: i32,
    pub created_at: DateTime<Utc>,
    pub complete_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct UnitMovementRow {
    pub id: Uuid,
    pub village_id: i32,
    pub target_village_id: i32,
    pub kind: String,
    pub archer: i32,
    pub swordsman: i32,
    pub knight: i32,
    pub skirmisher: i32,
    pub nobleman: i32,
    pub return_wood: i32,
    pub return_clay: i32,
    pub return_iron: i32,
    pub created_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub return_at: Option<DateTime<Utc>>,
    pub completed: bool,
}
