use chrono::{DateTime, Utc};
use uuid::Uuid;

use oppidum_types::battle::MovementKind;
use oppidum_types::common::Position;
use oppidum_types::units::UnitSet;

use crate::models::movement::UnitMovement;
use crate::models::village::Village;

#[derive(Default, Clone)]
pub struct VillageFactoryOptions {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub player_id: Option<Uuid>,
    /// Creates an ownerless village; overrides `player_id`.
    pub barbarian: bool,
    pub position: Option<Position>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Default, Clone)]
pub struct MovementFactoryOptions {
    pub village_id: Option<u32>,
    pub target_village_id: Option<u32>,
    pub kind: Option<MovementKind>,
    pub units: Option<UnitSet>,
    pub created_at: Option<DateTime<Utc>>,
    pub arrival_at: Option<DateTime<Utc>>,
}

/// Builds a village with the stock defaults of a freshly founded one:
/// every building at level 1, an empty garrison, 500 of each resource.
pub fn village_factory(options: VillageFactoryOptions) -> Village {
    let created_at = options.created_at.unwrap_or_else(Utc::now);
    let player_id = if options.barbarian {
        None
    } else {
        Some(options.player_id.unwrap_or_else(Uuid::new_v4))
    };

    Village {
        id: options.id.unwrap_or(1),
        name: options.name.unwrap_or_else(|| "Factory Village".to_string()),
        player_id,
        position: options.position.unwrap_or(Position { x: 0, y: 0 }),
        headquarters_lvl: 1,
        woodcutter_lvl: 1,
        clay_pit_lvl: 1,
        iron_mine_lvl: 1,
        farm_lvl: 1,
        storage_lvl: 1,
        barracks_lvl: 1,
        units: UnitSet::default(),
        wood: 500,
        clay: 500,
        iron: 500,
        last_wood_update: created_at,
        last_clay_update: created_at,
        last_iron_update: created_at,
        loyalty: 100.0,
        created_at,
    }
}

pub fn movement_factory(options: MovementFactoryOptions) -> UnitMovement {
    let created_at = options.created_at.unwrap_or_else(Utc::now);
    let arrival_at = options
        .arrival_at
        .unwrap_or_else(|| created_at + chrono::Duration::hours(1));

    UnitMovement::new(
        options.village_id.unwrap_or(1),
        options.target_village_id.unwrap_or(2),
        options.kind.unwrap_or(MovementKind::Attack),
        options.units.unwrap_or(UnitSet {
            archer: 1,
            ..Default::default()
        }),
        created_at,
        arrival_at,
    )
}
