use oppidum_game::models::events::{BuildingEvent, UnitTrainingEvent};
use oppidum_game::models::movement::UnitMovement;
use oppidum_game::models::village::Village;
use oppidum_types::battle::MovementKind;
use oppidum_types::buildings::BuildingKind;
use oppidum_types::common::{Position, ResourceGroup};
use oppidum_types::errors::DbError;
use oppidum_types::units::{UnitKind, UnitSet};

use crate::models::{BuildingEventRow, UnitMovementRow, UnitTrainingEventRow, VillageRow};

pub(crate) fn building_kind_to_str(kind: BuildingKind) -> &'static str {
    match kind {
        BuildingKind::Headquarters => "headquarters",
        BuildingKind::Woodcutter => "woodcutter",
        BuildingKind::ClayPit => "clay_pit",
        BuildingKind::IronMine => "iron_mine",
        BuildingKind::Farm => "farm",
        BuildingKind::Storage => "storage",
        BuildingKind::Barracks => "barracks",
    }
}

pub(crate) fn building_kind_from_str(value: &str) -> Result<BuildingKind, DbError> {
    match value {
        "headquarters" => Ok(BuildingKind::Headquarters),
        "woodcutter" => Ok(BuildingKind::Woodcutter),
        "clay_pit" => Ok(BuildingKind::ClayPit),
        "iron_mine" => Ok(BuildingKind::IronMine),
        "farm" => Ok(BuildingKind::Farm),
        "storage" => Ok(BuildingKind::Storage),
        "barracks" => Ok(BuildingKind::Barracks),
        other => Err(DbError::Decode(format!("unknown building kind '{other}'"))),
    }
}

pub(crate) fn unit_kind_to_str(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Archer => "archer",
        UnitKind::Swordsman => "swordsman",
        UnitKind::Knight => "knight",
        UnitKind::Skirmisher => "skirmisher",
        UnitKind::Nobleman => "nobleman",
    }
}

pub(crate) fn unit_kind_from_str(value: &str) -> Result<UnitKind, DbError> {
    match value {
        "archer" => Ok(UnitKind::Archer),
        "swordsman" => Ok(UnitKind::Swordsman),
        "knight" => Ok(UnitKind::Knight),
        "skirmisher" => Ok(UnitKind::Skirmisher),
        "nobleman" => Ok(UnitKind::Nobleman),
        other => Err(DbError::Decode(format!("unknown unit kind '{other}'"))),
    }
}

pub(crate) fn movement_kind_to_str(kind: MovementKind) -> &'static str {
    match kind {
        MovementKind::Attack => "attack",
        MovementKind::Support => "support",
        MovementKind::Spy => "spy",
    }
}

pub(crate) fn movement_kind_from_str(value: &str) -> Result<MovementKind, DbError> {
    match value {
        "attack" => Ok(MovementKind::Attack),
        "support" => Ok(MovementKind::Support),
        "spy" => Ok(MovementKind::Spy),
        other => Err(DbError::Decode(format!("unknown movement kind '{other}'"))),
    }
}

impl TryFrom<VillageRow> for Village {
    type Error = DbError;

    fn try_from(row: VillageRow) -> Result<Self, Self::Error> {
        Ok(Village {
            id: row.id as u32,
            name: row.name,
            player_id: row.player_id,
            position: Position { x: row.x, y: row.y },
            headquarters_lvl: row.headquarters_lvl as u8,
            woodcutter_lvl: row.woodcutter_lvl as u8,
            clay_pit_lvl: row.clay_pit_lvl as u8,
            iron_mine_lvl: row.iron_mine_lvl as u8,
            farm_lvl: row.farm_lvl as u8,
            storage_lvl: row.storage_lvl as u8,
            barracks_lvl: row.barracks_lvl as u8,
            units: UnitSet {
                archer: row.archer as u32,
                swordsman: row.swordsman as u32,
                knight: row.knight as u32,
                skirmisher: row.skirmisher as u32,
                nobleman: row.nobleman as u32,
            },
            wood: row.wood as u32,
            clay: row.clay as u32,
            iron: row.iron as u32,
            last_wood_update: row.last_wood_update,
            last_clay_update: row.last_clay_update,
            last_iron_update: row.last_iron_update,
            loyalty: row.loyalty,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<BuildingEventRow> for BuildingEvent {
    type Error = DbError;

    fn try_from(row: BuildingEventRow) -> Result<Self, Self::Error> {
        Ok(BuildingEvent {
            id: row.id,
            village_id: row.village_id as u32,
            building: building_kind_from_str(&row.building_kind)?,
            created_at: row.created_at,
            complete_at: row.complete_at,
            completed: row.completed,
        })
    }
}

impl TryFrom<UnitTrainingEventRow> for UnitTrainingEvent {
    type Error = DbError;

    fn try_from(row: UnitTrainingEventRow) -> Result<Self, Self::Error> {
        Ok(UnitTrainingEvent {
            id: row.id,
            village_id: row.village_id as u32,
            unit: unit_kind_from_str(&row.unit_kind)?,
            count: row.count as u32,
            created_at: row.created_at,
            complete_at: row.complete_at,
            completed: row.completed,
        })
    }
}

impl TryFrom<UnitMovementRow> for UnitMovement {
    type Error = DbError;

    fn try_from(row: UnitMovementRow) -> Result<Self, Self::Error> {
        Ok(UnitMovement {
            id: row.id,
            village_id: row.village_id as u32,
            target_village_id: row.target_village_id as u32,
            kind: movement_kind_from_str(&row.kind)?,
            units: UnitSet {
                archer: row.archer as u32,
                swordsman: row.swordsman as u32,
                knight: row.knight as u32,
                skirmisher: row.skirmisher as u32,
                nobleman: row.nobleman as u32,
            },
            created_at: row.created_at,
            arrival_at: row.arrival_at,
            return_at: row.return_at,
            completed: row.completed,
            return_resources: ResourceGroup::new(
                row.return_wood as u32,
                row.return_clay as u32,
                row.return_iron as u32,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips() {
        for kind in BuildingKind::ALL {
            assert_eq!(building_kind_from_str(building_kind_to_str(kind)).unwrap(), kind);
        }
        for kind in UnitKind::ALL {
            assert_eq!(unit_kind_from_str(unit_kind_to_str(kind)).unwrap(), kind);
        }
        assert!(building_kind_from_str("palace").is_err());
        assert!(unit_kind_from_str("dragon").is_err());
        assert!(movement_kind_from_str("parade").is_err());
    }
}
