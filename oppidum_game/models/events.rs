use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::buildings::BuildingKind;
use oppidum_types::units::UnitKind;

/// A queued building upgrade. At most one uncompleted event per village
/// carries a `complete_at`; the others wait with `complete_at = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingEvent {
    pub id: Uuid,
    pub village_id: u32,
    pub building: BuildingKind,
    pub created_at: DateTime<Utc>,
    pub complete_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl BuildingEvent {
    pub fn new(village_id: u32, building: BuildingKind, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            village_id,
            building,
            created_at,
            complete_at: None,
            completed: false,
        }
    }
}

/// A queued batch of units. `count` drains one unit at a time as the head
/// of the queue advances; the event is deleted once it reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTrainingEvent {
    pub id: Uuid,
    pub village_id: u32,
    pub unit: UnitKind,
    pub count: u32,
    pub created_at: DateTime<Utc>,
    pub complete_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl UnitTrainingEvent {
    pub fn new(village_id: u32, unit: UnitKind, count: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            village_id,
            unit,
            count,
            created_at,
            complete_at: None,
            completed: false,
        }
    }
}
