use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::battle::MovementKind;
use oppidum_types::common::ResourceGroup;
use oppidum_types::units::UnitSet;

/// Units travelling between two villages: an outbound leg towards
/// `target_village_id` and, once `return_at` is set, a return leg home.
/// A completed movement is terminal and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMovement {
    pub id: Uuid,
    /// Origin village; the movement is owned by it.
    pub village_id: u32,
    pub target_village_id: u32,
    pub kind: MovementKind,
    pub units: UnitSet,
    pub created_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub return_at: Option<DateTime<Utc>>,
    pub completed: bool,
    /// Payload credited at the origin when the return leg lands.
    pub return_resources: ResourceGroup,
}

impl UnitMovement {
    pub fn new(
        village_id: u32,
        target_village_id: u32,
        kind: MovementKind,
        units: UnitSet,
        created_at: DateTime<Utc>,
        arrival_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            village_id,
            target_village_id,
            kind,
            units,
            created_at,
            arrival_at,
            return_at: None,
            completed: false,
            return_resources: ResourceGroup::default(),
        }
    }

    /// A movement is ripe once it has arrived at the target and has not been
    /// consumed (by combat or a return leg) yet.
    pub fn is_ripe(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.return_at.is_none() && self.arrival_at <= now
    }

    pub fn is_returning(&self) -> bool {
        self.return_at.is_some()
    }
}
