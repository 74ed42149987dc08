use uuid::Uuid;

use oppidum_types::battle::MovementKind;
use oppidum_types::buildings::BuildingKind;
use oppidum_types::units::{UnitKind, UnitSet};

use crate::cqrs::Command;

#[derive(Debug, Clone)]
pub struct ScheduleBuild {
    pub player_id: Uuid,
    pub village_id: u32,
    pub building: BuildingKind,
}

impl Command for ScheduleBuild {}

#[derive(Debug, Clone)]
pub struct TrainUnits {
    pub player_id: Uuid,
    pub village_id: u32,
    pub unit: UnitKind,
    pub count: u32,
}

impl Command for TrainUnits {}

/// Dispatches units towards another village as an attack, support or spy
/// mission, depending on `kind`.
#[derive(Debug, Clone)]
pub struct SendUnits {
    pub player_id: Uuid,
    pub village_id: u32,
    pub target_village_id: u32,
    pub units: UnitSet,
    pub kind: MovementKind,
}

impl Command for SendUnits {}

#[derive(Debug, Clone)]
pub struct CancelSupport {
    pub player_id: Uuid,
    pub village_id: u32,
    pub movement_id: Uuid,
}

impl Command for CancelSupport {}

/// Privileged: resolves every village with ripened attacks. Driven by the
/// combat ticker or an operator.
#[derive(Debug, Clone)]
pub struct ProcessCombatTick {}

impl Command for ProcessCombatTick {}
