use uuid::Uuid;

use oppidum_game::models::events::{BuildingEvent, UnitTrainingEvent};
use oppidum_game::models::movement::UnitMovement;
use oppidum_game::models::village::Village;

use crate::cqrs::Query;

/// A village as its owner sees it: state advanced to now plus the open
/// queues.
#[derive(Debug, Clone)]
pub struct VillageView {
    pub village: Village,
    pub build_queue: Vec<BuildingEvent>,
    pub training_queue: Vec<UnitTrainingEvent>,
}

#[derive(Debug, Clone)]
pub struct GetVillage {
    pub player_id: Uuid,
    pub village_id: u32,
}

impl Query for GetVillage {
    type Output = VillageView;
}

#[derive(Debug, Clone)]
pub struct GetVillageMovements {
    pub player_id: Uuid,
    pub village_id: u32,
}

impl Query for GetVillageMovements {
    type Output = Vec<UnitMovement>;
}
