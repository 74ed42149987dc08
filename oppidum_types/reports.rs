use serde::{Deserialize, Serialize};

use crate::common::ResourceGroup;
use crate::units::UnitSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportPayload {
    Battle(BattleReportPayload),
}

/// One participant's own slice of an engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleParticipationPayload {
    pub village_id: u32,
    /// Own units that survived the engagement.
    pub units: UnitSet,
    pub units_lost: UnitSet,
    pub loot_capacity: u64,
    pub bounty: ResourceGroup,
    /// True on the movement whose surviving nobleman took the village.
    pub conquering: bool,
}

/// Full engagement snapshot delivered to every involved player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReportPayload {
    pub attacker_won: bool,
    pub attacking_units: UnitSet,
    pub attacking_units_lost: UnitSet,
    pub defending_units: UnitSet,
    pub defending_units_lost: UnitSet,
    pub luck: f64,
    pub loyalty_before: f64,
    pub loyalty_damage: u32,
    pub conquered: bool,
    pub loot_capacity: u64,
    pub bounty: ResourceGroup,
    pub defender_village_id: u32,
    pub own: Option<BattleParticipationPayload>,
}
