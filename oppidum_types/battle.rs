use serde::{Deserialize, Serialize};

use crate::units::UnitSet;

/// What a movement is travelling for. Exactly one per movement.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Attack,
    Support,
    Spy,
}

/// Outcome of a single engagement, before any side effect is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub attacker_won: bool,
    /// Surviving attacker units.
    pub attacking_units: UnitSet,
    pub attacking_units_lost: UnitSet,
    /// Surviving defender units.
    pub defending_units: UnitSet,
    pub defending_units_lost: UnitSet,
    pub luck: f64,
}
