use oppidum_types::buildings::BuildingKind;
use oppidum_types::common::ResourceGroup;

pub const MAX_BUILDING_LEVEL: u8 = 30;
pub const MAX_BUILD_QUEUE: usize = 2;

const LEVEL_COST_FACTOR: f64 = 1.25;
const POPULATION_FACTOR: f64 = 1.17;
const PRODUCTION_FACTOR: f64 = 1.17;
const BASE_PRODUCTION_PER_HOUR: f64 = 30.0;
const FARM_BASE_CAPACITY: f64 = 260.0;
const STORAGE_BASE_CAPACITY: f64 = 1200.0;
const STORAGE_CAPACITY_FACTOR: f64 = 1.24;
const HQ_REDUCTION_PER_LEVEL: f64 = 0.025;
const HQ_REDUCTION_FLOOR: f64 = 0.05;
const BARRACKS_BASE_QUEUE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct BuildingData {
    pub kind: BuildingKind,
    pub base_cost: ResourceGroup,
    pub base_build_time_ms: u64,
    pub base_population: u32,
}

static BUILDINGS: [BuildingData; 7] = [
    BuildingData {
        kind: BuildingKind::Headquarters,
        base_cost: ResourceGroup::new(95, 85, 75),
        base_build_time_ms: 1000 * 60 * 5,
        base_population: 5,
    },
    BuildingData {
        kind: BuildingKind::Woodcutter,
        base_cost: ResourceGroup::new(65, 55, 45),
        base_build_time_ms: 1000 * 60 * 4,
        base_population: 3,
    },
    BuildingData {
        kind: BuildingKind::ClayPit,
        base_cost: ResourceGroup::new(70, 55, 45),
        base_build_time_ms: 1000 * 60 * 4,
        base_population: 3,
    },
    BuildingData {
        kind: BuildingKind::IronMine,
        base_cost: ResourceGroup::new(70, 55, 40),
        base_build_time_ms: 1000 * 60 * 5,
        base_population: 3,
    },
    BuildingData {
        kind: BuildingKind::Farm,
        base_cost: ResourceGroup::new(55, 45, 35),
        base_build_time_ms: 1000 * 60 * 5,
        base_population: 0,
    },
    BuildingData {
        kind: BuildingKind::Storage,
        base_cost: ResourceGroup::new(65, 55, 45),
        base_build_time_ms: 1000 * 60 * 4,
        base_population: 2,
    },
    BuildingData {
        kind: BuildingKind::Barracks,
        base_cost: ResourceGroup::new(85, 70, 60),
        base_build_time_ms: 1000 * 60 * 6,
        base_population: 4,
    },
];

pub fn building_data(kind: BuildingKind) -> &'static BuildingData {
    BUILDINGS
        .iter()
        .find(|data| data.kind == kind)
        .expect("every building kind has a data entry")
}

/// Cost of the upgrade away from `level` (the building's current level).
pub fn upgrade_cost(kind: BuildingKind, level: u8) -> ResourceGroup {
    building_data(kind).base_cost * LEVEL_COST_FACTOR.powi(level as i32)
}

/// Raw construction time for the upgrade away from `level`, before the
/// headquarters reduction.
pub fn build_time_ms(kind: BuildingKind, level: u8, game_speed: f64) -> u64 {
    let base = building_data(kind).base_build_time_ms as f64;
    (base * LEVEL_COST_FACTOR.powi(level as i32) / game_speed) as u64
}

/// Population occupied by a building at `level`. Level 0 occupies none.
pub fn population(kind: BuildingKind, level: u8) -> u32 {
    if level == 0 {
        return 0;
    }
    let base = building_data(kind).base_population as f64;
    (base * POPULATION_FACTOR.powi(level as i32 - 1)) as u32
}

/// Hourly output of a production building at `level`. Level 0 produces nothing.
pub fn production_per_hour(level: u8, game_speed: f64) -> f64 {
    if level == 0 {
        return 0.0;
    }
    BASE_PRODUCTION_PER_HOUR * game_speed * PRODUCTION_FACTOR.powi(level as i32 - 1)
}

/// Milliseconds needed to produce a single resource at `level`.
pub fn production_interval_ms(level: u8, game_speed: f64) -> u64 {
    let rate = production_per_hour(level, game_speed);
    if rate <= 0.0 {
        return 0;
    }
    (3_600_000.0 / rate) as u64
}

/// Maximum population supported by the farm.
pub fn max_population(farm_level: u8) -> u32 {
    let exponent = farm_level.max(1) as i32 - 1;
    (FARM_BASE_CAPACITY * POPULATION_FACTOR.powi(exponent)) as u32
}

/// Maximum stock per resource given by the storage.
pub fn storage_capacity(storage_level: u8) -> u32 {
    let exponent = storage_level.max(1) as i32 - 1;
    (STORAGE_BASE_CAPACITY * STORAGE_CAPACITY_FACTOR.powi(exponent)) as u32
}

/// Construction time multiplier from the headquarters: 2.5% off per level
/// starting at level 2, floored at 0.05.
pub fn build_time_reduction(headquarters_level: u8) -> f64 {
    if headquarters_level <= 1 {
        return 1.0;
    }
    let reduction = (headquarters_level - 1) as f64 * HQ_REDUCTION_PER_LEVEL;
    (1.0 - reduction).max(HQ_REDUCTION_FLOOR)
}

/// Training time multiplier from the barracks, same shape as the
/// headquarters reduction.
pub fn training_speed_factor(barracks_level: u8) -> f64 {
    build_time_reduction(barracks_level)
}

/// How many units may wait in the training queue. Training is disallowed at
/// level 0, so the capacity is only defined for level >= 1.
pub fn training_queue_capacity(barracks_level: u8) -> u32 {
    BARRACKS_BASE_QUEUE_SIZE + (barracks_level.max(1) as u32 - 1)
}
