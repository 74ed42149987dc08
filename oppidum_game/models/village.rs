use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oppidum_types::buildings::BuildingKind;
use oppidum_types::common::{Position, Resource, ResourceGroup};
use oppidum_types::errors::GameError;
use oppidum_types::units::UnitSet;

use crate::catalog::buildings::{
    max_population, population, production_interval_ms, storage_capacity,
};
use crate::catalog::units::units_population;

/// A village aggregate: buildings, garrison, stocks and loyalty at a map
/// coordinate. Resource stocks are only meaningful relative to their
/// `last_*_update` timestamps; `tick_resources_until` reconciles them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Village {
    pub id: u32,
    pub name: String,
    pub player_id: Option<Uuid>,
    pub position: Position,

    pub headquarters_lvl: u8,
    pub woodcutter_lvl: u8,
    pub clay_pit_lvl: u8,
    pub iron_mine_lvl: u8,
    pub farm_lvl: u8,
    pub storage_lvl: u8,
    pub barracks_lvl: u8,

    pub units: UnitSet,

    pub wood: u32,
    pub clay: u32,
    pub iron: u32,
    pub last_wood_update: DateTime<Utc>,
    pub last_clay_update: DateTime<Utc>,
    pub last_iron_update: DateTime<Utc>,

    pub loyalty: f64,
    pub created_at: DateTime<Utc>,
}

impl Village {
    pub fn building_level(&self, kind: BuildingKind) -> u8 {
        match kind {
            BuildingKind::Headquarters => self.headquarters_lvl,
            BuildingKind::Woodcutter => self.woodcutter_lvl,
            BuildingKind::ClayPit => self.clay_pit_lvl,
            BuildingKind::IronMine => self.iron_mine_lvl,
            BuildingKind::Farm => self.farm_lvl,
            BuildingKind::Storage => self.storage_lvl,
            BuildingKind::Barracks => self.barracks_lvl,
        }
    }

    pub fn set_building_level(&mut self, kind: BuildingKind, level: u8) {
        match kind {
            BuildingKind::Headquarters => self.headquarters_lvl = level,
            BuildingKind::Woodcutter => self.woodcutter_lvl = level,
            BuildingKind::ClayPit => self.clay_pit_lvl = level,
            BuildingKind::IronMine => self.iron_mine_lvl = level,
            BuildingKind::Farm => self.farm_lvl = level,
            BuildingKind::Storage => self.storage_lvl = level,
            BuildingKind::Barracks => self.barracks_lvl = level,
        }
    }

    pub fn increment_building_level(&mut self, kind: BuildingKind) {
        self.set_building_level(kind, self.building_level(kind) + 1);
    }

    pub fn resource(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Clay => self.clay,
            Resource::Iron => self.iron,
        }
    }

    fn set_resource(&mut self, resource: Resource, amount: u32) {
        match resource {
            Resource::Wood => self.wood = amount,
            Resource::Clay => self.clay = amount,
            Resource::Iron => self.iron = amount,
        }
    }

    pub fn last_update(&self, resource: Resource) -> DateTime<Utc> {
        match resource {
            Resource::Wood => self.last_wood_update,
            Resource::Clay => self.last_clay_update,
            Resource::Iron => self.last_iron_update,
        }
    }

    fn set_last_update(&mut self, resource: Resource, at: DateTime<Utc>) {
        match resource {
            Resource::Wood => self.last_wood_update = at,
            Resource::Clay => self.last_clay_update = at,
            Resource::Iron => self.last_iron_update = at,
        }
    }

    /// Current stocks of all three resources as one group.
    pub fn stocks(&self) -> ResourceGroup {
        ResourceGroup::new(self.wood, self.clay, self.iron)
    }

    pub fn storage_capacity(&self) -> u32 {
        storage_capacity(self.storage_lvl)
    }

    pub fn max_population(&self) -> u32 {
        max_population(self.farm_lvl)
    }

    /// Population occupied by all buildings plus the garrison.
    pub fn current_population(&self) -> u32 {
        let buildings: u32 = BuildingKind::ALL
            .iter()
            .map(|&kind| population(kind, self.building_level(kind)))
            .sum();
        buildings + units_population(&self.units)
    }

    /// Credits a single resource, capping at storage capacity.
    pub fn credit_resource(&mut self, resource: Resource, amount: u32) {
        let capacity = self.storage_capacity();
        let new_amount = (self.resource(resource) + amount).min(capacity);
        self.set_resource(resource, new_amount);
    }

    /// Credits a whole group of resources, each capped at storage capacity.
    pub fn store_resources(&mut self, resources: &ResourceGroup) {
        for resource in Resource::ALL {
            self.credit_resource(resource, resources.get(resource));
        }
    }

    pub fn has_enough_resources(&self, cost: &ResourceGroup) -> bool {
        self.wood >= cost.wood() && self.clay >= cost.clay() && self.iron >= cost.iron()
    }

    /// Tries to deduct resources. Fails if funds are insufficient.
    pub fn deduct_resources(&mut self, cost: &ResourceGroup) -> Result<(), GameError> {
        if !self.has_enough_resources(cost) {
            return Err(GameError::NotEnoughResources);
        }
        self.wood -= cost.wood();
        self.clay -= cost.clay();
        self.iron -= cost.iron();
        Ok(())
    }

    /// Removes looted resources, flooring each stock at zero.
    pub fn plunder_resources(&mut self, bounty: &ResourceGroup) {
        self.wood = self.wood.saturating_sub(bounty.wood());
        self.clay = self.clay.saturating_sub(bounty.clay());
        self.iron = self.iron.saturating_sub(bounty.iron());
    }

    /// Removes fallen units from the garrison, flooring each count at zero.
    pub fn apply_unit_losses(&mut self, lost: &UnitSet) {
        self.units = self.units.saturating_sub(lost);
    }

    /// Credits every production building's output accrued up to `until`.
    ///
    /// Each `last_*_update` advances by whole production intervals only, so
    /// the fractional remainder of the elapsed window is never lost. A full
    /// stock discards the credit but the timestamp still advances.
    pub fn tick_resources_until(&mut self, until: DateTime<Utc>, game_speed: f64) {
        for kind in [
            BuildingKind::Woodcutter,
            BuildingKind::ClayPit,
            BuildingKind::IronMine,
        ] {
            let level = self.building_level(kind);
            if level == 0 {
                continue;
            }
            let resource = kind.produces().expect("production building");
            let interval_ms = production_interval_ms(level, game_speed);
            if interval_ms == 0 {
                continue;
            }

            let last = self.last_update(resource);
            let elapsed_ms = (until - last).num_milliseconds();
            if elapsed_ms <= 0 {
                continue;
            }

            let produced = elapsed_ms as u64 / interval_ms;
            if produced > 0 {
                let used_ms = (produced * interval_ms) as i64;
                self.set_last_update(resource, last + Duration::milliseconds(used_ms));
                self.credit_resource(resource, produced as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::test_utils::{VillageFactoryOptions, village_factory};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_tick_credits_one_hour_of_wood() {
        let mut village = village_factory(VillageFactoryOptions {
            created_at: Some(t0()),
            ..Default::default()
        });
        assert_eq!(village.wood, 500);

        village.tick_resources_until(t0() + Duration::milliseconds(3_600_001), 1.0);

        // 30/h at level 1, interval 120_000 ms
        assert_eq!(village.wood, 530);
        assert_eq!(
            village.last_wood_update,
            t0() + Duration::milliseconds(3_600_000)
        );
    }

    #[test]
    fn test_tick_is_a_noop_below_one_interval() {
        let mut village = village_factory(VillageFactoryOptions {
            created_at: Some(t0()),
            ..Default::default()
        });

        village.tick_resources_until(t0() + Duration::milliseconds(119_999), 1.0);
        assert_eq!(village.wood, 500);
        assert_eq!(village.last_wood_update, t0());
    }

    #[test]
    fn test_tick_caps_at_storage_capacity() {
        let mut village = village_factory(VillageFactoryOptions {
            created_at: Some(t0()),
            ..Default::default()
        });
        village.wood = 1195;

        village.tick_resources_until(t0() + Duration::hours(2), 1.0);

        assert_eq!(village.wood, 1200, "stock must cap exactly at capacity");
        // the timestamp still advances even though part of the credit was lost
        assert_eq!(village.last_wood_update, t0() + Duration::hours(2));
    }

    #[test]
    fn test_tick_ignores_level_zero_buildings() {
        let mut village = village_factory(VillageFactoryOptions {
            created_at: Some(t0()),
            ..Default::default()
        });
        village.woodcutter_lvl = 0;

        village.tick_resources_until(t0() + Duration::hours(5), 1.0);

        assert_eq!(village.wood, 500);
        assert_eq!(village.last_wood_update, t0());
    }

    #[test]
    fn test_current_population_counts_buildings_and_garrison() {
        let mut village = village_factory(Default::default());
        // defaults: hq 5 + woodcutter 3 + clay pit 3 + iron mine 3 + farm 0
        // + storage 2 + barracks 4
        assert_eq!(village.current_population(), 20);

        village.units.archer = 10;
        village.units.nobleman = 1;
        assert_eq!(village.current_population(), 130);
    }

    #[test]
    fn test_deduct_resources_fails_when_short() {
        let mut village = village_factory(Default::default());
        let result = village.deduct_resources(&ResourceGroup::new(501, 0, 0));
        assert!(matches!(result, Err(GameError::NotEnoughResources)));
        assert_eq!(village.wood, 500, "failed deduction must not withdraw");

        village
            .deduct_resources(&ResourceGroup::new(500, 500, 500))
            .unwrap();
        assert_eq!(village.stocks(), ResourceGroup::new(0, 0, 0));
    }

    #[test]
    fn test_store_resources_caps_per_resource() {
        let mut village = village_factory(Default::default());
        village.store_resources(&ResourceGroup::new(5000, 100, 0));
        assert_eq!(village.wood, 1200);
        assert_eq!(village.clay, 600);
        assert_eq!(village.iron, 500);
    }
}
