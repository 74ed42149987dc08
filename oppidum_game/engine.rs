use chrono::{DateTime, Duration, Utc};

use oppidum_types::battle::MovementKind;
use oppidum_types::buildings::BuildingKind;
use oppidum_types::common::Position;
use oppidum_types::errors::GameError;
use oppidum_types::units::{UnitKind, UnitSet};

use crate::catalog::buildings::{
    MAX_BUILD_QUEUE, MAX_BUILDING_LEVEL, build_time_ms, build_time_reduction, population,
    training_queue_capacity, upgrade_cost,
};
use crate::catalog::units::{speed_ms_per_tile, training_time_ms, unit_data};
use crate::models::events::{BuildingEvent, UnitTrainingEvent};
use crate::models::movement::UnitMovement;
use crate::models::village::Village;

/// A village plus its open queues and due return legs, loaded under the
/// village row lock. `advance_to` materialises the canonical state at a
/// given instant; the `schedule_*` operations validate and enqueue work.
///
/// Every mutation stays in memory; the caller persists the aggregate (and
/// deletes drained training events) within its own transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct VillageEngine {
    pub village: Village,
    pub build_queue: Vec<BuildingEvent>,
    pub training_queue: Vec<UnitTrainingEvent>,
    /// Own outbound movements whose return leg is due.
    pub returning: Vec<UnitMovement>,
}

impl VillageEngine {
    pub fn new(
        village: Village,
        mut build_queue: Vec<BuildingEvent>,
        mut training_queue: Vec<UnitTrainingEvent>,
        returning: Vec<UnitMovement>,
    ) -> Self {
        build_queue.sort_by_key(|event| event.created_at);
        training_queue.sort_by_key(|event| event.created_at);
        Self {
            village,
            build_queue,
            training_queue,
            returning,
        }
    }

    /// Brings the village up to date at `until`: finished training ticks,
    /// completed upgrades (with the resource window split at each
    /// completion), landed return legs, and a final resource tick.
    ///
    /// Idempotent: a second call with the same or an earlier instant is a
    /// no-op.
    pub fn advance_to(&mut self, until: DateTime<Utc>, game_speed: f64) -> Result<(), GameError> {
        self.sweep_training(until, game_speed)?;
        self.sweep_builds(until, game_speed)?;
        self.land_returning_movements(until);
        self.village.tick_resources_until(until, game_speed);
        Ok(())
    }

    fn sweep_training(&mut self, until: DateTime<Utc>, game_speed: f64) -> Result<(), GameError> {
        loop {
            if !self.training_queue.iter().any(|event| !event.completed) {
                return Ok(());
            }

            let due = self
                .training_queue
                .iter()
                .position(|event| !event.completed && event.complete_at.is_some());
            let Some(idx) = due else {
                self.assign_next_training_slot(until, game_speed)?;
                return Ok(());
            };

            let event = &mut self.training_queue[idx];
            let mut complete_at = event.complete_at.expect("selected above");
            if complete_at > until {
                return Ok(());
            }

            // One unit finishes per training interval, recomputed from the
            // current barracks level.
            let interval = Duration::milliseconds(training_time_ms(
                event.unit,
                self.village.barracks_lvl,
                game_speed,
            ) as i64);

            let mut trained = 0;
            while complete_at <= until {
                trained += 1;
                event.count -= 1;
                if event.count == 0 {
                    break;
                }
                complete_at += interval;
            }
            event.complete_at = Some(complete_at);

            let unit = event.unit;
            let drained = event.count == 0;
            if drained {
                event.completed = true;
            }
            self.village.units.add(unit, trained);

            if drained {
                self.assign_next_training_slot(complete_at, game_speed)?;
            } else {
                return Ok(());
            }
        }
    }

    fn sweep_builds(&mut self, until: DateTime<Utc>, game_speed: f64) -> Result<(), GameError> {
        loop {
            if !self.build_queue.iter().any(|event| !event.completed) {
                return Ok(());
            }

            let due = self
                .build_queue
                .iter()
                .position(|event| !event.completed && event.complete_at.is_some());
            let Some(idx) = due else {
                self.assign_next_build_slot(until, game_speed)?;
                return Ok(());
            };

            let complete_at = self.build_queue[idx].complete_at.expect("selected above");
            if complete_at > until {
                return Ok(());
            }

            // The pre-upgrade production rate applies up to the completion
            // instant, so the resource window splits here.
            self.village.tick_resources_until(complete_at, game_speed);

            let building = self.build_queue[idx].building;
            self.village.increment_building_level(building);
            self.build_queue[idx].completed = true;

            self.assign_next_build_slot(complete_at, game_speed)?;
        }
    }

    fn land_returning_movements(&mut self, until: DateTime<Utc>) {
        for idx in 0..self.returning.len() {
            let movement = &self.returning[idx];
            if movement.completed {
                continue;
            }
            let Some(return_at) = movement.return_at else {
                continue;
            };
            if return_at > until {
                continue;
            }
            let payload = movement.return_resources;
            self.village.store_resources(&payload);
            self.returning[idx].completed = true;
        }
    }

    fn assign_next_training_slot(
        &mut self,
        start: DateTime<Utc>,
        game_speed: f64,
    ) -> Result<(), GameError> {
        if self
            .training_queue
            .iter()
            .any(|event| !event.completed && event.complete_at.is_some())
        {
            return Err(GameError::AnotherEventAlreadySetCompleteAt(self.village.id));
        }

        let barracks_lvl = self.village.barracks_lvl;
        let Some(next) = self
            .training_queue
            .iter_mut()
            .find(|event| !event.completed)
        else {
            return Ok(());
        };

        let interval = training_time_ms(next.unit, barracks_lvl, game_speed);
        next.complete_at = Some(start + Duration::milliseconds(interval as i64));
        Ok(())
    }

    fn assign_next_build_slot(
        &mut self,
        start: DateTime<Utc>,
        game_speed: f64,
    ) -> Result<(), GameError> {
        if self
            .build_queue
            .iter()
            .any(|event| !event.completed && event.complete_at.is_some())
        {
            return Err(GameError::AnotherEventAlreadySetCompleteAt(self.village.id));
        }

        let Some(idx) = self.build_queue.iter().position(|event| !event.completed) else {
            return Ok(());
        };

        let kind = self.build_queue[idx].building;
        let raw = build_time_ms(kind, self.village.building_level(kind), game_speed);
        let reduction = build_time_reduction(self.village.headquarters_lvl);
        let adjusted = (raw as f64 * reduction) as u64;
        self.build_queue[idx].complete_at = Some(start + Duration::milliseconds(adjusted as i64));
        Ok(())
    }

    /// Validates and enqueues a building upgrade, withdrawing its cost.
    pub fn schedule_build(
        &mut self,
        kind: BuildingKind,
        now: DateTime<Utc>,
        game_speed: f64,
    ) -> Result<uuid::Uuid, GameError> {
        let open = self
            .build_queue
            .iter()
            .filter(|event| !event.completed)
            .count();
        if open >= MAX_BUILD_QUEUE {
            return Err(GameError::BuildQueueFull);
        }

        let level = self.village.building_level(kind);
        if level >= MAX_BUILDING_LEVEL {
            return Err(GameError::BuildingMaxLevelReached(kind));
        }

        // The farm raises the cap itself, so it skips the population check.
        if kind != BuildingKind::Farm {
            let delta = population(kind, level + 1) - population(kind, level);
            if self.village.current_population() + delta > self.village.max_population() {
                return Err(GameError::NotEnoughPopulation);
            }
        }

        self.village.deduct_resources(&upgrade_cost(kind, level))?;

        let event = BuildingEvent::new(self.village.id, kind, now);
        let event_id = event.id;
        self.build_queue.push(event);

        // Assigns complete_at to the new head if nothing is in flight.
        self.advance_to(now, game_speed)?;
        Ok(event_id)
    }

    /// Validates and enqueues a unit training batch, withdrawing its cost.
    pub fn schedule_training(
        &mut self,
        unit: UnitKind,
        count: u32,
        now: DateTime<Utc>,
        game_speed: f64,
    ) -> Result<uuid::Uuid, GameError> {
        if count == 0 {
            return Err(GameError::InvalidQuantity(count));
        }
        if self.village.barracks_lvl == 0 {
            return Err(GameError::BarracksRequired);
        }

        let open: Vec<&UnitTrainingEvent> = self
            .training_queue
            .iter()
            .filter(|event| !event.completed)
            .collect();
        let queued: u32 = open.iter().map(|event| event.count).sum();
        let capacity = training_queue_capacity(self.village.barracks_lvl);
        if queued + count > capacity {
            return Err(GameError::TrainingQueueFull(capacity));
        }

        let queued_population: u32 = open
            .iter()
            .map(|event| event.count * unit_data(event.unit).population)
            .sum();
        let needed_population = count * unit_data(unit).population;
        if self.village.current_population() + needed_population + queued_population
            > self.village.max_population()
        {
            return Err(GameError::NotEnoughPopulation);
        }

        let unit_cost = unit_data(unit).cost;
        let total_cost = oppidum_types::common::ResourceGroup::new(
            unit_cost.wood() * count,
            unit_cost.clay() * count,
            unit_cost.iron() * count,
        );
        self.village.deduct_resources(&total_cost)?;

        let event = UnitTrainingEvent::new(self.village.id, unit, count, now);
        let event_id = event.id;
        self.training_queue.push(event);

        self.advance_to(now, game_speed)?;
        Ok(event_id)
    }

    /// Garrison minus every unit currently away in an uncompleted movement.
    pub fn available_units(&self, outbound: &[UnitMovement]) -> UnitSet {
        let mut away = UnitSet::default();
        for movement in outbound.iter().filter(|movement| !movement.completed) {
            away = away + movement.units;
        }
        self.village.units.saturating_sub(&away)
    }

    /// Validates a new outbound movement and computes its arrival time.
    pub fn prepare_movement(
        &self,
        target_id: u32,
        target_position: Position,
        units: UnitSet,
        kind: MovementKind,
        outbound: &[UnitMovement],
        now: DateTime<Utc>,
        game_speed: f64,
    ) -> Result<UnitMovement, GameError> {
        if target_id == self.village.id {
            return Err(GameError::SelfTarget);
        }
        if units.is_empty() {
            return Err(GameError::NoUnitsSelected);
        }
        if !self.available_units(outbound).covers(&units) {
            return Err(GameError::NotEnoughUnits);
        }

        let distance = self.village.position.distance_to(&target_position);
        let travel = travel_time_ms(&units, distance, game_speed)?;
        let arrival_at = now + Duration::milliseconds(travel as i64);

        Ok(UnitMovement::new(
            self.village.id,
            target_id,
            kind,
            units,
            now,
            arrival_at,
        ))
    }
}

/// Travel time over `distance` tiles, limited by the slowest unit present.
pub fn travel_time_ms(units: &UnitSet, distance: f64, game_speed: f64) -> Result<u64, GameError> {
    let slowest = units
        .iter()
        .filter(|&(_, amount)| amount > 0)
        .map(|(kind, _)| speed_ms_per_tile(kind, game_speed))
        .max()
        .ok_or(GameError::NoUnitsSelected)?;
    Ok((slowest as f64 * distance) as u64)
}

/// Schedules the return leg of a movement. Before arrival the units turn
/// around mid-way, so the trip home takes exactly the elapsed outbound
/// time; afterwards it is a full journey from the target back home.
pub fn send_back(
    movement: &mut UnitMovement,
    origin_position: Position,
    target_position: Position,
    now: DateTime<Utc>,
    game_speed: f64,
) -> Result<(), GameError> {
    if now < movement.arrival_at {
        let elapsed = now - movement.created_at;
        movement.return_at = Some(now + elapsed);
    } else {
        let distance = target_position.distance_to(&origin_position);
        let travel = travel_time_ms(&movement.units, distance, game_speed)?;
        movement.return_at = Some(now + Duration::milliseconds(travel as i64));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use oppidum_types::common::ResourceGroup;

    use super::*;
    use crate::test_utils::{
        MovementFactoryOptions, VillageFactoryOptions, movement_factory, village_factory,
    };

    const SPEED: f64 = 1.0;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn engine_at_t0() -> VillageEngine {
        let village = village_factory(VillageFactoryOptions {
            created_at: Some(t0()),
            ..Default::default()
        });
        VillageEngine::new(village, vec![], vec![], vec![])
    }

    #[test]
    fn test_advance_pure_resource_tick() {
        let mut engine = engine_at_t0();
        engine
            .advance_to(t0() + Duration::milliseconds(3_600_001), SPEED)
            .unwrap();

        assert_eq!(engine.village.wood, 530);
        assert_eq!(engine.village.clay, 530);
        assert_eq!(engine.village.iron, 530);
        assert_eq!(
            engine.village.last_wood_update,
            t0() + Duration::milliseconds(3_600_000)
        );
    }

    #[test]
    fn test_advance_splits_window_at_upgrade_completion() {
        let mut engine = engine_at_t0();
        let mut event = BuildingEvent::new(engine.village.id, BuildingKind::Woodcutter, t0());
        event.complete_at = Some(t0() + Duration::milliseconds(1_800_001));
        engine.build_queue.push(event);

        engine
            .advance_to(t0() + Duration::milliseconds(3_600_001), SPEED)
            .unwrap();

        assert_eq!(engine.village.woodcutter_lvl, 2);
        // 15 at the level-1 rate, then 17 at the level-2 rate
        assert_eq!(engine.village.wood, 532);
        assert!(engine.build_queue[0].completed);
    }

    #[test]
    fn test_advance_is_idempotent() {
        let mut engine = engine_at_t0();
        let mut event = BuildingEvent::new(engine.village.id, BuildingKind::Woodcutter, t0());
        event.complete_at = Some(t0() + Duration::milliseconds(1_800_001));
        engine.build_queue.push(event);

        let until = t0() + Duration::milliseconds(3_600_001);
        engine.advance_to(until, SPEED).unwrap();
        let snapshot = engine.clone();

        engine.advance_to(until, SPEED).unwrap();
        assert_eq!(engine, snapshot);

        // an earlier instant never retracts state
        engine.advance_to(t0(), SPEED).unwrap();
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn test_schedule_build_queueing() {
        let mut engine = engine_at_t0();
        engine.village.farm_lvl = 5;
        engine.village.wood = 2000;
        engine.village.clay = 2000;
        engine.village.iron = 2000;

        engine
            .schedule_build(BuildingKind::Woodcutter, t0(), SPEED)
            .unwrap();
        engine
            .schedule_build(BuildingKind::ClayPit, t0(), SPEED)
            .unwrap();

        // woodcutter level 1 -> 2: 240_000 * 1.25, headquarters level 1
        assert_eq!(
            engine.build_queue[0].complete_at,
            Some(t0() + Duration::milliseconds(300_000))
        );
        assert_eq!(engine.build_queue[1].complete_at, None);

        let third = engine.schedule_build(BuildingKind::IronMine, t0(), SPEED);
        assert!(matches!(third, Err(GameError::BuildQueueFull)));
    }

    #[test]
    fn test_schedule_build_deducts_current_level_cost() {
        let mut engine = engine_at_t0();
        engine.village.farm_lvl = 5;
        engine.village.wood = 2000;
        engine.village.clay = 2000;
        engine.village.iron = 2000;

        engine
            .schedule_build(BuildingKind::Woodcutter, t0(), SPEED)
            .unwrap();

        // 65/55/45 * 1.25 at level 1
        assert_eq!(engine.village.wood, 2000 - 81);
        assert_eq!(engine.village.clay, 2000 - 68);
        assert_eq!(engine.village.iron, 2000 - 56);
    }

    #[test]
    fn test_schedule_build_max_level() {
        let mut engine = engine_at_t0();
        engine.village.woodcutter_lvl = 30;
        let result = engine.schedule_build(BuildingKind::Woodcutter, t0(), SPEED);
        assert!(matches!(
            result,
            Err(GameError::BuildingMaxLevelReached(BuildingKind::Woodcutter))
        ));
    }

    #[test]
    fn test_schedule_build_insufficient_resources() {
        let mut engine = engine_at_t0();
        engine.village.wood = 10;
        let result = engine.schedule_build(BuildingKind::Woodcutter, t0(), SPEED);
        assert!(matches!(result, Err(GameError::NotEnoughResources)));
    }

    #[test]
    fn test_farm_upgrade_skips_population_check() {
        let mut engine = engine_at_t0();
        engine.village.woodcutter_lvl = 2;
        // fill the farm to its cap: 20 from buildings + 1 from the higher
        // woodcutter level, garrison makes up the rest
        let max = engine.village.max_population();
        let occupied = engine.village.current_population();
        engine.village.units.archer = max - occupied;
        assert_eq!(engine.village.current_population(), max);

        let denied = engine.schedule_build(BuildingKind::Woodcutter, t0(), SPEED);
        assert!(matches!(denied, Err(GameError::NotEnoughPopulation)));

        engine.schedule_build(BuildingKind::Farm, t0(), SPEED).unwrap();
    }

    #[test]
    fn test_training_sweep_partial_progress() {
        let mut engine = engine_at_t0();
        let mut event =
            UnitTrainingEvent::new(engine.village.id, UnitKind::Swordsman, 5, t0());
        event.complete_at = Some(t0() + Duration::milliseconds(360_000));
        engine.training_queue.push(event);

        engine
            .advance_to(t0() + Duration::milliseconds(13 * 60_000), SPEED)
            .unwrap();

        assert_eq!(engine.village.units.swordsman, 2);
        let event = &engine.training_queue[0];
        assert_eq!(event.count, 3);
        assert!(!event.completed);
        assert_eq!(
            event.complete_at,
            Some(t0() + Duration::milliseconds(3 * 360_000))
        );
    }

    #[test]
    fn test_training_queue_hands_over_to_next_event() {
        let mut engine = engine_at_t0();
        let mut first = UnitTrainingEvent::new(engine.village.id, UnitKind::Archer, 1, t0());
        first.complete_at = Some(t0() + Duration::milliseconds(390_000));
        let second = UnitTrainingEvent::new(
            engine.village.id,
            UnitKind::Swordsman,
            1,
            t0() + Duration::seconds(1),
        );
        engine.training_queue.push(first);
        engine.training_queue.push(second);

        engine
            .advance_to(t0() + Duration::milliseconds(390_000 + 360_000), SPEED)
            .unwrap();

        assert_eq!(engine.village.units.archer, 1);
        assert_eq!(engine.village.units.swordsman, 1);
        assert!(engine.training_queue.iter().all(|event| event.completed));
    }

    #[test]
    fn test_duplicate_complete_at_is_an_invariant_violation() {
        let mut engine = engine_at_t0();
        let mut first = BuildingEvent::new(engine.village.id, BuildingKind::Woodcutter, t0());
        first.complete_at = Some(t0() + Duration::minutes(1));
        let mut second = BuildingEvent::new(
            engine.village.id,
            BuildingKind::ClayPit,
            t0() + Duration::seconds(1),
        );
        second.complete_at = Some(t0() + Duration::minutes(2));
        engine.build_queue.push(first);
        engine.build_queue.push(second);

        let result = engine.advance_to(t0() + Duration::minutes(5), SPEED);
        assert!(matches!(
            result,
            Err(GameError::AnotherEventAlreadySetCompleteAt(_))
        ));
    }

    #[test]
    fn test_returning_movement_credits_payload() {
        let mut engine = engine_at_t0();
        let mut movement = movement_factory(MovementFactoryOptions {
            village_id: Some(engine.village.id),
            created_at: Some(t0() - Duration::hours(2)),
            arrival_at: Some(t0() - Duration::hours(1)),
            ..Default::default()
        });
        movement.return_at = Some(t0() + Duration::minutes(10));
        movement.return_resources = ResourceGroup::new(100, 40, 0);
        engine.returning.push(movement);

        engine.advance_to(t0() + Duration::minutes(10), SPEED).unwrap();

        assert!(engine.returning[0].completed);
        assert_eq!(engine.village.wood, 605);
        assert_eq!(engine.village.clay, 545);
        assert_eq!(engine.village.iron, 505);
    }

    #[test]
    fn test_schedule_training_requires_barracks() {
        let mut engine = engine_at_t0();
        engine.village.barracks_lvl = 0;
        let result = engine.schedule_training(UnitKind::Swordsman, 1, t0(), SPEED);
        assert!(matches!(result, Err(GameError::BarracksRequired)));
    }

    #[test]
    fn test_schedule_training_rejects_zero_count() {
        let mut engine = engine_at_t0();
        let result = engine.schedule_training(UnitKind::Swordsman, 0, t0(), SPEED);
        assert!(matches!(result, Err(GameError::InvalidQuantity(0))));
    }

    #[test]
    fn test_schedule_training_queue_capacity_boundary() {
        let mut engine = engine_at_t0();
        engine.village.wood = 2000;
        engine.village.clay = 2000;
        engine.village.iron = 2000;

        // level 1 barracks holds exactly 10 queued units
        engine
            .schedule_training(UnitKind::Swordsman, 10, t0(), SPEED)
            .unwrap();
        let overflow = engine.schedule_training(UnitKind::Swordsman, 1, t0(), SPEED);
        assert!(matches!(overflow, Err(GameError::TrainingQueueFull(10))));
    }

    #[test]
    fn test_schedule_training_sets_first_due_time() {
        let mut engine = engine_at_t0();
        engine.village.wood = 2000;
        engine.village.clay = 2000;
        engine.village.iron = 2000;

        engine
            .schedule_training(UnitKind::Swordsman, 2, t0(), SPEED)
            .unwrap();

        // one swordsman at a level 1 barracks
        assert_eq!(
            engine.training_queue[0].complete_at,
            Some(t0() + Duration::milliseconds(360_000))
        );
    }

    #[test]
    fn test_schedule_training_population_check_counts_unit_cost() {
        let mut engine = engine_at_t0();
        // three noblemen want 300 population over a 260 cap
        let result = engine.schedule_training(UnitKind::Nobleman, 3, t0(), SPEED);
        assert!(matches!(result, Err(GameError::NotEnoughPopulation)));
    }

    #[test]
    fn test_prepare_movement_rejects_self_target() {
        let engine = engine_at_t0();
        let result = engine.prepare_movement(
            engine.village.id,
            engine.village.position,
            UnitSet {
                archer: 1,
                ..Default::default()
            },
            MovementKind::Attack,
            &[],
            t0(),
            SPEED,
        );
        assert!(matches!(result, Err(GameError::SelfTarget)));
    }

    #[test]
    fn test_prepare_movement_rejects_empty_set() {
        let engine = engine_at_t0();
        let result = engine.prepare_movement(
            99,
            Position { x: 5, y: 5 },
            UnitSet::default(),
            MovementKind::Attack,
            &[],
            t0(),
            SPEED,
        );
        assert!(matches!(result, Err(GameError::NoUnitsSelected)));
    }

    #[test]
    fn test_prepare_movement_accounts_for_units_away() {
        let mut engine = engine_at_t0();
        engine.village.units.archer = 10;

        let away = movement_factory(MovementFactoryOptions {
            village_id: Some(engine.village.id),
            units: Some(UnitSet {
                archer: 6,
                ..Default::default()
            }),
            ..Default::default()
        });

        let result = engine.prepare_movement(
            99,
            Position { x: 5, y: 5 },
            UnitSet {
                archer: 5,
                ..Default::default()
            },
            MovementKind::Attack,
            &[away],
            t0(),
            SPEED,
        );
        assert!(matches!(result, Err(GameError::NotEnoughUnits)));
    }

    #[test]
    fn test_prepare_movement_travel_time_uses_slowest_unit() {
        let mut engine = engine_at_t0();
        engine.village.units.archer = 5;
        engine.village.units.swordsman = 5;

        let movement = engine
            .prepare_movement(
                99,
                Position { x: 3, y: 4 },
                UnitSet {
                    archer: 2,
                    swordsman: 2,
                    ..Default::default()
                },
                MovementKind::Support,
                &[],
                t0(),
                SPEED,
            )
            .unwrap();

        // distance 5, swordsman pace 1_200_000 ms/tile
        assert_eq!(
            movement.arrival_at,
            t0() + Duration::milliseconds(6_000_000)
        );
        assert_eq!(movement.kind, MovementKind::Support);
        assert_eq!(movement.return_at, None);
        assert!(!movement.completed);
    }

    #[test]
    fn test_send_back_before_arrival_is_symmetric() {
        let mut movement = movement_factory(MovementFactoryOptions {
            created_at: Some(t0()),
            arrival_at: Some(t0() + Duration::minutes(60)),
            ..Default::default()
        });

        let now = t0() + Duration::minutes(10);
        send_back(
            &mut movement,
            Position { x: 0, y: 0 },
            Position { x: 3, y: 4 },
            now,
            SPEED,
        )
        .unwrap();

        assert_eq!(movement.return_at, Some(t0() + Duration::minutes(20)));
    }

    #[test]
    fn test_send_back_after_arrival_travels_home() {
        let mut movement = movement_factory(MovementFactoryOptions {
            created_at: Some(t0() - Duration::hours(3)),
            arrival_at: Some(t0() - Duration::hours(1)),
            units: Some(UnitSet {
                archer: 3,
                ..Default::default()
            }),
            ..Default::default()
        });

        send_back(
            &mut movement,
            Position { x: 0, y: 0 },
            Position { x: 3, y: 4 },
            t0(),
            SPEED,
        )
        .unwrap();

        // distance 5 at the archer's 1_080_000 ms/tile
        assert_eq!(
            movement.return_at,
            Some(t0() + Duration::milliseconds(5_400_000))
        );
    }
}
