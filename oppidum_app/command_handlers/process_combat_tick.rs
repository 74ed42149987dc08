use std::sync::Arc;
use tracing::info;

use oppidum_game::combat::{Luck, RandomLuck};
use oppidum_types::errors::ApplicationError;

use crate::{
    clock::{Clock, SystemClock},
    combat::resolve_ready_targets,
    config::Config,
    cqrs::{CommandHandler, commands::ProcessCombatTick},
    uow::UnitOfWork,
};

pub struct ProcessCombatTickCommandHandler {
    clock: Arc<dyn Clock>,
    luck: Arc<dyn Luck>,
}

impl Default for ProcessCombatTickCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCombatTickCommandHandler {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            luck: Arc::new(RandomLuck),
        }
    }

    pub fn with_dependencies(clock: Arc<dyn Clock>, luck: Arc<dyn Luck>) -> Self {
        Self { clock, luck }
    }
}

#[async_trait::async_trait]
impl CommandHandler<ProcessCombatTick> for ProcessCombatTickCommandHandler {
    async fn handle(
        &self,
        _command: ProcessCombatTick,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let now = self.clock.now();
        let processed = resolve_ready_targets(uow, config, now, self.luck.as_ref()).await?;
        info!(processed, "Combat tick processed.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use oppidum_game::combat::FixedLuck;
    use oppidum_game::test_utils::{
        MovementFactoryOptions, VillageFactoryOptions, movement_factory, village_factory,
    };
    use oppidum_types::battle::MovementKind;
    use oppidum_types::common::{Position, ResourceGroup};
    use oppidum_types::reports::ReportPayload;
    use oppidum_types::units::UnitSet;
    use uuid::Uuid;

    use super::*;
    use crate::test_utils::{FixedClock, MockUnitOfWork};

    fn units(archer: u32, swordsman: u32, knight: u32, skirmisher: u32) -> UnitSet {
        UnitSet {
            archer,
            swordsman,
            knight,
            skirmisher,
            nobleman: 0,
        }
    }

    fn setup() -> (MockUnitOfWork, Arc<Config>, DateTime<Utc>) {
        let uow = MockUnitOfWork::new();
        let config = Arc::new(Config::default());
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        (uow, config, now)
    }

    fn handler_with(now: DateTime<Utc>, luck: f64) -> ProcessCombatTickCommandHandler {
        ProcessCombatTickCommandHandler::with_dependencies(
            Arc::new(FixedClock(now)),
            Arc::new(FixedLuck(luck)),
        )
    }

    #[tokio::test]
    async fn test_tick_without_ripe_attacks_is_a_noop() {
        let (mock, config, now) = setup();
        let village = village_factory(VillageFactoryOptions {
            created_at: Some(now),
            ..Default::default()
        });
        mock.villages().save(&village).await.unwrap();

        // an attack still on its way is not ripe
        let movement = movement_factory(MovementFactoryOptions {
            village_id: Some(village.id),
            target_village_id: Some(2),
            created_at: Some(now),
            arrival_at: Some(now + Duration::hours(1)),
            ..Default::default()
        });
        mock.movements().save(&movement).await.unwrap();

        let message_repo = mock.message_repo();
        let uow: Box<dyn crate::uow::UnitOfWork<'static> + 'static> = Box::new(mock);
        let handler = handler_with(now, 0.0);
        handler
            .handle(ProcessCombatTick {}, &uow, &config)
            .await
            .unwrap();

        assert!(message_repo.sent().is_empty());
        let unchanged = uow.villages().get_by_id(village.id).await.unwrap();
        assert_eq!(unchanged, village);
    }

    #[tokio::test]
    async fn test_full_flow_with_looting() {
        let (mock, config, now) = setup();
        let attacker_player = Uuid::new_v4();
        let defender_player = Uuid::new_v4();

        let mut origin = village_factory(VillageFactoryOptions {
            id: Some(1),
            player_id: Some(attacker_player),
            created_at: Some(now),
            ..Default::default()
        });
        origin.units = units(15, 15, 5, 5);

        let mut target = village_factory(VillageFactoryOptions {
            id: Some(2),
            player_id: Some(defender_player),
            position: Some(Position { x: 3, y: 4 }),
            created_at: Some(now),
            ..Default::default()
        });
        target.units = units(5, 5, 2, 2);
        target.wood = 1000;
        target.clay = 1000;
        target.iron = 1000;

        mock.villages().save(&origin).await.unwrap();
        mock.villages().save(&target).await.unwrap();

        let movement = movement_factory(MovementFactoryOptions {
            village_id: Some(1),
            target_village_id: Some(2),
            kind: Some(MovementKind::Attack),
            units: Some(units(15, 15, 5, 5)),
            created_at: Some(now - Duration::hours(2)),
            arrival_at: Some(now - Duration::minutes(1)),
        });
        mock.movements().save(&movement).await.unwrap();

        let message_repo = mock.message_repo();
        let uow: Box<dyn crate::uow::UnitOfWork<'static> + 'static> = Box::new(mock);
        let handler = handler_with(now, 0.0);
        handler
            .handle(ProcessCombatTick {}, &uow, &config)
            .await
            .unwrap();

        let target_after = uow.villages().get_by_id(2).await.unwrap();
        assert!(target_after.units.is_empty(), "defender garrison is wiped");
        assert_eq!(target_after.stocks(), ResourceGroup::new(782, 782, 782));

        let origin_after = uow.villages().get_by_id(1).await.unwrap();
        assert_eq!(origin_after.units, units(13, 13, 4, 4));

        let movement_after = uow.movements().get_by_id(movement.id).await.unwrap();
        assert_eq!(movement_after.units, units(13, 13, 4, 4));
        assert_eq!(
            movement_after.return_resources,
            ResourceGroup::new(218, 218, 218)
        );
        assert!(movement_after.return_at.is_some());
        assert!(!movement_after.completed);

        // one report each for the attacker and the defender
        let sent = message_repo.sent();
        assert_eq!(sent.len(), 2);
        let attacker_report = sent
            .iter()
            .find(|message| message.to_player_id == attacker_player)
            .unwrap();
        let ReportPayload::Battle(payload) = &attacker_report.payload;
        assert!(payload.attacker_won);
        assert_eq!(payload.bounty, ResourceGroup::new(218, 218, 218));
        let own = payload.own.as_ref().unwrap();
        assert_eq!(own.units, units(13, 13, 4, 4));
        assert_eq!(own.units_lost, units(2, 2, 1, 1));
        assert!(sent.iter().any(|m| m.to_player_id == defender_player));
    }

    #[tokio::test]
    async fn test_conquest_transfers_ownership() {
        let (mock, config, now) = setup();
        let attacker_player = Uuid::new_v4();
        let defender_player = Uuid::new_v4();

        let mut origin = village_factory(VillageFactoryOptions {
            id: Some(1),
            player_id: Some(attacker_player),
            created_at: Some(now),
            ..Default::default()
        });
        origin.units = UnitSet {
            archer: 20,
            swordsman: 20,
            knight: 10,
            skirmisher: 10,
            nobleman: 1,
        };

        let mut target = village_factory(VillageFactoryOptions {
            id: Some(2),
            player_id: Some(defender_player),
            position: Some(Position { x: 3, y: 4 }),
            created_at: Some(now),
            ..Default::default()
        });
        target.units = units(5, 5, 2, 2);
        target.loyalty = 15.0;

        mock.villages().save(&origin).await.unwrap();
        mock.villages().save(&target).await.unwrap();

        let movement = movement_factory(MovementFactoryOptions {
            village_id: Some(1),
            target_village_id: Some(2),
            kind: Some(MovementKind::Attack),
            units: Some(UnitSet {
                archer: 20,
                swordsman: 20,
                knight: 10,
                skirmisher: 10,
                nobleman: 1,
            }),
            created_at: Some(now - Duration::hours(2)),
            arrival_at: Some(now - Duration::minutes(1)),
        });
        mock.movements().save(&movement).await.unwrap();

        let message_repo = mock.message_repo();
        let uow: Box<dyn crate::uow::UnitOfWork<'static> + 'static> = Box::new(mock);
        let handler = handler_with(now, 0.0);
        handler
            .handle(ProcessCombatTick {}, &uow, &config)
            .await
            .unwrap();

        let target_after = uow.villages().get_by_id(2).await.unwrap();
        assert_eq!(target_after.player_id, Some(attacker_player));
        assert_eq!(target_after.loyalty, 100.0);

        let sent = message_repo.sent();
        let conquest = sent
            .iter()
            .find(|message| message.to_player_id == attacker_player)
            .unwrap();
        assert!(conquest.message.starts_with("CONQUEST"));
        let ReportPayload::Battle(payload) = &conquest.payload;
        assert!(payload.conquered);
        assert!(payload.own.as_ref().unwrap().conquering);
        // luck 0 deals 28 loyalty damage, draining the 15 that was left
        assert_eq!(payload.loyalty_damage, 28);
        assert_eq!(payload.loyalty_before, 15.0);

        // the previous owner still learns about the loss
        let defender_report = sent
            .iter()
            .find(|message| message.to_player_id == defender_player)
            .unwrap();
        assert!(defender_report.message.contains("conquered"));
    }

    #[tokio::test]
    async fn test_supporters_share_defender_losses() {
        let (mock, config, now) = setup();
        let attacker_player = Uuid::new_v4();
        let defender_player = Uuid::new_v4();
        let supporter_player = Uuid::new_v4();

        let mut origin = village_factory(VillageFactoryOptions {
            id: Some(1),
            player_id: Some(attacker_player),
            created_at: Some(now),
            ..Default::default()
        });
        origin.units = units(50, 50, 25, 25);

        let mut target = village_factory(VillageFactoryOptions {
            id: Some(2),
            player_id: Some(defender_player),
            position: Some(Position { x: 3, y: 4 }),
            created_at: Some(now),
            ..Default::default()
        });
        target.units = units(3, 3, 1, 1);

        let mut support_origin = village_factory(VillageFactoryOptions {
            id: Some(3),
            player_id: Some(supporter_player),
            position: Some(Position { x: 6, y: 8 }),
            created_at: Some(now),
            ..Default::default()
        });
        support_origin.units = units(2, 2, 1, 1);

        mock.villages().save(&origin).await.unwrap();
        mock.villages().save(&target).await.unwrap();
        mock.villages().save(&support_origin).await.unwrap();

        let attack = movement_factory(MovementFactoryOptions {
            village_id: Some(1),
            target_village_id: Some(2),
            kind: Some(MovementKind::Attack),
            units: Some(units(50, 50, 25, 25)),
            created_at: Some(now - Duration::hours(2)),
            arrival_at: Some(now - Duration::minutes(1)),
        });
        let support = movement_factory(MovementFactoryOptions {
            village_id: Some(3),
            target_village_id: Some(2),
            kind: Some(MovementKind::Support),
            units: Some(units(2, 2, 1, 1)),
            created_at: Some(now - Duration::hours(3)),
            arrival_at: Some(now - Duration::minutes(30)),
        });
        mock.movements().save(&attack).await.unwrap();
        mock.movements().save(&support).await.unwrap();

        let message_repo = mock.message_repo();
        let uow: Box<dyn crate::uow::UnitOfWork<'static> + 'static> = Box::new(mock);
        let handler = handler_with(now, 0.0);
        handler
            .handle(ProcessCombatTick {}, &uow, &config)
            .await
            .unwrap();

        // the whole defense fell, supporters included
        let support_after = uow.movements().get_by_id(support.id).await.unwrap();
        assert!(support_after.units.is_empty());
        assert!(support_after.completed);

        let support_origin_after = uow.villages().get_by_id(3).await.unwrap();
        assert!(support_origin_after.units.is_empty());

        // attacker, defender and supporter each got a report
        assert_eq!(message_repo.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_reports_to_barbarian_villages_are_dropped() {
        let (mock, config, now) = setup();
        let attacker_player = Uuid::new_v4();

        let mut origin = village_factory(VillageFactoryOptions {
            id: Some(1),
            player_id: Some(attacker_player),
            created_at: Some(now),
            ..Default::default()
        });
        origin.units = units(50, 50, 25, 25);

        let mut target = village_factory(VillageFactoryOptions {
            id: Some(2),
            barbarian: true,
            position: Some(Position { x: 3, y: 4 }),
            created_at: Some(now),
            ..Default::default()
        });
        target.units = units(5, 5, 2, 2);

        mock.villages().save(&origin).await.unwrap();
        mock.villages().save(&target).await.unwrap();

        let movement = movement_factory(MovementFactoryOptions {
            village_id: Some(1),
            target_village_id: Some(2),
            kind: Some(MovementKind::Attack),
            units: Some(units(50, 50, 25, 25)),
            created_at: Some(now - Duration::hours(2)),
            arrival_at: Some(now - Duration::minutes(1)),
        });
        mock.movements().save(&movement).await.unwrap();

        let message_repo = mock.message_repo();
        let uow: Box<dyn crate::uow::UnitOfWork<'static> + 'static> = Box::new(mock);
        let handler = handler_with(now, 0.0);
        handler
            .handle(ProcessCombatTick {}, &uow, &config)
            .await
            .unwrap();

        // only the attacker hears about it
        let sent = message_repo.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_player_id, attacker_player);
    }
}
