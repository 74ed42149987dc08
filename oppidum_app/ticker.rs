use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use oppidum_game::combat::{Luck, RandomLuck};
use oppidum_types::errors::ApplicationError;

use crate::clock::{Clock, SystemClock};
use crate::combat::resolve_target;
use crate::config::Config;
use crate::uow::UnitOfWorkProvider;

/// Periodic driver of the combat resolver. Each tick enumerates villages
/// with ripened attacks and resolves every one in its own transaction, so
/// a failing target never holds back the others.
pub struct CombatTicker {
    uow_provider: Arc<dyn UnitOfWorkProvider>,
    config: Arc<Config>,
    clock: Arc<dyn Clock>,
    luck: Arc<dyn Luck>,
}

impl CombatTicker {
    pub fn new(uow_provider: Arc<dyn UnitOfWorkProvider>, config: Arc<Config>) -> Self {
        Self {
            uow_provider,
            config,
            clock: Arc::new(SystemClock),
            luck: Arc::new(RandomLuck),
        }
    }

    pub fn with_dependencies(
        uow_provider: Arc<dyn UnitOfWorkProvider>,
        config: Arc<Config>,
        clock: Arc<dyn Clock>,
        luck: Arc<dyn Luck>,
    ) -> Self {
        Self {
            uow_provider,
            config,
            clock,
            luck,
        }
    }

    /// Spawns the ticking loop on the runtime.
    pub fn run(self: Arc<Self>) {
        let interval = Duration::from_secs(self.config.combat_tick_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match self.tick().await {
                    Ok(0) => {}
                    Ok(processed) => info!(processed, "Combat tick processed."),
                    Err(err) => error!(error = %err, "Combat tick failed."),
                }
            }
        });
    }

    /// Runs a single tick: one short transaction to enumerate targets, then
    /// one transaction per target.
    pub async fn tick(&self) -> Result<u32, ApplicationError> {
        let now = self.clock.now();

        let uow = self.uow_provider.tx().await?;
        let targets = uow.movements().list_ripe_attack_targets(now).await?;
        uow.rollback().await?;

        let mut processed = 0;
        for village_id in targets {
            let uow = self.uow_provider.tx().await?;
            match resolve_target(&uow, village_id, &self.config, now, self.luck.as_ref()).await {
                Ok(resolved) => {
                    uow.commit().await?;
                    if resolved {
                        processed += 1;
                    }
                }
                Err(err) => {
                    warn!(village_id, error = %err, "Failed to resolve attacks, rolling back.");
                    uow.rollback().await?;
                }
            }
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use oppidum_game::combat::FixedLuck;
    use oppidum_game::test_utils::{
        MovementFactoryOptions, VillageFactoryOptions, movement_factory, village_factory,
    };
    use oppidum_types::battle::MovementKind;
    use oppidum_types::units::UnitSet;
    use uuid::Uuid;

    use super::*;
    use crate::test_utils::{FixedClock, MockUnitOfWork, MockUnitOfWorkProvider};
    use crate::uow::UnitOfWork;

    #[tokio::test]
    async fn test_tick_resolves_each_ripe_target() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let shared = MockUnitOfWork::new();

        let attacker_player = Uuid::new_v4();
        let mut origin = village_factory(VillageFactoryOptions {
            id: Some(1),
            player_id: Some(attacker_player),
            created_at: Some(now),
            ..Default::default()
        });
        origin.units = UnitSet {
            archer: 50,
            swordsman: 50,
            ..Default::default()
        };
        let target = village_factory(VillageFactoryOptions {
            id: Some(2),
            barbarian: true,
            created_at: Some(now),
            ..Default::default()
        });
        shared.villages().save(&origin).await.unwrap();
        shared.villages().save(&target).await.unwrap();

        let movement = movement_factory(MovementFactoryOptions {
            village_id: Some(1),
            target_village_id: Some(2),
            kind: Some(MovementKind::Attack),
            units: Some(UnitSet {
                archer: 10,
                swordsman: 10,
                ..Default::default()
            }),
            created_at: Some(now - ChronoDuration::hours(1)),
            arrival_at: Some(now - ChronoDuration::minutes(1)),
        });
        shared.movements().save(&movement).await.unwrap();

        let provider = Arc::new(MockUnitOfWorkProvider::new(shared.clone()));
        let ticker = CombatTicker::with_dependencies(
            provider,
            Arc::new(Config::default()),
            Arc::new(FixedClock(now)),
            Arc::new(FixedLuck(0.0)),
        );

        let processed = ticker.tick().await.unwrap();
        assert_eq!(processed, 1);

        let resolved = shared.movements().get_by_id(movement.id).await.unwrap();
        assert!(resolved.return_at.is_some(), "survivors head home");

        // a second tick finds nothing left to do
        assert_eq!(ticker.tick().await.unwrap(), 0);
    }
}
