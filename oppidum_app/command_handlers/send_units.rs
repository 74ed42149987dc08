use std::sync::Arc;
use tracing::info;

use oppidum_types::errors::ApplicationError;

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    cqrs::{CommandHandler, commands::SendUnits},
    uow::UnitOfWork,
};

use super::{ensure_owner, load_engine_for_update, persist_engine};

pub struct SendUnitsCommandHandler {
    clock: Arc<dyn Clock>,
}

impl Default for SendUnitsCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SendUnitsCommandHandler {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait::async_trait]
impl CommandHandler<SendUnits> for SendUnitsCommandHandler {
    async fn handle(
        &self,
        command: SendUnits,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let now = self.clock.now();

        let mut engine = load_engine_for_update(uow, command.village_id, now).await?;
        ensure_owner(&engine.village, command.player_id)?;
        engine.advance_to(now, config.game_speed)?;
        // Flush the advance so landed return legs no longer count as away.
        persist_engine(uow, &engine).await?;

        // Read-committed is enough for the target: only its coordinates
        // matter here.
        let target = uow.villages().get_by_id(command.target_village_id).await?;
        let outbound = uow.movements().list_open_by_origin(command.village_id).await?;

        let movement = engine.prepare_movement(
            target.id,
            target.position,
            command.units,
            command.kind,
            &outbound,
            now,
            config.game_speed,
        )?;

        uow.movements().save(&movement).await?;

        info!(
            movement_id = %movement.id,
            village_id = command.village_id,
            target_village_id = command.target_village_id,
            kind = ?command.kind,
            arrival_at = %movement.arrival_at,
            "Unit movement planned."
        );

        Ok(())
    }
}
