use std::sync::Arc;
use tracing::info;

use oppidum_types::errors::ApplicationError;

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    cqrs::{CommandHandler, commands::TrainUnits},
    uow::UnitOfWork,
};

use super::{ensure_owner, load_engine_for_update, persist_engine};

pub struct TrainUnitsCommandHandler {
    clock: Arc<dyn Clock>,
}

impl Default for TrainUnitsCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainUnitsCommandHandler {
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
impl CommandHandler<TrainUnits> for TrainUnitsCommandHandler {
    async fn handle(
        &self,
        command: TrainUnits,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let now = self.clock.now();

        let mut engine = load_engine_for_update(uow, command.village_id, now).await?;
        ensure_owner(&engine.village, command.player_id)?;

        engine.advance_to(now, config.game_speed)?;
        let event_id =
            engine.schedule_training(command.unit, command.count, now, config.game_speed)?;
        persist_engine(uow, &engine).await?;

        info!(
            village_id = command.village_id,
            unit = ?command.unit,
            count = command.count,
            %event_id,
            "Unit training queued."
        );

        Ok(())
    }
}
