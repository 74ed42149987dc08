use std::sync::Arc;
use tracing::info;

use oppidum_game::engine::send_back;
use oppidum_types::battle::MovementKind;
use oppidum_types::errors::{ApplicationError, DbError, GameError};

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    cqrs::{CommandHandler, commands::CancelSupport},
    uow::UnitOfWork,
};

use super::{ensure_owner, load_engine_for_update, persist_engine};

pub struct CancelSupportCommandHandler {
    clock: Arc<dyn Clock>,
}

impl Default for CancelSupportCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSupportCommandHandler {
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
impl CommandHandler<CancelSupport> for CancelSupportCommandHandler {
    async fn handle(
        &self,
        command: CancelSupport,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError> {
        let now = self.clock.now();

        let mut engine = load_engine_for_update(uow, command.village_id, now).await?;
        ensure_owner(&engine.village, command.player_id)?;
        engine.advance_to(now, config.game_speed)?;

        let mut movement = uow.movements().get_by_id(command.movement_id).await?;
        if movement.village_id != command.village_id {
            return Err(DbError::MovementNotFound(command.movement_id).into());
        }
        if movement.kind != MovementKind::Support || movement.completed || movement.is_returning()
        {
            return Err(GameError::MovementNotCancellable(command.movement_id).into());
        }

        let target = uow.villages().get_by_id(movement.target_village_id).await?;
        send_back(
            &mut movement,
            engine.village.position,
            target.position,
            now,
            config.game_speed,
        )?;

        uow.movements().save(&movement).await?;
        persist_engine(uow, &engine).await?;

        info!(
            movement_id = %movement.id,
            village_id = command.village_id,
            return_at = ?movement.return_at,
            "Support recalled."
        );

        Ok(())
    }
}
