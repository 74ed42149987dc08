use async_trait::async_trait;
use std::sync::Arc;

use oppidum_types::errors::ApplicationError;

use crate::{
    clock::{Clock, SystemClock},
    command_handlers::{ensure_owner, load_engine_for_update},
    config::Config,
    cqrs::{
        Query, QueryHandler,
        queries::{GetVillage, VillageView},
    },
    uow::UnitOfWork,
};

/// Owner-only view of a village, advanced to the present moment. The
/// advancement stays in memory: queries are rolled back, and the next
/// mutation re-derives the same state.
pub struct GetVillageHandler {
    clock: Arc<dyn Clock>,
}

impl Default for GetVillageHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GetVillageHandler {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl QueryHandler<GetVillage> for GetVillageHandler {
    async fn handle(
        &self,
        query: GetVillage,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<<GetVillage as Query>::Output, ApplicationError> {
        let now = self.clock.now();

        let mut engine = load_engine_for_update(uow, query.village_id, now).await?;
        ensure_owner(&engine.village, query.player_id)?;
        engine.advance_to(now, config.game_speed)?;

        Ok(VillageView {
            village: engine.village,
            build_queue: engine
                .build_queue
                .into_iter()
                .filter(|event| !event.completed)
                .collect(),
            training_queue: engine
                .training_queue
                .into_iter()
                .filter(|event| !event.completed)
                .collect(),
        })
    }
}
