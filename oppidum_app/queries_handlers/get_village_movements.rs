use async_trait::async_trait;
use std::sync::Arc;

use oppidum_types::errors::ApplicationError;

use crate::{
    command_handlers::ensure_owner,
    config::Config,
    cqrs::{
        Query, QueryHandler,
        queries::GetVillageMovements,
    },
    uow::UnitOfWork,
};

pub struct GetVillageMovementsHandler {}

impl Default for GetVillageMovementsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GetVillageMovementsHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetVillageMovements> for GetVillageMovementsHandler {
    async fn handle(
        &self,
        query: GetVillageMovements,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<<GetVillageMovements as Query>::Output, ApplicationError> {
        let village = uow.villages().get_by_id(query.village_id).await?;
        ensure_owner(&village, query.player_id)?;

        uow.movements().list_open_by_origin(query.village_id).await
    }
}
