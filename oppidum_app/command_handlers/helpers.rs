use chrono::{DateTime, Utc};
use uuid::Uuid;

use oppidum_game::engine::VillageEngine;
use oppidum_game::models::village::Village;
use oppidum_types::errors::{ApplicationError, GameError};

use crate::uow::UnitOfWork;

/// Loads a village under its row lock together with its open queues and
/// due return legs, ready to be advanced.
pub(crate) async fn load_engine_for_update(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    village_id: u32,
    now: DateTime<Utc>,
) -> Result<VillageEngine, ApplicationError> {
    let village = uow.villages().get_by_id_for_update(village_id).await?;
    let build_queue = uow.building_events().list_open(village_id).await?;
    let training_queue = uow.training_events().list_open(village_id).await?;
    let returning = uow.movements().list_returning(village_id, now).await?;

    Ok(VillageEngine::new(
        village,
        build_queue,
        training_queue,
        returning,
    ))
}

pub(crate) fn ensure_owner(village: &Village, player_id: Uuid) -> Result<(), ApplicationError> {
    if village.player_id != Some(player_id) {
        return Err(GameError::VillageNotOwned {
            village_id: village.id,
            player_id: Some(player_id),
        }
        .into());
    }
    Ok(())
}

/// Writes back everything an advance may have touched: the village row,
/// both queues (drained training events are deleted) and landed return
/// legs.
pub(crate) async fn persist_engine(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    engine: &VillageEngine,
) -> Result<(), ApplicationError> {
    uow.villages().save(&engine.village).await?;

    for event in &engine.build_queue {
        uow.building_events().save(event).await?;
    }

    for event in &engine.training_queue {
        if event.completed {
            uow.training_events().delete(event.id).await?;
        } else {
            uow.training_events().save(event).await?;
        }
    }

    for movement in &engine.returning {
        uow.movements().save(movement).await?;
    }

    Ok(())
}
