use uuid::Uuid;

use oppidum_game::models::events::{BuildingEvent, UnitTrainingEvent};
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait BuildingEventRepository: Send + Sync {
    /// Uncompleted events of a village, ordered by creation time.
    async fn list_open(&self, village_id: u32) -> Result<Vec<BuildingEvent>, ApplicationError>;
    async fn save(&self, event: &BuildingEvent) -> Result<(), ApplicationError>;
}

#[async_trait::async_trait]
pub trait TrainingEventRepository: Send + Sync {
    /// Uncompleted events of a village, ordered by creation time.
    async fn list_open(&self, village_id: u32)
    -> Result<Vec<UnitTrainingEvent>, ApplicationError>;
    async fn save(&self, event: &UnitTrainingEvent) -> Result<(), ApplicationError>;
    /// Drained events are removed rather than kept as tombstones.
    async fn delete(&self, event_id: Uuid) -> Result<(), ApplicationError>;
}
