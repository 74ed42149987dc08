use chrono::{DateTime, Utc};
use uuid::Uuid;

use oppidum_game::models::movement::UnitMovement;
use oppidum_types::battle::MovementKind;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait MovementRepository: Send + Sync {
    async fn get_by_id(&self, movement_id: Uuid) -> Result<UnitMovement, ApplicationError>;
    async fn save(&self, movement: &UnitMovement) -> Result<(), ApplicationError>;

    /// Uncompleted movements originating from a village.
    async fn list_open_by_origin(
        &self,
        village_id: u32,
    ) -> Result<Vec<UnitMovement>, ApplicationError>;

    /// Own movements whose return leg is due at `upto`.
    async fn list_returning(
        &self,
        village_id: u32,
        upto: DateTime<Utc>,
    ) -> Result<Vec<UnitMovement>, ApplicationError>;

    /// Movements of `kind` that have arrived at the target and have not
    /// been consumed yet, ordered by creation time.
    async fn list_ripe(
        &self,
        target_village_id: u32,
        kind: MovementKind,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnitMovement>, ApplicationError>;

    /// Distinct villages with at least one ripe attack waiting.
    async fn list_ripe_attack_targets(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<u32>, ApplicationError>;
}
