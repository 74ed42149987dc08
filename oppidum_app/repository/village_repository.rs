use oppidum_game::models::village::Village;
use oppidum_types::errors::ApplicationError;

#[async_trait::async_trait]
pub trait VillageRepository: Send + Sync {
    async fn get_by_id(&self, village_id: u32) -> Result<Village, ApplicationError>;

    /// Fetches the village under an exclusive row lock, held until the
    /// transaction ends.
    async fn get_by_id_for_update(&self, village_id: u32) -> Result<Village, ApplicationError>;

    async fn save(&self, village: &Village) -> Result<(), ApplicationError>;
}
