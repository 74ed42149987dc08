use uuid::Uuid;

use oppidum_types::errors::ApplicationError;
use oppidum_types::reports::ReportPayload;

/// An inbox entry about to be delivered to a player.
#[derive(Debug, Clone)]
pub struct NewBattleMessage {
    pub to_player_id: Uuid,
    pub message: String,
    pub payload: ReportPayload,
}

#[async_trait::async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append-only delivery into the recipient's inbox.
    async fn add(&self, message: &NewBattleMessage) -> Result<(), ApplicationError>;
}
