use thiserror::Error;
use uuid::Uuid;

use crate::buildings::BuildingKind;

/// Rule violations raised by the village engine and the combat resolver.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Not enough resources")]
    NotEnoughResources,

    #[error("Not enough population capacity")]
    NotEnoughPopulation,

    #[error("Building queue is full")]
    BuildQueueFull,

    #[error("Unit training queue limit is {0}")]
    TrainingQueueFull(u32),

    #[error("Building {0:?} has already reached max level")]
    BuildingMaxLevelReached(BuildingKind),

    #[error("Barracks required to train units")]
    BarracksRequired,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("No units selected to send")]
    NoUnitsSelected,

    #[error("Cannot send units to own village")]
    SelfTarget,

    #[error("Not enough units available")]
    NotEnoughUnits,

    #[error("Village {village_id} not owned by player {player_id:?}")]
    VillageNotOwned {
        village_id: u32,
        player_id: Option<Uuid>,
    },

    #[error("Movement {0} cannot be cancelled")]
    MovementNotCancellable(Uuid),

    #[error("Another event has already set complete_at for village {0}")]
    AnotherEventAlreadySetCompleteAt(u32),
}
