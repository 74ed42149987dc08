mod get_village;
mod get_village_movements;

pub use get_village::GetVillageHandler;
pub use get_village_movements::GetVillageMovementsHandler;
