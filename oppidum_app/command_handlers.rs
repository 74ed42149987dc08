mod cancel_support;
mod helpers;
mod process_combat_tick;
mod schedule_build;
mod send_units;
mod train_units;

pub use cancel_support::CancelSupportCommandHandler;
pub use process_combat_tick::ProcessCombatTickCommandHandler;
pub use schedule_build::ScheduleBuildCommandHandler;
pub use send_units::SendUnitsCommandHandler;
pub use train_units::TrainUnitsCommandHandler;

pub(crate) use helpers::{ensure_owner, load_engine_for_update, persist_engine};
