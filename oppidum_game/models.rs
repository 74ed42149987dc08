pub mod events;
pub mod movement;
pub mod village;
