//! Trapped occupants: evacuation state machines and health decay

pub mod evacuation;
pub mod health;

pub use evacuation::{EvacState, Victim};
pub use health::OccupantHealth;
