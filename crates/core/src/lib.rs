//! Rescue Simulation Core Library
//!
//! Simulates a building fire and the occupants trapped by it: fires start
//! at designated windows, grow, and spread to neighboring windows under a
//! global capacity cap, while occupants work their way floor by floor
//! toward the exit, waiting out any window that is still burning. The
//! embedding game applies water, opens the exit door and renders the
//! events the core emits.
//!
//! The simulation is deterministic for a given seed and advances in
//! discrete ticks; see [`RescueSimulation::update`].

pub mod building;
pub mod config;
pub mod error;
pub mod events;
pub mod fire;
pub mod registry;
pub mod simulation;
pub mod victim;
pub mod window;

pub use building::Building;
pub use config::{
    BuildingConfig, FireParams, SimulationConfig, SpreadConfig, SpreadStrategy, Vec2,
    VictimConfig, VictimType, WindowSpec,
};
pub use error::SetupError;
pub use events::SimEvent;
pub use fire::Fire;
pub use registry::FireCapacityRegistry;
pub use simulation::RescueSimulation;
pub use victim::{EvacState, OccupantHealth, Victim};
pub use window::{IgnitionOutcome, Window};
