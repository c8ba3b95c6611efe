//! Global fire-count admission control
//!
//! A single counter gates every fire creation in the simulation against a
//! configured ceiling. The registry is an explicitly constructed value that
//! callers pass by reference; independent simulations therefore never share
//! state. Increment and decrement are only reachable from the window
//! ignite/extinguish paths, which keeps registration paired with fire
//! construction and destruction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireCapacityRegistry {
    active: u32,
    max_fires: u32,
}

impl FireCapacityRegistry {
    pub fn new(max_fires: u32) -> Self {
        FireCapacityRegistry {
            active: 0,
            max_fires,
        }
    }

    /// True iff another fire fits under the ceiling.
    pub fn can_spawn(&self) -> bool {
        self.active < self.max_fires
    }

    /// Number of currently active fires.
    pub fn count(&self) -> u32 {
        self.active
    }

    pub fn max_fires(&self) -> u32 {
        self.max_fires
    }

    pub(crate) fn increment(&mut self) {
        self.active += 1;
    }

    /// Saturates at zero; an unpaired decrement must not wrap the counter.
    pub(crate) fn decrement(&mut self) {
        self.active = self.active.saturating_sub(1);
    }
}
