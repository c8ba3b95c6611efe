//! Outbound notifications for rendering/audio subscribers
//!
//! The core pushes events into a queue the embedding layer drains once per
//! frame; there is no dependency back on the subscribers.

use crate::config::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A fire ignited at a previously unburned window.
    FireStarted { window: u32, position: Vec2 },
    /// A spread request passed its cooldown/capacity guards, whether or
    /// not a target was actually ignited.
    FireSpread { source: u32 },
    /// A window's fire was destroyed (water or external extinguish).
    FireExtinguished { window: u32 },
    VictimEscaped { victim: u32 },
    VictimDied { victim: u32 },
}

#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub(crate) fn extend(&mut self, events: impl IntoIterator<Item = SimEvent>) {
        self.events.extend(events);
    }

    pub(crate) fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
