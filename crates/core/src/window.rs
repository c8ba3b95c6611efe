//! Window nodes of the fire-propagation graph
//!
//! A window exclusively owns at most one [`Fire`]; `burning()` is true iff
//! that fire exists. Every path that creates or destroys a fire runs
//! through this module and takes the capacity registry, so the active-fire
//! count can never drift from the number of burning windows.

use crate::config::{FireParams, Vec2, WindowSpec};
use crate::fire::Fire;
use crate::registry::FireCapacityRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of an ignition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionOutcome {
    /// A new fire was created and registered.
    Started,
    /// The window was already burning; the existing fire was reinforced
    /// instead. `wants_spread` reports an intensity-channel spread request.
    Reinforced { wants_spread: bool },
    /// Admission control refused the fire; the window stays unburned.
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    /// Stable 1-based number within the building's flat window sequence.
    number: u32,
    floor: usize,
    slot: usize,
    position: Vec2,
    /// Designated spread targets (window numbers), at most two.
    exits: Vec<u32>,
    /// Reinforcement cap before re-ignitions stop raising intensity.
    max_fire_count: u32,
    reinforce_count: u32,
    /// Distance to the nearest burning window, refreshed by the coordinator.
    distance_to_burning: f32,
    fire: Option<Fire>,
}

impl Window {
    pub(crate) fn new(number: u32, floor: usize, slot: usize, spec: &WindowSpec) -> Self {
        Window {
            number,
            floor,
            slot,
            position: spec.position,
            exits: spec.exits.clone(),
            max_fire_count: spec.max_fire_count,
            reinforce_count: 0,
            distance_to_burning: f32::INFINITY,
            fire: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn burning(&self) -> bool {
        self.fire.is_some()
    }

    pub fn fire(&self) -> Option<&Fire> {
        self.fire.as_ref()
    }

    pub(crate) fn fire_mut(&mut self) -> Option<&mut Fire> {
        self.fire.as_mut()
    }

    pub(crate) fn exits(&self) -> &[u32] {
        &self.exits
    }

    pub fn distance_to_burning(&self) -> f32 {
        self.distance_to_burning
    }

    pub(crate) fn set_distance_to_burning(&mut self, distance: f32) {
        self.distance_to_burning = distance;
    }

    /// Ignite this window. A burning window is reinforced instead of
    /// receiving a second fire; an admission-denied attempt leaves the
    /// window untouched.
    pub(crate) fn ignite(
        &mut self,
        dt: f32,
        params: FireParams,
        registry: &mut FireCapacityRegistry,
    ) -> IgnitionOutcome {
        if self.fire.is_some() {
            let wants_spread = self.reinforce(dt);
            return IgnitionOutcome::Reinforced { wants_spread };
        }
        if !registry.can_spawn() {
            debug!(
                window = self.number,
                active = registry.count(),
                "ignition denied, fire capacity reached"
            );
            return IgnitionOutcome::Denied;
        }
        self.fire = Some(Fire::new(params));
        registry.increment();
        IgnitionOutcome::Started
    }

    /// Raise the owned fire's intensity by one reinforcement tick. Once the
    /// per-window cap is exhausted only the spread request remains. Returns
    /// whether the intensity channel wants a spread.
    pub(crate) fn reinforce(&mut self, dt: f32) -> bool {
        let Some(fire) = self.fire.as_mut() else {
            return false;
        };
        if self.reinforce_count >= self.max_fire_count {
            return fire.intensity_ready();
        }
        self.reinforce_count += 1;
        fire.intensify(dt)
    }

    /// Drop the owned fire and release its capacity slot. Idempotent:
    /// returns true only when a fire was actually destroyed.
    pub(crate) fn extinguish(&mut self, registry: &mut FireCapacityRegistry) -> bool {
        if self.fire.take().is_some() {
            self.reinforce_count = 0;
            registry.decrement();
            return true;
        }
        false
    }

    /// Route water into the owned fire. Returns true when this application
    /// extinguished it (the window becomes unburned and the registry is
    /// decremented exactly once).
    pub(crate) fn apply_water(
        &mut self,
        power: f32,
        registry: &mut FireCapacityRegistry,
    ) -> bool {
        let Some(fire) = self.fire.as_mut() else {
            return false;
        };
        if fire.apply_water(power) {
            self.fire = None;
            self.reinforce_count = 0;
            registry.decrement();
            return true;
        }
        false
    }
}
