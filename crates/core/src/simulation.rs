//! Top-level rescue simulation
//!
//! Owns the building, the capacity registry, the occupants and the event
//! queue, and advances them with a single-threaded tick: the building
//! first, then every occupant against the freshly updated fire state.
//! Occupants never mutate fire state, so the occupant pass runs in
//! parallel with no observable ordering between them.

use crate::building::Building;
use crate::config::SimulationConfig;
use crate::error::SetupError;
use crate::events::{EventQueue, SimEvent};
use crate::registry::FireCapacityRegistry;
use crate::victim::Victim;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::info;

pub struct RescueSimulation {
    building: Building,
    registry: FireCapacityRegistry,
    victims: Vec<Victim>,
    rng: StdRng,
    events: EventQueue,
    door_opened: bool,
    simulation_time: f32,
}

impl RescueSimulation {
    /// Build the scenario, validate its topology and ignite the starting
    /// windows.
    pub fn new(config: &SimulationConfig) -> Result<Self, SetupError> {
        let mut building = Building::new(&config.building, config.fire, config.spread.clone())?;
        let mut registry = FireCapacityRegistry::new(config.spread.max_fires);
        let mut events = EventQueue::default();
        building.start_initial_fires(&mut registry, &mut events);

        let victims = config
            .victims
            .iter()
            .enumerate()
            .map(|(index, victim_config)| {
                // Derived per-occupant seed keeps the parallel pass
                // deterministic under any scheduling.
                let seed = config
                    .seed
                    .wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                Victim::new(index as u32, victim_config, &building, seed)
            })
            .collect::<Vec<_>>();

        info!(
            victims = victims.len(),
            initial_fires = registry.count(),
            "simulation ready"
        );
        Ok(RescueSimulation {
            building,
            registry,
            victims,
            rng: StdRng::seed_from_u64(config.seed),
            events,
            door_opened: false,
            simulation_time: 0.0,
        })
    }

    /// Advance the whole simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.simulation_time += dt;
        self.building
            .update(dt, &mut self.registry, &mut self.rng, &mut self.events);

        let fire_count = self.registry.count();
        let door_opened = self.door_opened;
        let building = &self.building;
        let victim_events: Vec<SimEvent> = self
            .victims
            .par_iter_mut()
            .flat_map(|victim| victim.update(dt, building, door_opened, fire_count))
            .collect();
        self.events.extend(victim_events);
    }

    /// Route water from the player's weapon into a window's fire. Returns
    /// true when this application extinguished it.
    pub fn apply_water(&mut self, window_number: u32, power: f32) -> bool {
        self.building
            .apply_water(window_number, power, &mut self.registry, &mut self.events)
    }

    /// Destroy a window's fire outright (external extinguish). Idempotent.
    pub fn extinguish_window(&mut self, window_number: u32) -> bool {
        self.building
            .extinguish_window(window_number, &mut self.registry, &mut self.events)
    }

    /// One-way signal raised when the rescuer breaks the exit door open.
    pub fn open_exit_door(&mut self) {
        if !self.door_opened {
            info!("exit door opened");
            self.door_opened = true;
        }
    }

    /// Hand pending notifications to the embedding layer.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn is_window_burning(&self, window_number: u32) -> bool {
        self.building.is_window_burning(window_number)
    }

    pub fn active_fire_count(&self) -> u32 {
        self.registry.count()
    }

    pub fn max_fires(&self) -> u32 {
        self.registry.max_fires()
    }

    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn victims(&self) -> &[Victim] {
        &self.victims
    }

    pub fn victims_mut(&mut self) -> &mut [Victim] {
        &mut self.victims
    }
}
