//! Per-occupant evacuation state machine
//!
//! Occupants walk the fixed escape path: windows left to right along each
//! floor, then the stairs, then down, finishing at the exit door once the
//! rescuer signals it open. Every wait is a guard re-evaluated each tick
//! against live fire state; nothing here blocks the simulation.

use crate::building::Building;
use crate::config::{Vec2, VictimConfig, VictimType};
use crate::events::SimEvent;
use crate::victim::health::OccupantHealth;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How close an occupant must get to a waypoint to count as arrived.
const ARRIVAL_DISTANCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvacState {
    /// Walking to, or waiting at, window `slot` on the current floor.
    AtWindow { slot: usize, arrived: bool },
    /// Walking to, or waiting at, the current floor's stairs.
    MovingToStairs { arrived: bool },
    /// Going down one floor toward its first window.
    Descending,
    /// Walking to, or waiting at, the exit door.
    AtExit { arrived: bool },
    /// Terminal: out of the building.
    Escaped,
}

pub struct Victim {
    id: u32,
    position: Vec2,
    floor: usize,
    state: EvacState,
    victim_type: VictimType,
    move_speed: f32,
    panicking: bool,
    panic_delay_min: f32,
    panic_delay_max: f32,
    /// Remaining panic delay before the current leg starts.
    panic_timer: f32,
    health: OccupantHealth,
    rng: StdRng,
}

impl Victim {
    /// Spawn at the first window of the top floor.
    pub(crate) fn new(id: u32, config: &VictimConfig, building: &Building, seed: u64) -> Self {
        let floor = building.floors() - 1;
        let mut victim = Victim {
            id,
            position: building.window_position(floor, 0),
            floor,
            state: EvacState::AtWindow {
                slot: 0,
                arrived: false,
            },
            victim_type: config.victim_type,
            move_speed: config.base_move_speed * config.victim_type.speed_multiplier(),
            panicking: config.panicking,
            panic_delay_min: config.panic_delay_min,
            panic_delay_max: config.panic_delay_max,
            panic_timer: 0.0,
            health: OccupantHealth::new(config),
            rng: StdRng::seed_from_u64(seed),
        };
        victim.begin_leg();
        victim
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> EvacState {
        self.state
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn victim_type(&self) -> VictimType {
        self.victim_type
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn health(&self) -> &OccupantHealth {
        &self.health
    }

    pub fn has_escaped(&self) -> bool {
        self.state == EvacState::Escaped
    }

    pub fn set_panicking(&mut self, panicking: bool) {
        self.panicking = panicking;
    }

    /// One tick of the state machine. `fire_count` drives health decay;
    /// `door_opened` is the external rescue signal.
    pub(crate) fn update(
        &mut self,
        dt: f32,
        building: &Building,
        door_opened: bool,
        fire_count: u32,
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if self.state == EvacState::Escaped || !self.health.is_alive() {
            return events;
        }
        if fire_count > 0 && self.health.decay(fire_count, dt) {
            info!(victim = self.id, "victim died");
            events.push(SimEvent::VictimDied { victim: self.id });
            return events;
        }

        match self.state {
            EvacState::AtWindow {
                slot,
                arrived: false,
            } => {
                if self.panic_timer > 0.0 {
                    self.panic_timer -= dt;
                } else if self.move_towards(building.window_position(self.floor, slot), dt) {
                    self.state = EvacState::AtWindow {
                        slot,
                        arrived: true,
                    };
                }
            }
            EvacState::AtWindow {
                slot,
                arrived: true,
            } => {
                // Wait for this window's fire to clear before advancing
                if !building.is_burning_at(self.floor, slot) {
                    if slot + 1 == building.windows_per_floor() {
                        self.state = EvacState::MovingToStairs { arrived: false };
                    } else {
                        self.begin_leg();
                        self.state = EvacState::AtWindow {
                            slot: slot + 1,
                            arrived: false,
                        };
                    }
                }
            }
            EvacState::MovingToStairs { arrived: false } => {
                if self.move_towards(building.stair_position(self.floor), dt) {
                    self.state = EvacState::MovingToStairs { arrived: true };
                }
            }
            EvacState::MovingToStairs { arrived: true } => {
                if self.floor == 0 {
                    self.state = EvacState::AtExit { arrived: false };
                } else if !building.is_burning_at(self.floor - 1, 0) {
                    debug!(victim = self.id, floor = self.floor - 1, "descending");
                    self.state = EvacState::Descending;
                }
            }
            EvacState::Descending => {
                if self.move_towards(building.window_position(self.floor - 1, 0), dt) {
                    self.floor -= 1;
                    // A fresh floor starts a fresh window leg, panic delay
                    // included; the position already matches the window so
                    // arrival follows as soon as the timer runs out.
                    self.begin_leg();
                    self.state = EvacState::AtWindow {
                        slot: 0,
                        arrived: false,
                    };
                }
            }
            EvacState::AtExit { arrived: false } => {
                if self.move_towards(building.exit_door(), dt) {
                    self.state = EvacState::AtExit { arrived: true };
                }
            }
            EvacState::AtExit { arrived: true } => {
                if door_opened {
                    self.state = EvacState::Escaped;
                    info!(victim = self.id, "victim escaped");
                    events.push(SimEvent::VictimEscaped { victim: self.id });
                }
            }
            EvacState::Escaped => {}
        }
        events
    }

    /// Start a new window leg; panicking occupants hesitate first.
    fn begin_leg(&mut self) {
        self.panic_timer = if self.panicking {
            self.rng.random_range(self.panic_delay_min..=self.panic_delay_max)
        } else {
            0.0
        };
    }

    /// Step toward `target`, clamped to not overshoot. Returns true once
    /// within arrival distance.
    fn move_towards(&mut self, target: Vec2, dt: f32) -> bool {
        let delta = target - self.position;
        let distance = delta.magnitude();
        if distance <= ARRIVAL_DISTANCE {
            return true;
        }
        let step = self.move_speed * dt;
        if step >= distance {
            self.position = target;
            return true;
        }
        self.position += delta * (step / distance);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildingConfig, FireParams, SpreadConfig};
    use crate::events::EventQueue;
    use crate::registry::FireCapacityRegistry;

    fn two_by_two() -> Building {
        let config = BuildingConfig::grid(2, 2, 4.0, 3.0);
        Building::new(&config, FireParams::default(), SpreadConfig::default()).unwrap()
    }

    fn calm_victim(building: &Building) -> Victim {
        Victim::new(0, &VictimConfig::default(), building, 42)
    }

    fn run(victim: &mut Victim, building: &Building, door: bool, ticks: usize) {
        for _ in 0..ticks {
            victim.update(0.1, building, door, 0);
        }
    }

    #[test]
    fn walks_the_floor_then_takes_the_stairs() {
        let building = two_by_two();
        let mut victim = calm_victim(&building);
        assert_eq!(victim.floor(), 1);

        // No fires anywhere: top floor, stairs, ground floor, exit
        run(&mut victim, &building, false, 2000);
        assert_eq!(victim.state(), EvacState::AtExit { arrived: true });
        assert_eq!(victim.floor(), 0);
    }

    #[test]
    fn escapes_only_after_door_opens() {
        let building = two_by_two();
        let mut victim = calm_victim(&building);
        run(&mut victim, &building, false, 2000);
        assert!(!victim.has_escaped());

        victim.update(0.1, &building, true, 0);
        assert!(victim.has_escaped());
        // Terminal: further ticks change nothing
        run(&mut victim, &building, true, 10);
        assert!(victim.has_escaped());
    }

    #[test]
    fn blocked_at_burning_window_until_clear() {
        let mut building = two_by_two();
        let mut registry = FireCapacityRegistry::new(5);
        let mut events = EventQueue::default();
        // Last window of the top floor burns (floor 1, slot 1 -> number 4)
        building.ignite_window(4, 0.0, &mut registry, &mut events);

        let mut victim = calm_victim(&building);
        run(&mut victim, &building, false, 2000);
        assert_eq!(
            victim.state(),
            EvacState::AtWindow {
                slot: 1,
                arrived: true
            },
            "victim waits at the burning last window"
        );

        building.extinguish_window(4, &mut registry, &mut events);
        victim.update(0.1, &building, false, 0);
        assert_eq!(victim.state(), EvacState::MovingToStairs { arrived: false });
    }

    #[test]
    fn waits_at_stairs_while_floor_below_burns() {
        let mut building = two_by_two();
        let mut registry = FireCapacityRegistry::new(5);
        let mut events = EventQueue::default();
        // First window of the ground floor (number 1) blocks the descent
        building.ignite_window(1, 0.0, &mut registry, &mut events);

        let mut victim = calm_victim(&building);
        run(&mut victim, &building, false, 2000);
        assert_eq!(victim.state(), EvacState::MovingToStairs { arrived: true });
        assert_eq!(victim.floor(), 1);

        building.extinguish_window(1, &mut registry, &mut events);
        victim.update(0.1, &building, false, 0);
        assert_eq!(victim.state(), EvacState::Descending);
    }

    #[test]
    fn panic_delay_postpones_the_first_leg() {
        let building = two_by_two();
        let config = VictimConfig {
            panicking: true,
            panic_delay_min: 5.0,
            panic_delay_max: 6.0,
            ..VictimConfig::default()
        };
        let mut panicked = Victim::new(0, &config, &building, 7);
        let start = panicked.position();
        // Still hesitating well inside the minimum delay
        for _ in 0..40 {
            panicked.update(0.1, &building, false, 0);
        }
        assert_eq!(panicked.position(), start);
    }

    #[test]
    fn descent_rearms_the_panic_delay_at_the_floors_first_window() {
        let building = two_by_two();
        let config = VictimConfig {
            panicking: true,
            panic_delay_min: 5.0,
            panic_delay_max: 5.0,
            ..VictimConfig::default()
        };
        let mut victim = Victim::new(0, &config, &building, 9);
        // Walk the whole top floor and the stairs down
        for _ in 0..4000 {
            victim.update(0.1, &building, false, 0);
            if victim.floor() == 0 {
                break;
            }
        }
        assert_eq!(
            victim.state(),
            EvacState::AtWindow {
                slot: 0,
                arrived: false
            }
        );
        // Well inside the fresh five second delay the victim still hesitates
        for _ in 0..40 {
            victim.update(0.1, &building, false, 0);
        }
        assert_eq!(
            victim.state(),
            EvacState::AtWindow {
                slot: 0,
                arrived: false
            }
        );
    }

    #[test]
    fn dead_victims_stop_moving() {
        let building = two_by_two();
        let config = VictimConfig {
            max_health: 1.0,
            ..VictimConfig::default()
        };
        let mut victim = Victim::new(0, &config, &building, 3);
        let events = victim.update(10.0, &building, false, 4);
        assert!(matches!(events[..], [SimEvent::VictimDied { victim: 0 }]));
        assert!(!victim.health().is_alive());

        let position = victim.position();
        let later = victim.update(10.0, &building, false, 4);
        assert!(later.is_empty(), "death is reported once");
        assert_eq!(victim.position(), position);
    }
}
