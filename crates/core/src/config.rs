//! Simulation configuration
//!
//! All tunable parameters for the fire and evacuation systems, grouped the
//! way they are consumed: per-fire growth constants, building-wide spread
//! policy, and per-occupant behavior. Every struct is serde-friendly so
//! scenarios can be loaded from files.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub type Vec2 = Vector2<f32>;

/// Growth and extinguishing constants shared by every fire instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireParams {
    /// Health ceiling; reaching it makes the fire request a spread.
    pub max_health: f32,
    /// Health gained per second.
    pub growth_rate: f32,
    /// Intensity level at which the re-ignition channel requests a spread.
    pub spread_threshold: f32,
    /// Intensity gained per second of reinforcement.
    pub intensity_rate: f32,
    /// Divisor applied to incoming water power.
    pub water_effectiveness: f32,
    /// How many times a single fire may seed another window.
    pub max_duplications: u32,
    /// Enable the health-saturation spread channel.
    pub spread_on_saturation: bool,
    /// Enable the intensity-threshold spread channel.
    pub spread_on_intensity: bool,
}

impl Default for FireParams {
    fn default() -> Self {
        FireParams {
            max_health: 100.0,
            growth_rate: 10.0,
            spread_threshold: 50.0,
            intensity_rate: 5.0,
            water_effectiveness: 10.0,
            max_duplications: 3,
            spread_on_saturation: true,
            spread_on_intensity: true,
        }
    }
}

/// How the coordinator picks spread targets for a source window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpreadStrategy {
    /// Index offsets -1/+1/-2/+2 from the source window number.
    Adjacency,
    /// Per-window designated exit targets, falling back to `Adjacency`
    /// for windows without any.
    Designated,
    /// Every unburned window within `radius` of the source position.
    Proximity { radius: f32 },
}

/// Building-wide spread policy and admission limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadConfig {
    /// Hard ceiling on simultaneously active fires.
    pub max_fires: u32,
    /// Probability that a served spread request actually ignites a target.
    pub spread_chance: f32,
    /// Minimum seconds between two served spread requests.
    pub fire_spread_cooldown: f32,
    /// Seconds between proximity re-scans of unburned windows.
    pub fire_spread_interval: f32,
    /// Distance below which an unburned window catches from a burning one.
    pub proximity_threshold: f32,
    pub strategy: SpreadStrategy,
    /// 0-based indices of windows ignited at simulation start.
    pub starting_fire_windows: Vec<usize>,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        SpreadConfig {
            max_fires: 5,
            spread_chance: 0.5,
            fire_spread_cooldown: 5.0,
            fire_spread_interval: 5.0,
            proximity_threshold: 5.0,
            strategy: SpreadStrategy::Adjacency,
            starting_fire_windows: Vec::new(),
        }
    }
}

/// One window of the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub position: Vec2,
    /// Designated spread targets (1-based window numbers, at most two).
    #[serde(default)]
    pub exits: Vec<u32>,
    /// Reinforcement cap: how many re-ignitions raise intensity before the
    /// window only forwards spread requests.
    #[serde(default = "default_max_fire_count")]
    pub max_fire_count: u32,
}

fn default_max_fire_count() -> u32 {
    3
}

impl WindowSpec {
    pub fn at(x: f32, y: f32) -> Self {
        WindowSpec {
            position: Vec2::new(x, y),
            exits: Vec::new(),
            max_fire_count: default_max_fire_count(),
        }
    }
}

/// Static topology of the building: a `floors x windows_per_floor` grid of
/// windows (floor 0 is the ground floor), one stair position per floor and
/// the exit door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub floors: usize,
    pub windows_per_floor: usize,
    /// Flat, floor-major from the ground up; length must equal
    /// `floors * windows_per_floor`.
    pub windows: Vec<WindowSpec>,
    /// One per floor.
    pub stair_positions: Vec<Vec2>,
    pub exit_door: Option<Vec2>,
}

impl BuildingConfig {
    /// Regular grid layout with the given horizontal and vertical spacing.
    /// Stairs sit one spacing past the last window of each floor, the exit
    /// door at the origin side of the ground floor.
    pub fn grid(floors: usize, windows_per_floor: usize, dx: f32, dy: f32) -> Self {
        let mut windows = Vec::with_capacity(floors * windows_per_floor);
        for floor in 0..floors {
            for slot in 0..windows_per_floor {
                windows.push(WindowSpec::at(slot as f32 * dx, floor as f32 * dy));
            }
        }
        let stair_positions = (0..floors)
            .map(|floor| Vec2::new(windows_per_floor as f32 * dx, floor as f32 * dy))
            .collect();
        BuildingConfig {
            floors,
            windows_per_floor,
            windows,
            stair_positions,
            exit_door: Some(Vec2::new(-dx, 0.0)),
        }
    }
}

/// Occupant archetype; scales movement speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VictimType {
    #[default]
    Normal,
    Child,
    Elderly,
    FastResponder,
}

impl VictimType {
    pub fn speed_multiplier(self) -> f32 {
        match self {
            VictimType::Normal => 1.0,
            VictimType::Child => 1.2,
            VictimType::Elderly => 0.8,
            VictimType::FastResponder => 1.5,
        }
    }
}

/// Per-occupant behavior and health parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimConfig {
    pub victim_type: VictimType,
    pub base_move_speed: f32,
    pub panicking: bool,
    /// Uniform panic-delay bounds, seconds, drawn before each window leg.
    pub panic_delay_min: f32,
    pub panic_delay_max: f32,
    pub max_health: f32,
    /// Health lost per second while at least one fire burns.
    pub base_decay_rate: f32,
    /// Additional loss per second per active fire.
    pub extra_damage_per_fire: f32,
}

impl Default for VictimConfig {
    fn default() -> Self {
        VictimConfig {
            victim_type: VictimType::Normal,
            base_move_speed: 2.0,
            panicking: false,
            panic_delay_min: 1.0,
            panic_delay_max: 3.0,
            max_health: 100.0,
            base_decay_rate: 1.0,
            extra_damage_per_fire: 0.5,
        }
    }
}

/// Complete scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub building: BuildingConfig,
    pub fire: FireParams,
    pub spread: SpreadConfig,
    pub victims: Vec<VictimConfig>,
    /// Seed for every random draw; identical seeds replay identically.
    pub seed: u64,
}

impl SimulationConfig {
    pub fn new(building: BuildingConfig) -> Self {
        SimulationConfig {
            building,
            fire: FireParams::default(),
            spread: SpreadConfig::default(),
            victims: Vec::new(),
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_layout_dimensions() {
        let config = BuildingConfig::grid(3, 3, 4.0, 3.0);
        assert_eq!(config.windows.len(), 9);
        assert_eq!(config.stair_positions.len(), 3);
        assert!(config.exit_door.is_some());
        // Second floor, last slot
        assert_eq!(config.windows[8].position, Vec2::new(8.0, 6.0));
    }

    #[test]
    fn victim_type_multipliers() {
        assert_eq!(VictimType::Normal.speed_multiplier(), 1.0);
        assert_eq!(VictimType::Child.speed_multiplier(), 1.2);
        assert_eq!(VictimType::Elderly.speed_multiplier(), 0.8);
        assert_eq!(VictimType::FastResponder.speed_multiplier(), 1.5);
    }
}
