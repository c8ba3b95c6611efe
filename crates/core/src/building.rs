//! Building fire-spread coordinator
//!
//! Owns the ordered window sequence and runs the global tick: grow every
//! active fire, serve the spread requests both channels raise, and on a
//! fixed interval re-scan unburned windows for proximity ignition. All
//! spread selection lives here, parameterized by [`SpreadStrategy`]; the
//! windows themselves only know their own fire.

use crate::config::{BuildingConfig, FireParams, SpreadConfig, SpreadStrategy, Vec2};
use crate::error::SetupError;
use crate::events::{EventQueue, SimEvent};
use crate::registry::FireCapacityRegistry;
use crate::window::{IgnitionOutcome, Window};
use rand::Rng;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{debug, info, trace};

pub struct Building {
    windows: Vec<Window>,
    floors: usize,
    windows_per_floor: usize,
    stair_positions: Vec<Vec2>,
    exit_door: Vec2,
    fire_params: FireParams,
    spread: SpreadConfig,
    /// Numbers of currently burning windows.
    burning: FxHashSet<u32>,
    time: f32,
    last_spread_time: f32,
    next_proximity_scan: f32,
}

impl Building {
    pub(crate) fn new(
        config: &BuildingConfig,
        fire_params: FireParams,
        spread: SpreadConfig,
    ) -> Result<Self, SetupError> {
        if config.floors == 0 || config.windows_per_floor == 0 {
            return Err(SetupError::EmptyTopology);
        }
        let expected = config.floors * config.windows_per_floor;
        if config.windows.len() != expected {
            return Err(SetupError::InvalidTopology {
                floors: config.floors,
                per_floor: config.windows_per_floor,
                found: config.windows.len(),
            });
        }
        if config.stair_positions.len() != config.floors {
            return Err(SetupError::MissingStairs {
                floors: config.floors,
                found: config.stair_positions.len(),
            });
        }
        let exit_door = config.exit_door.ok_or(SetupError::MissingExitDoor)?;

        let count = config.windows.len();
        let mut windows = Vec::with_capacity(count);
        for (index, spec) in config.windows.iter().enumerate() {
            let number = (index + 1) as u32;
            for &target in &spec.exits {
                if target == 0 || target as usize > count || target == number {
                    return Err(SetupError::SpreadTargetOutOfRange {
                        window: number,
                        target,
                        count,
                    });
                }
            }
            let floor = index / config.windows_per_floor;
            let slot = index % config.windows_per_floor;
            windows.push(Window::new(number, floor, slot, spec));
        }
        for &index in &spread.starting_fire_windows {
            if index >= count {
                return Err(SetupError::StartingWindowOutOfRange { index, count });
            }
        }

        info!(
            floors = config.floors,
            windows = count,
            max_fires = spread.max_fires,
            "building initialized"
        );
        let next_proximity_scan = spread.fire_spread_interval;
        Ok(Building {
            windows,
            floors: config.floors,
            windows_per_floor: config.windows_per_floor,
            stair_positions: config.stair_positions.clone(),
            exit_door,
            fire_params,
            spread,
            burning: FxHashSet::default(),
            time: 0.0,
            last_spread_time: 0.0,
            next_proximity_scan,
        })
    }

    /// Ignite the configured starting windows.
    pub(crate) fn start_initial_fires(
        &mut self,
        registry: &mut FireCapacityRegistry,
        events: &mut EventQueue,
    ) {
        let starting = self.spread.starting_fire_windows.clone();
        for index in starting {
            self.ignite_window((index + 1) as u32, 0.0, registry, events);
        }
    }

    /// One global simulation tick.
    pub(crate) fn update<R: Rng>(
        &mut self,
        dt: f32,
        registry: &mut FireCapacityRegistry,
        rng: &mut R,
        events: &mut EventQueue,
    ) {
        self.time += dt;

        // Phase 1: grow every active fire and collect spread requests.
        let mut requests: VecDeque<u32> = VecDeque::new();
        for window in &mut self.windows {
            let number = window.number();
            if let Some(fire) = window.fire_mut() {
                if fire.grow(dt) {
                    // Guards against a second request for the same fire
                    // while this one is still queued.
                    fire.set_duplicating(true);
                    requests.push_back(number);
                }
            }
        }

        // Phase 2: serve requests. A reinforcement that crosses the
        // intensity threshold queues a follow-up request; the visited set
        // bounds the chain within this tick.
        let mut visited: FxHashSet<u32> = requests.iter().copied().collect();
        while let Some(source) = requests.pop_front() {
            let follow_up = self.spread_from(source, dt, registry, rng, events);
            if let Some(fire) = self.window_mut(source).fire_mut() {
                fire.set_duplicating(false);
            }
            if let Some(next) = follow_up {
                if visited.insert(next) {
                    requests.push_back(next);
                }
            }
        }

        // Phase 3: interval proximity scan, the second ignition channel.
        if self.time >= self.next_proximity_scan {
            self.next_proximity_scan = self.time + self.spread.fire_spread_interval;
            self.refresh_burning_distances();
            let threshold = self.spread.proximity_threshold;
            let targets: Vec<u32> = self
                .windows
                .iter()
                .filter(|w| !w.burning() && w.distance_to_burning() < threshold)
                .map(Window::number)
                .collect();
            for number in targets {
                trace!(window = number, "proximity ignition check passed");
                self.ignite_window(number, dt, registry, events);
            }
        }
    }

    /// Serve one spread request. Returns the number of a window whose
    /// reinforcement crossed its intensity threshold and now wants its own
    /// spread attempt.
    fn spread_from<R: Rng>(
        &mut self,
        source: u32,
        dt: f32,
        registry: &mut FireCapacityRegistry,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> Option<u32> {
        if self.time - self.last_spread_time < self.spread.fire_spread_cooldown {
            trace!(source, "spread skipped, cooldown not elapsed");
            return None;
        }
        if !registry.can_spawn() {
            debug!(
                source,
                active = registry.count(),
                "spread skipped, fire capacity reached"
            );
            return None;
        }
        self.last_spread_time = self.time;

        let candidates = self.spread_candidates(source);
        let mut follow_up = None;
        if !candidates.is_empty() && rng.random::<f32>() < self.spread.spread_chance {
            let target = candidates[rng.random_range(0..candidates.len())];
            match self.ignite_window(target, dt, registry, events) {
                IgnitionOutcome::Started => {
                    if let Some(fire) = self.window_mut(source).fire_mut() {
                        fire.record_spread();
                    }
                    debug!(source, target, "fire spread");
                }
                IgnitionOutcome::Reinforced { wants_spread: true } => follow_up = Some(target),
                IgnitionOutcome::Reinforced { wants_spread: false } | IgnitionOutcome::Denied => {}
            }
        }
        // Subscribers hear about the attempt once the guards pass, whether
        // or not a window actually ignited.
        events.push(SimEvent::FireSpread { source });
        follow_up
    }

    /// Candidate target numbers for a spread from `source`.
    fn spread_candidates(&self, source: u32) -> Vec<u32> {
        let n = self.windows.len() as u32;
        match self.spread.strategy {
            SpreadStrategy::Adjacency => adjacency_candidates(source, n),
            SpreadStrategy::Designated => {
                let exits = self.window(source).exits();
                if exits.is_empty() {
                    adjacency_candidates(source, n)
                } else {
                    exits
                        .iter()
                        .copied()
                        .filter(|&t| !self.window(t).burning())
                        .collect()
                }
            }
            SpreadStrategy::Proximity { radius } => {
                let origin = self.window(source).position();
                self.windows
                    .iter()
                    .filter(|w| {
                        w.number() != source
                            && !w.burning()
                            && (w.position() - origin).magnitude() <= radius
                    })
                    .map(Window::number)
                    .collect()
            }
        }
    }

    pub(crate) fn ignite_window(
        &mut self,
        number: u32,
        dt: f32,
        registry: &mut FireCapacityRegistry,
        events: &mut EventQueue,
    ) -> IgnitionOutcome {
        let params = self.fire_params;
        let window = self.window_mut(number);
        let outcome = window.ignite(dt, params, registry);
        if outcome == IgnitionOutcome::Started {
            let position = window.position();
            self.burning.insert(number);
            info!(window = number, "fire started");
            events.push(SimEvent::FireStarted {
                window: number,
                position,
            });
        }
        outcome
    }

    pub(crate) fn extinguish_window(
        &mut self,
        number: u32,
        registry: &mut FireCapacityRegistry,
        events: &mut EventQueue,
    ) -> bool {
        if !self.valid_number(number) {
            debug!(window = number, "extinguish ignored, unknown window");
            return false;
        }
        if self.window_mut(number).extinguish(registry) {
            self.burning.remove(&number);
            info!(window = number, "fire extinguished");
            events.push(SimEvent::FireExtinguished { window: number });
            return true;
        }
        false
    }

    pub(crate) fn apply_water(
        &mut self,
        number: u32,
        power: f32,
        registry: &mut FireCapacityRegistry,
        events: &mut EventQueue,
    ) -> bool {
        if !self.valid_number(number) {
            debug!(window = number, "water ignored, unknown window");
            return false;
        }
        if self.window_mut(number).apply_water(power, registry) {
            self.burning.remove(&number);
            debug!(window = number, power, "water put the fire out");
            events.push(SimEvent::FireExtinguished { window: number });
            return true;
        }
        false
    }

    /// Recompute every window's distance to the nearest burning window.
    fn refresh_burning_distances(&mut self) {
        let burning_positions: Vec<Vec2> = self
            .burning
            .iter()
            .map(|&number| self.window(number).position())
            .collect();
        for window in &mut self.windows {
            let nearest = burning_positions
                .iter()
                .map(|&pos| (window.position() - pos).magnitude())
                .filter(|&d| d > f32::EPSILON)
                .fold(f32::INFINITY, f32::min);
            window.set_distance_to_burning(nearest);
        }
    }

    /// Valid window numbers are `1..=windows.len()`.
    fn valid_number(&self, number: u32) -> bool {
        number != 0 && number as usize <= self.windows.len()
    }

    fn window(&self, number: u32) -> &Window {
        &self.windows[(number - 1) as usize]
    }

    fn window_mut(&mut self, number: u32) -> &mut Window {
        &mut self.windows[(number - 1) as usize]
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    pub fn windows_per_floor(&self) -> usize {
        self.windows_per_floor
    }

    pub fn exit_door(&self) -> Vec2 {
        self.exit_door
    }

    pub fn stair_position(&self, floor: usize) -> Vec2 {
        self.stair_positions[floor]
    }

    /// False for unknown window numbers.
    pub fn is_window_burning(&self, number: u32) -> bool {
        self.valid_number(number) && self.window(number).burning()
    }

    /// Burning state at grid coordinates, floor 0 being the ground floor.
    pub fn is_burning_at(&self, floor: usize, slot: usize) -> bool {
        self.windows[floor * self.windows_per_floor + slot].burning()
    }

    pub fn window_position(&self, floor: usize, slot: usize) -> Vec2 {
        self.windows[floor * self.windows_per_floor + slot].position()
    }

    /// Number of windows currently holding a live fire.
    pub fn burning_window_count(&self) -> usize {
        self.burning.len()
    }
}

/// Index-offset candidates for a 1-based source number `i` among `n`
/// windows: `i-1` iff `i>1`, `i+1` iff `i<n`, `i-2` iff `i>2`,
/// `i+2` iff `i<n-1`.
fn adjacency_candidates(i: u32, n: u32) -> Vec<u32> {
    let mut candidates = Vec::with_capacity(4);
    if i > 1 {
        candidates.push(i - 1);
    }
    if i < n {
        candidates.push(i + 1);
    }
    if i > 2 {
        candidates.push(i - 2);
    }
    if i + 1 < n {
        candidates.push(i + 2);
    }
    candidates
}
