//! Ambient health decay driven by the active fire count
//!
//! While at least one fire burns, an occupant loses
//! `base_decay_rate + fire_count * extra_damage_per_fire` health per
//! second, floored at zero. Death is reported exactly once.

use crate::config::VictimConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupantHealth {
    current: f32,
    max_health: f32,
    base_decay_rate: f32,
    extra_damage_per_fire: f32,
}

impl OccupantHealth {
    pub(crate) fn new(config: &VictimConfig) -> Self {
        OccupantHealth {
            current: config.max_health,
            max_health: config.max_health,
            base_decay_rate: config.base_decay_rate,
            extra_damage_per_fire: config.extra_damage_per_fire,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Total decay per second for the given number of active fires.
    pub fn decay_rate(&self, fire_count: u32) -> f32 {
        self.base_decay_rate + fire_count as f32 * self.extra_damage_per_fire
    }

    /// Apply one tick of decay. Returns true on the tick health reaches
    /// zero; later calls return false.
    pub(crate) fn decay(&mut self, fire_count: u32, dt: f32) -> bool {
        if self.current <= 0.0 {
            return false;
        }
        self.current = (self.current - self.decay_rate(fire_count) * dt).max(0.0);
        self.current <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn health() -> OccupantHealth {
        OccupantHealth::new(&VictimConfig::default())
    }

    #[test]
    fn decay_rate_scales_with_fire_count() {
        // base 1.0, extra 0.5 per fire, 4 fires -> 3.0 per second
        assert_relative_eq!(health().decay_rate(4), 3.0);
        assert_relative_eq!(health().decay_rate(0), 1.0);
    }

    #[test]
    fn health_floors_at_zero() {
        let mut h = health();
        h.decay(4, 1000.0);
        assert_eq!(h.current(), 0.0);
        assert!(!h.is_alive());
    }

    #[test]
    fn death_reported_exactly_once() {
        let mut h = health();
        assert!(!h.decay(2, 1.0));
        assert!(h.decay(2, 1000.0));
        assert!(!h.decay(2, 1000.0), "already dead, no repeated death");
    }
}
