//! Fire growth and extinguishing lifecycle
//!
//! A `Fire` is owned by exactly one window and advances two independent
//! accumulators: `health` grows every tick and requests a spread when it
//! saturates, `intensity` grows only under reinforcement (re-ignition of an
//! already burning window) and requests a spread when it crosses its own
//! threshold. Both channels can be disabled individually in [`FireParams`].

use crate::config::FireParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fire {
    params: FireParams,
    health: f32,
    intensity: f32,
    duplication_count: u32,
    is_duplicating: bool,
    extinguished: bool,
}

impl Fire {
    pub(crate) fn new(params: FireParams) -> Self {
        Fire {
            params,
            health: 0.0,
            intensity: 0.0,
            duplication_count: 0,
            is_duplicating: false,
            extinguished: false,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn duplication_count(&self) -> u32 {
        self.duplication_count
    }

    pub fn is_extinguished(&self) -> bool {
        self.extinguished
    }

    /// Advance the growth accumulator. Returns true when the saturation
    /// channel wants the coordinator to attempt a spread from this fire.
    pub(crate) fn grow(&mut self, dt: f32) -> bool {
        if self.extinguished {
            return false;
        }
        self.health = (self.health + self.params.growth_rate * dt).min(self.params.max_health);
        self.params.spread_on_saturation
            && self.health >= self.params.max_health
            && !self.is_duplicating
            && self.duplication_count < self.params.max_duplications
    }

    /// Advance the reinforcement accumulator. Returns true only on the tick
    /// the intensity crosses the spread threshold.
    pub(crate) fn intensify(&mut self, dt: f32) -> bool {
        if self.extinguished {
            return false;
        }
        let before = self.intensity;
        self.intensity += self.params.intensity_rate * dt;
        self.params.spread_on_intensity
            && before < self.params.spread_threshold
            && self.intensity >= self.params.spread_threshold
    }

    /// Level check for the intensity channel, used once a window's
    /// reinforcement cap is exhausted and only the spread request remains.
    pub(crate) fn intensity_ready(&self) -> bool {
        self.params.spread_on_intensity && self.intensity >= self.params.spread_threshold
    }

    /// Record a served spread. Health stays capped, not consumed.
    pub(crate) fn record_spread(&mut self) {
        self.duplication_count += 1;
        self.health = self.health.min(self.params.max_health);
    }

    pub(crate) fn set_duplicating(&mut self, value: bool) {
        self.is_duplicating = value;
    }

    /// Apply water of the given power. Returns true on the call that
    /// extinguishes the fire; further calls are no-ops.
    pub(crate) fn apply_water(&mut self, power: f32) -> bool {
        if self.extinguished {
            return false;
        }
        self.health -= power / self.params.water_effectiveness;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.extinguished = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn health_clamps_at_max() {
        let params = FireParams::default();
        let mut fire = Fire::new(params);
        for _ in 0..200 {
            fire.grow(0.1);
        }
        assert_relative_eq!(fire.health(), params.max_health);
    }

    #[test]
    fn saturation_requests_spread_until_duplication_budget_spent() {
        let params = FireParams {
            max_duplications: 1,
            ..FireParams::default()
        };
        let mut fire = Fire::new(params);
        // 10 health/s for 10s saturates
        for _ in 0..100 {
            fire.grow(0.1);
        }
        assert!(fire.grow(0.1));
        fire.record_spread();
        assert!(!fire.grow(0.1), "duplication budget exhausted");
    }

    #[test]
    fn intensity_crossing_fires_once() {
        let mut fire = Fire::new(FireParams::default());
        // 5 intensity/s, threshold 50: crosses on the 100th tick of 0.1s
        let mut crossings = 0;
        for _ in 0..120 {
            if fire.intensify(0.1) {
                crossings += 1;
            }
        }
        assert_eq!(crossings, 1);
        assert!(fire.intensity_ready());
    }

    #[test]
    fn exact_water_dose_extinguishes() {
        let params = FireParams::default();
        let mut fire = Fire::new(params);
        for _ in 0..30 {
            fire.grow(0.1);
        }
        let dose = params.water_effectiveness * fire.health();
        assert!(fire.apply_water(dose));
        assert!(fire.is_extinguished());
    }

    #[test]
    fn extinguishing_is_one_shot() {
        let mut fire = Fire::new(FireParams::default());
        fire.grow(0.1);
        assert!(fire.apply_water(1.0e6));
        assert!(!fire.apply_water(1.0e6));
        assert!(!fire.grow(0.1), "extinguished fire stops growing");
        assert_eq!(fire.health(), 0.0);
    }
}
