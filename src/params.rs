/*
 * Simulation Parameters Module
 *
 * This module defines the parameter sets for the aquarium simulation:
 * the steering tuning shared by every fish, the predator tuning, the swim
 * bob, and the top level SimulationParams that ties them together with the
 * tank bounds and the tick policies. Every set has a Default that matches
 * the reference tuning and can be overridden from a JSON file.
 */

use serde::{Deserialize, Serialize};

use crate::bounds::AquariumBounds;
use crate::config::ConfigError;

/// Steering and containment tuning shared read-only by every fish.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub leader_follow_weight: f32,
    pub predator_avoid_weight: f32,
    // Containment
    pub bounce_force: f32,
    pub margin: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        let max_force = 0.05;
        Self {
            max_speed: 0.4,
            max_force,
            separation_radius: 5.0,
            alignment_radius: 10.0,
            cohesion_radius: 10.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            leader_follow_weight: 1.0,
            predator_avoid_weight: 3.0,
            bounce_force: max_force * 2.0,
            margin: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorParams {
    pub max_speed: f32,
    pub max_force: f32,
    /// Ticks between two nearest-fish scans.
    pub retarget_period: u32,
    pub bounce_force: f32,
    pub margin: f32,
}

impl Default for PredatorParams {
    fn default() -> Self {
        Self {
            max_speed: 0.3,
            max_force: 0.02,
            retarget_period: 200,
            bounce_force: 0.2,
            margin: 2.0,
        }
    }
}

/// Vertical bob applied around each fish's baseline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimParams {
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub cycle_rate: f32,
}

impl Default for SwimParams {
    fn default() -> Self {
        Self {
            bob_amplitude: 0.2,
            bob_frequency: 0.6,
            cycle_rate: 0.03,
        }
    }
}

/// Which positions neighbor queries observe within one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborPolicy {
    /// Every force is computed from the start-of-tick state.
    Snapshot,
    /// Fish are updated in roster order and later fish see the fresh
    /// positions of earlier ones.
    Sequential,
}

/// How far one tick advances the bodies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum IntegrationMode {
    /// One unit step per tick, independent of frame time.
    FixedStep,
    /// `step = dt * reference_rate`; matches FixedStep when the frame rate
    /// equals `reference_rate`.
    DeltaTime { reference_rate: f32 },
}

impl IntegrationMode {
    pub fn step(self, dt: f32) -> f32 {
        match self {
            IntegrationMode::FixedStep => 1.0,
            IntegrationMode::DeltaTime { reference_rate } => (dt * reference_rate).max(0.0),
        }
    }
}

// Parameters for the simulation that can be adjusted via UI or config file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub bounds: AquariumBounds,
    pub steering: SteeringParams,
    pub predator: PredatorParams,
    pub swim: SwimParams,
    pub initial_followers: usize,
    pub neighbor_policy: NeighborPolicy,
    pub integration: IntegrationMode,
    pub enable_parallel: bool,
    /// Fixed seed for a reproducible school; random when absent.
    pub seed: Option<u64>,
    /// Optional image drawn behind the tank.
    pub backdrop: Option<String>,
    pub show_debug: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            bounds: AquariumBounds::default(),
            steering: SteeringParams::default(),
            predator: PredatorParams::default(),
            swim: SwimParams::default(),
            initial_followers: 35,
            neighbor_policy: NeighborPolicy::Snapshot,
            integration: IntegrationMode::FixedStep,
            enable_parallel: false,
            seed: None,
            backdrop: None,
            show_debug: false,
        }
    }
}

impl SimulationParams {
    /// Reject tunings the simulation cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.steering;
        let positive = [
            ("steering.max_speed", s.max_speed),
            ("steering.max_force", s.max_force),
            ("steering.separation_radius", s.separation_radius),
            ("steering.alignment_radius", s.alignment_radius),
            ("steering.cohesion_radius", s.cohesion_radius),
            ("predator.max_speed", self.predator.max_speed),
            ("predator.max_force", self.predator.max_force),
            ("bounds.width", self.bounds.width),
            ("bounds.height", self.bounds.height),
            ("bounds.depth", self.bounds.depth),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if s.margin < 0.0 || self.predator.margin < 0.0 {
            return Err(ConfigError::Invalid("containment margins must not be negative".into()));
        }

        if self.predator.retarget_period == 0 {
            return Err(ConfigError::Invalid("predator.retarget_period must be at least 1".into()));
        }

        let widest_margin = s.margin.max(self.predator.margin) * 2.0;
        let smallest_side = self.bounds.width.min(self.bounds.height).min(self.bounds.depth);
        if smallest_side <= widest_margin {
            return Err(ConfigError::Invalid(format!(
                "tank side {} is too small for a containment margin of {}",
                smallest_side,
                widest_margin / 2.0
            )));
        }

        if let IntegrationMode::DeltaTime { reference_rate } = self.integration {
            if !(reference_rate.is_finite() && reference_rate > 0.0) {
                return Err(ConfigError::Invalid("integration reference_rate must be positive".into()));
            }
        }

        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.05..=2.0
    }

    pub fn get_max_force_range() -> std::ops::RangeInclusive<f32> {
        0.005..=0.5
    }

    pub fn get_weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=5.0
    }

    pub fn get_radius_range() -> std::ops::RangeInclusive<f32> {
        1.0..=30.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let params = SimulationParams::default();
        assert_eq!(params.steering.max_speed, 0.4);
        assert_eq!(params.steering.max_force, 0.05);
        assert!((params.steering.bounce_force - 0.1).abs() < 1.0e-6);
        assert_eq!(params.predator.retarget_period, 200);
        assert_eq!(params.initial_followers, 35);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn fixed_step_ignores_frame_time() {
        assert_eq!(IntegrationMode::FixedStep.step(0.5), 1.0);
        let delta = IntegrationMode::DeltaTime { reference_rate: 60.0 };
        assert!((delta.step(1.0 / 60.0) - 1.0).abs() < 1.0e-5);
        assert!((delta.step(1.0 / 30.0) - 2.0).abs() < 1.0e-5);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut params = SimulationParams::default();
        params.steering.max_speed = 0.0;
        assert!(params.validate().is_err());

        let mut params = SimulationParams::default();
        params.predator.retarget_period = 0;
        assert!(params.validate().is_err());

        let mut params = SimulationParams::default();
        params.bounds.height = 3.0;
        assert!(params.validate().is_err());
    }
}
