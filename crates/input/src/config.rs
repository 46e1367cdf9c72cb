use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for grab, drag, throw and shove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationConfig {
    /// Release impulse per unit of sampled velocity.
    pub throw_multiplier: f32,
    /// Minimum time between drag velocity samples.
    pub sample_interval_ms: u64,
    pub zoom_step: f32,
    pub min_grab_distance: f32,
    pub max_grab_distance: f32,
    /// Impulse magnitude of a shove.
    pub shove_strength: f32,
}

impl Default for ManipulationConfig {
    fn default() -> Self {
        Self {
            throw_multiplier: 2.0,
            sample_interval_ms: 50,
            zoom_step: 0.5,
            min_grab_distance: 1.0,
            max_grab_distance: 50.0,
            shove_strength: 5.0,
        }
    }
}

impl ManipulationConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(
            self.min_grab_distance,
            self.max_grab_distance.max(self.min_grab_distance),
        )
    }
}
