//! Release trajectory parameters used when a holder drops the objective

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TossConfig {
    // === Velocity ===
    /// Forward throw speed added when the holder is still alive (default: 900.0)
    pub throw_speed: f32,
    /// Fraction of the holder's velocity inherited (default: 0.5)
    pub inherit_velocity: f32,
    /// Base random scatter speed, scaled by 0.5..1.5 (default: 218.0)
    pub scatter_speed: f32,
    /// Constant upward kick (default: 100.0)
    pub lift_speed: f32,

    // === Collision ===
    /// Objective capsule half height (default: 30.0)
    pub object_half_height: f32,
    /// Objective capsule radius, also the touch radius (default: 72.0)
    pub object_radius: f32,
    /// Side-step for alternative drop spots, as a fraction of holder radius (default: 0.5)
    pub adjust_fraction: f32,
}

impl Default for TossConfig {
    fn default() -> Self {
        Self {
            throw_speed: 900.0,
            inherit_velocity: 0.5,
            scatter_speed: 218.0,
            lift_speed: 100.0,

            object_half_height: 30.0,
            object_radius: 72.0,
            adjust_fraction: 0.5,
        }
    }
}
