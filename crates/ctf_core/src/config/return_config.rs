//! Return-home configuration (auto return, gradual return trail)

use serde::{Deserialize, Serialize};

/// How a dropped objective finds its way home
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnConfig {
    /// Time a dropped objective waits before returning (ms) (default: 30000).
    /// 0 disables auto return.
    pub auto_return_time_ms: u64,
    /// Step home along the recorded trail instead of teleporting (default: false)
    pub gradual_auto_return: bool,
    /// Trail samples closer than this collapse into one (default: 1400.0)
    pub min_gradual_return_dist: f32,
    /// Max retained trail samples; oldest are evicted first (default: 64)
    pub trail_capacity: usize,
    /// Send home after any score event (default: true)
    pub send_home_on_score: bool,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self {
            auto_return_time_ms: 30_000,
            gradual_auto_return: false,
            min_gradual_return_dist: 1400.0,
            trail_capacity: 64,
            send_home_on_score: true,
        }
    }
}
