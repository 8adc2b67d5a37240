//! Short host-driven delays

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before re-scanning overlapping characters (ms) (default: 100)
    pub touch_recheck_delay_ms: u64,
    /// How long a fresh grab from home keeps the holder pinged (ms) (default: 2500)
    pub ping_duration_ms: u64,
    /// How long the pre-teleport location stays the "view point" (ms) (default: 5000)
    pub teleport_memory_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { touch_recheck_delay_ms: 100, ping_duration_ms: 2500, teleport_memory_ms: 5000 }
    }
}
