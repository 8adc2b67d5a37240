//! Pickup rule flags

use serde::{Deserialize, Serialize};

/// Who may take the objective, and what touching it does otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupRules {
    /// Any character may pick it up regardless of team (default: false)
    pub anyone_can_pickup: bool,
    /// Owning team may carry it (default: false)
    pub friendly_can_pickup: bool,
    /// Opposing teams may carry it (default: true)
    pub enemy_can_pickup: bool,
    /// Owning team touching a dropped objective sends it home (default: false)
    pub team_pickup_sends_home: bool,
    /// Opposing team touching a dropped objective sends it home (default: false)
    pub enemy_pickup_sends_home: bool,
}

impl Default for PickupRules {
    fn default() -> Self {
        Self {
            anyone_can_pickup: false,
            friendly_can_pickup: false,
            enemy_can_pickup: true,
            team_pickup_sends_home: false,
            enemy_pickup_sends_home: false,
        }
    }
}
