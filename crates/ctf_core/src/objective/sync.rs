//! Authority / observer synchronization
//!
//! Only the authoritative instance mutates possession. Observers receive a
//! full `ObjectiveSnapshot` and apply it wholesale.

use super::kind::{Objective, ObjectiveKind};
use super::state::{HolderRecord, ObjectState};
use crate::error::Result;
use crate::types::{HolderId, ObjectiveId, Position, TeamId, TimeMs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Authority,
    Observer,
}

impl Role {
    pub fn is_authority(self) -> bool {
        matches!(self, Role::Authority)
    }
}

/// Replicated view of one objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSnapshot {
    pub id: ObjectiveId,
    pub kind: ObjectiveKind,
    /// Bumped on every authoritative state transition
    pub epoch: u64,
    pub state: ObjectState,
    pub team: Option<TeamId>,
    /// Present only while held
    pub holder: Option<HolderRecord>,
    pub location: Position,
    pub velocity: Position,
    pub movement_enabled: bool,
    /// When a dropped objective will return on its own
    pub auto_return_at: Option<TimeMs>,
    pub auto_return_time_ms: u64,
    pub gradual_auto_return: bool,
    pub friendly_can_pickup: bool,
    pub enemy_can_pickup: bool,
    pub pinged: bool,
    pub ghost: Option<Position>,
}

impl ObjectiveSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl Objective for ObjectiveSnapshot {
    fn id(&self) -> ObjectiveId {
        self.id
    }

    fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    fn state(&self) -> ObjectState {
        self.state
    }

    fn team(&self) -> Option<TeamId> {
        self.team
    }

    fn holder(&self) -> Option<HolderId> {
        self.holder.map(|r| r.holder)
    }

    fn location(&self) -> Position {
        self.location
    }
}
