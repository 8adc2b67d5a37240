//! Shared identifiers and units.
//!
//! - Time: monotonic milliseconds since match start (`TimeMs`)
//! - Space: world units, `nalgebra::Vector3<f32>` (Z up)

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic host time in milliseconds
pub type TimeMs = u64;

/// World-space location or velocity
pub type Position = Vector3<f32>;

/// Build a position from an `[x, y, z]` triple (scenario/config friendly)
pub fn pos(v: [f32; 3]) -> Position {
    Vector3::new(v[0], v[1], v[2])
}

/// Team index. `TeamId::NONE` (255) means "no team".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl TeamId {
    pub const NONE: TeamId = TeamId(255);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_none() {
            write!(f, "team:none")
        } else {
            write!(f, "team:{}", self.0)
        }
    }
}

/// A character that can touch and carry objectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(pub u32);

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "holder:{}", self.0)
    }
}

/// A carried objective instance within one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectiveId(pub u32);

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "objective:{}", self.0)
    }
}

/// Match flow as seen by pickup rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    WaitingToStart,
    InProgress,
    /// Between rounds/halves; the match is still "in progress" but frozen
    Intermission,
    Ended,
}

impl MatchPhase {
    pub fn is_in_progress(self) -> bool {
        matches!(self, MatchPhase::InProgress | MatchPhase::Intermission)
    }

    pub fn is_intermission(self) -> bool {
        matches!(self, MatchPhase::Intermission)
    }
}

/// Snapshot of a character offered to the objective on touch.
///
/// Built by the host from its own character state each time a touch or
/// re-check happens; the core never keeps it past the call.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: HolderId,
    pub team: TeamId,
    pub location: Position,
    pub velocity: Position,
    /// Unit facing direction
    pub facing: Position,
    pub alive: bool,
    /// Ragdoll/knocked down; pickup is re-checked shortly after
    pub incapacitated: bool,
    /// Has a controller (player or bot) attached
    pub controlled: bool,
    /// Character-side veto (e.g. already carrying another objective)
    pub can_carry: bool,
    pub collision_radius: f32,
    pub half_height: f32,
}

impl Candidate {
    /// A standing, controlled character with default capsule size
    pub fn new(id: HolderId, team: TeamId, location: Position) -> Self {
        Self {
            id,
            team,
            location,
            velocity: Position::zeros(),
            facing: Position::x(),
            alive: true,
            incapacitated: false,
            controlled: true,
            can_carry: true,
            collision_radius: 42.0,
            half_height: 92.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_none_default() {
        assert!(TeamId::default().is_none());
        assert!(!TeamId(0).is_none());
        assert_eq!(TeamId(1).to_string(), "team:1");
        assert_eq!(TeamId::NONE.to_string(), "team:none");
    }

    #[test]
    fn test_intermission_counts_as_in_progress() {
        assert!(MatchPhase::Intermission.is_in_progress());
        assert!(MatchPhase::Intermission.is_intermission());
        assert!(!MatchPhase::Ended.is_in_progress());
        assert!(!MatchPhase::WaitingToStart.is_in_progress());
    }
}
