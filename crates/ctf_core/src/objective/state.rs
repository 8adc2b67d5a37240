//! Possession state
//!
//! `Possession` carries the holder inside the `Held` variant so that
//! "has a holder" and "is held" can never disagree.

use crate::types::{HolderId, TeamId, TimeMs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replicated possession state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectState {
    /// Resting at its home base
    #[default]
    Home,
    /// Attached to a character
    Held,
    /// Lying in the world (or stepping home along its trail)
    Dropped,
}

impl ObjectState {
    pub fn is_away(self) -> bool {
        !matches!(self, ObjectState::Home)
    }
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectState::Home => "home",
            ObjectState::Held => "held",
            ObjectState::Dropped => "dropped",
        };
        f.write_str(name)
    }
}

/// Link between the objective and its current carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub holder: HolderId,
    pub holder_team: TeamId,
    pub picked_up_at: TimeMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Possession {
    #[default]
    Home,
    Held(HolderRecord),
    Dropped,
}

impl Possession {
    pub fn state(&self) -> ObjectState {
        match self {
            Possession::Home => ObjectState::Home,
            Possession::Held(_) => ObjectState::Held,
            Possession::Dropped => ObjectState::Dropped,
        }
    }

    pub fn holder(&self) -> Option<&HolderRecord> {
        match self {
            Possession::Held(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_only_when_held() {
        let record = HolderRecord { holder: HolderId(7), holder_team: TeamId(1), picked_up_at: 10 };
        assert_eq!(Possession::Held(record).holder(), Some(&record));
        assert_eq!(Possession::Held(record).state(), ObjectState::Held);
        assert!(Possession::Home.holder().is_none());
        assert!(Possession::Dropped.holder().is_none());
    }

    #[test]
    fn test_is_away() {
        assert!(!ObjectState::Home.is_away());
        assert!(ObjectState::Held.is_away());
        assert!(ObjectState::Dropped.is_away());
    }
}
