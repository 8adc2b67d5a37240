//! Objective kinds and the read-only capability interface

use super::state::ObjectState;
use crate::types::{HolderId, ObjectiveId, Position, TeamId};
use serde::{Deserialize, Serialize};

/// Closed set of carried objective kinds.
///
/// Kinds differ only in their default rule set (see `ObjectiveConfig::for_kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Team flag: enemies steal it, owners return it
    #[default]
    CtfFlag,
    /// Teamless flag anyone can grab
    NeutralFlag,
    /// Owned item escorted by its own team
    TeamRelic,
}

impl ObjectiveKind {
    pub fn is_team_owned(self) -> bool {
        !matches!(self, ObjectiveKind::NeutralFlag)
    }
}

/// What any participant (authority or observer) can ask of an objective
pub trait Objective {
    fn id(&self) -> ObjectiveId;
    fn kind(&self) -> ObjectiveKind;
    fn state(&self) -> ObjectState;
    fn team(&self) -> Option<TeamId>;
    fn holder(&self) -> Option<HolderId>;
    fn location(&self) -> Position;

    fn is_home(&self) -> bool {
        self.state() == ObjectState::Home
    }

    /// Team number with 255 standing in for "no team"
    fn team_num(&self) -> TeamId {
        self.team().unwrap_or(TeamId::NONE)
    }
}
