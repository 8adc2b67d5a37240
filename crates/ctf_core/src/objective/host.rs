//! Collaborator contracts
//!
//! The state machine decides; these traits carry the decisions out into
//! whatever world hosts it (engine, server, test harness).

use super::assist::AssistEntry;
use super::state::ObjectState;
use super::timers::ScheduledTask;
use crate::types::{Candidate, HolderId, MatchPhase, ObjectiveId, Position, TeamId, TimeMs};
use serde::{Deserialize, Serialize};

/// The fixed structure an objective rests at.
///
/// Bound once at `CarriedObjective::init`; notifications default to no-ops.
pub trait HomeBase {
    fn team_id(&self) -> TeamId;
    /// Resting location (the objective adds its own capsule offset)
    fn home_location(&self) -> Position;

    fn object_state_was_changed(&mut self, _state: ObjectState) {}
    fn object_was_picked_up(&mut self, _holder: HolderId, _was_home: bool) {}
    fn object_was_dropped(&mut self, _last_holder: Option<HolderId>) {}
    fn object_returned_home(&mut self, _last_holder: Option<HolderId>) {}
}

/// Why a score event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    /// A touch returned a dropped objective
    SentHome,
    /// Carried into a scoring base
    Captured,
    /// Returned by the match (timeout, hazard)
    Returned,
}

/// What the scoring side is told; held-time credits include the live hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub objective: ObjectiveId,
    pub objective_team: Option<TeamId>,
    pub scorer: Option<HolderId>,
    pub reason: ScoreReason,
    pub assists: Vec<AssistEntry>,
}

pub trait ScoringNotifier {
    fn score_object(&mut self, event: &ScoreEvent);
}

pub trait MovementCollaborator {
    /// Place the objective at `desired` if the spot is free and not walled
    /// off from `from`. Returns false when nothing was moved.
    fn try_place(&mut self, objective: ObjectiveId, from: Position, desired: Position) -> bool;
}

pub trait TeamRegistry {
    /// `None` when `id` does not name a team in this match
    fn resolve_team(&self, id: TeamId) -> Option<TeamId>;
}

pub trait MatchClock {
    fn now(&self) -> TimeMs;
    fn match_phase(&self) -> MatchPhase;
}

pub trait TimerScheduler {
    fn schedule(&mut self, task: ScheduledTask);
}

/// A character currently overlapping the objective
#[derive(Debug, Clone, PartialEq)]
pub struct Touch {
    pub candidate: Candidate,
    /// No world geometry between the character and the objective
    pub line_of_sight_clear: bool,
}

pub trait CharacterQuery {
    /// Characters within `radius` of `location`
    fn overlapping(&self, objective: ObjectiveId, location: Position, radius: f32) -> Vec<Touch>;
    /// Current state of a character, `None` once it left the match
    fn character(&self, id: HolderId) -> Option<Candidate>;
}

/// Player-facing announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage {
    Taken { holder: HolderId },
    Dropped { holder: Option<HolderId> },
    SentHome { by: HolderId },
    /// Returned by the match (timeout, hazard)
    Returned,
    PickupDenied,
}

pub trait MessageSink {
    fn broadcast(&mut self, objective: ObjectiveId, message: GameMessage);
    fn notify(&mut self, to: HolderId, objective: ObjectiveId, message: GameMessage);
}

/// Everything a `CarriedObjective` needs from its host
pub trait ObjectiveHost:
    MatchClock
    + ScoringNotifier
    + MovementCollaborator
    + TeamRegistry
    + TimerScheduler
    + CharacterQuery
    + MessageSink
{
}

impl<T> ObjectiveHost for T where
    T: MatchClock
        + ScoringNotifier
        + MovementCollaborator
        + TeamRegistry
        + TimerScheduler
        + CharacterQuery
        + MessageSink
{
}
