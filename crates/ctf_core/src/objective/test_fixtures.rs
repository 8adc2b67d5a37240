//! Shared in-memory collaborators for objective unit tests

use super::host::{
    CharacterQuery, GameMessage, HomeBase, MatchClock, MessageSink, MovementCollaborator,
    ScoreEvent, ScoringNotifier, TeamRegistry, TimerScheduler, Touch,
};
use super::kind::ObjectiveKind;
use super::machine::CarriedObjective;
use super::state::ObjectState;
use super::timers::{ScheduledTask, TimerKind, TimerQueue};
use crate::config::ObjectiveConfig;
use crate::types::{pos, Candidate, HolderId, MatchPhase, ObjectiveId, Position, TeamId, TimeMs};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct TestBase {
    pub team: TeamId,
    pub location: Position,
    pub states: Vec<ObjectState>,
    pub pickups: Vec<(HolderId, bool)>,
    pub drops: Vec<Option<HolderId>>,
    pub returns: Vec<Option<HolderId>>,
}

impl TestBase {
    pub fn new(team: TeamId) -> Self {
        Self { team, ..Self::default() }
    }
}

impl HomeBase for TestBase {
    fn team_id(&self) -> TeamId {
        self.team
    }

    fn home_location(&self) -> Position {
        self.location
    }

    fn object_state_was_changed(&mut self, state: ObjectState) {
        self.states.push(state);
    }

    fn object_was_picked_up(&mut self, holder: HolderId, was_home: bool) {
        self.pickups.push((holder, was_home));
    }

    fn object_was_dropped(&mut self, last_holder: Option<HolderId>) {
        self.drops.push(last_holder);
    }

    fn object_returned_home(&mut self, last_holder: Option<HolderId>) {
        self.returns.push(last_holder);
    }
}

#[derive(Debug, Default)]
pub struct TestHost {
    pub now: TimeMs,
    pub phase: MatchPhase,
    pub team_count: u8,
    pub scores: Vec<ScoreEvent>,
    pub timers: TimerQueue,
    pub characters: BTreeMap<HolderId, Candidate>,
    /// Characters reported by `overlapping`, in order
    pub touching: Vec<Touch>,
    pub broadcasts: Vec<GameMessage>,
    pub notices: Vec<(HolderId, GameMessage)>,
    /// Placement attempts to refuse before accepting one
    pub blocked_spots: usize,
    pub placements: Vec<Position>,
}

impl TestHost {
    pub fn new() -> Self {
        Self { phase: MatchPhase::InProgress, team_count: 2, ..Self::default() }
    }

    pub fn add_character(&mut self, id: u32, team: u8, at: [f32; 3]) -> Candidate {
        let c = Candidate::new(HolderId(id), TeamId(team), pos(at));
        self.characters.insert(c.id, c.clone());
        c
    }

    pub fn move_character(&mut self, id: u32, at: [f32; 3]) {
        if let Some(c) = self.characters.get_mut(&HolderId(id)) {
            c.location = pos(at);
        }
    }

    pub fn pending(&self, kind: TimerKind) -> usize {
        self.timers.pending_for(ObjectiveId(1), kind)
    }

    /// Advance the clock, handing every due task back to `objective`
    pub fn advance(&mut self, objective: &mut CarriedObjective<TestBase>, ms: u64) {
        let target = self.now.saturating_add(ms);
        while let Some(deadline) = self.timers.next_deadline() {
            if deadline > target {
                break;
            }
            self.now = self.now.max(deadline);
            while let Some(task) = self.timers.pop_due(self.now) {
                objective.on_timer_fired(&task, self);
            }
        }
        self.now = target;
    }
}

impl MatchClock for TestHost {
    fn now(&self) -> TimeMs {
        self.now
    }

    fn match_phase(&self) -> MatchPhase {
        self.phase
    }
}

impl ScoringNotifier for TestHost {
    fn score_object(&mut self, event: &ScoreEvent) {
        self.scores.push(event.clone());
    }
}

impl MovementCollaborator for TestHost {
    fn try_place(&mut self, _objective: ObjectiveId, _from: Position, desired: Position) -> bool {
        if self.blocked_spots > 0 {
            self.blocked_spots -= 1;
            return false;
        }
        self.placements.push(desired);
        true
    }
}

impl TeamRegistry for TestHost {
    fn resolve_team(&self, id: TeamId) -> Option<TeamId> {
        (id.0 < self.team_count).then_some(id)
    }
}

impl TimerScheduler for TestHost {
    fn schedule(&mut self, task: ScheduledTask) {
        self.timers.push(task);
    }
}

impl CharacterQuery for TestHost {
    fn overlapping(
        &self,
        _objective: ObjectiveId,
        _location: Position,
        _radius: f32,
    ) -> Vec<Touch> {
        self.touching.clone()
    }

    fn character(&self, id: HolderId) -> Option<Candidate> {
        self.characters.get(&id).cloned()
    }
}

impl MessageSink for TestHost {
    fn broadcast(&mut self, _objective: ObjectiveId, message: GameMessage) {
        self.broadcasts.push(message);
    }

    fn notify(&mut self, to: HolderId, _objective: ObjectiveId, message: GameMessage) {
        self.notices.push((to, message));
    }
}

/// Initialized objective with id 1, base at the origin owned by `team`
pub fn objective_at_home(
    config: ObjectiveConfig,
    team: TeamId,
    host: &TestHost,
) -> CarriedObjective<TestBase> {
    let mut objective = CarriedObjective::new(ObjectiveId(1), ObjectiveKind::CtfFlag, config, 7);
    objective.init(TestBase::new(team), host);
    objective
}
