//! In-memory match world
//!
//! A deterministic host for any number of carried objectives: characters,
//! spherical blockers, capture zones, a millisecond clock and a timer queue.
//! Scenario files and integration tests drive it; a real engine supplies its
//! own `ObjectiveHost` instead.

use crate::config::ObjectiveConfig;
use crate::error::{CtfError, Result};
use crate::objective::{
    CarriedObjective, CharacterQuery, EventLog, GameMessage, HomeBase, MatchClock, MessageSink,
    MovementCollaborator, ObjectState, Objective, ObjectiveKind, ObjectiveSnapshot, ScheduledTask,
    ScoreEvent, ScoreReason, ScoringNotifier, TeamRegistry, TimerQueue, TimerScheduler, Touch,
};
use crate::types::{Candidate, HolderId, MatchPhase, ObjectiveId, Position, TeamId, TimeMs};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

pub const DEFAULT_CAPTURE_RADIUS: f32 = 150.0;

/// Solid sphere: blocks placement inside it and sight lines through it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blocker {
    pub center: Position,
    pub radius: f32,
}

impl Blocker {
    pub fn contains(&self, point: &Position) -> bool {
        (point - self.center).norm() < self.radius
    }

    /// Segment `a`-`b` passes through the sphere
    pub fn blocks(&self, a: &Position, b: &Position) -> bool {
        let ab = b - a;
        let len_sq = ab.norm_squared();
        let t = if len_sq <= f32::EPSILON {
            0.0
        } else {
            ((self.center - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
        };
        let closest = a + ab * t;
        (closest - self.center).norm() < self.radius
    }
}

/// Where carriers of `team` score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureZone {
    pub team: TeamId,
    pub center: Position,
    pub radius: f32,
}

/// Per-base counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub taken: u32,
    pub taken_from_home: u32,
    pub dropped: u32,
    pub returned: u32,
}

#[derive(Debug, Clone)]
pub struct MatchBase {
    team: TeamId,
    location: Position,
    state: ObjectState,
    stats: BaseStats,
}

impl MatchBase {
    pub fn new(team: TeamId, location: Position) -> Self {
        Self { team, location, state: ObjectState::Home, stats: BaseStats::default() }
    }

    /// Last state the objective reported
    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn stats(&self) -> BaseStats {
        self.stats
    }
}

impl HomeBase for MatchBase {
    fn team_id(&self) -> TeamId {
        self.team
    }

    fn home_location(&self) -> Position {
        self.location
    }

    fn object_state_was_changed(&mut self, state: ObjectState) {
        self.state = state;
    }

    fn object_was_picked_up(&mut self, _holder: HolderId, was_home: bool) {
        self.stats.taken += 1;
        if was_home {
            self.stats.taken_from_home += 1;
        }
    }

    fn object_was_dropped(&mut self, _last_holder: Option<HolderId>) {
        self.stats.dropped += 1;
    }

    fn object_returned_home(&mut self, _last_holder: Option<HolderId>) {
        self.stats.returned += 1;
    }
}

/// Host side of the world: everything objectives call back into
#[derive(Debug, Default)]
pub struct MatchHost {
    now: TimeMs,
    phase: MatchPhase,
    team_count: u8,
    characters: BTreeMap<HolderId, Candidate>,
    /// Who carries what, refreshed after every objective call
    carriers: BTreeMap<HolderId, ObjectiveId>,
    blockers: Vec<Blocker>,
    timers: TimerQueue,
    scores: Vec<ScoreEvent>,
    team_scores: BTreeMap<TeamId, u32>,
    messages: Vec<(ObjectiveId, GameMessage)>,
    notices: Vec<(HolderId, ObjectiveId, GameMessage)>,
}

impl MatchHost {
    pub fn line_of_sight(&self, from: &Position, to: &Position) -> bool {
        !self.blockers.iter().any(|b| b.blocks(from, to))
    }

    /// One objective per character
    fn may_carry(&self, holder: HolderId, objective: ObjectiveId) -> bool {
        self.carriers.get(&holder).map_or(true, |carried| *carried == objective)
    }

    fn candidate(&self, id: HolderId, objective: ObjectiveId) -> Option<Candidate> {
        let mut candidate = self.characters.get(&id)?.clone();
        candidate.can_carry = self.may_carry(id, objective);
        Some(candidate)
    }
}

impl MatchClock for MatchHost {
    fn now(&self) -> TimeMs {
        self.now
    }

    fn match_phase(&self) -> MatchPhase {
        self.phase
    }
}

impl ScoringNotifier for MatchHost {
    fn score_object(&mut self, event: &ScoreEvent) {
        if event.reason == ScoreReason::Captured {
            let team = event.scorer.and_then(|id| self.characters.get(&id)).map(|c| c.team);
            if let Some(team) = team {
                *self.team_scores.entry(team).or_insert(0) += 1;
                info!(objective = %event.objective, %team, "capture");
            }
        }
        self.scores.push(event.clone());
    }
}

impl MovementCollaborator for MatchHost {
    fn try_place(&mut self, _objective: ObjectiveId, from: Position, desired: Position) -> bool {
        self.blockers.iter().all(|b| !b.contains(&desired) && !b.blocks(&from, &desired))
    }
}

impl TeamRegistry for MatchHost {
    fn resolve_team(&self, id: TeamId) -> Option<TeamId> {
        (id.0 < self.team_count).then_some(id)
    }
}

impl TimerScheduler for MatchHost {
    fn schedule(&mut self, task: ScheduledTask) {
        self.timers.push(task);
    }
}

impl CharacterQuery for MatchHost {
    fn overlapping(&self, objective: ObjectiveId, location: Position, radius: f32) -> Vec<Touch> {
        self.characters
            .values()
            .filter(|c| c.alive && (c.location - location).norm() <= radius + c.collision_radius)
            .filter_map(|c| {
                let candidate = self.candidate(c.id, objective)?;
                let line_of_sight_clear = self.line_of_sight(&c.location, &location);
                Some(Touch { candidate, line_of_sight_clear })
            })
            .collect()
    }

    fn character(&self, id: HolderId) -> Option<Candidate> {
        self.characters.get(&id).cloned()
    }
}

impl MessageSink for MatchHost {
    fn broadcast(&mut self, objective: ObjectiveId, message: GameMessage) {
        debug!(%objective, ?message, "broadcast");
        self.messages.push((objective, message));
    }

    fn notify(&mut self, to: HolderId, objective: ObjectiveId, message: GameMessage) {
        self.notices.push((to, objective, message));
    }
}

/// Objectives plus their host, advanced together
#[derive(Debug)]
pub struct MatchWorld {
    host: MatchHost,
    objectives: BTreeMap<ObjectiveId, CarriedObjective<MatchBase>>,
    /// Character/objective pairs already touching; only new overlaps fire touches
    overlaps: BTreeSet<(ObjectiveId, HolderId)>,
    /// Objective locations the overlap pairs were last built against
    overlap_sites: BTreeMap<ObjectiveId, Position>,
    capture_zones: Vec<CaptureZone>,
    events: EventLog,
    seed: u64,
}

impl MatchWorld {
    /// A running match with teams `0..team_count`
    pub fn new(seed: u64, team_count: u8) -> Self {
        let host = MatchHost { phase: MatchPhase::InProgress, team_count, ..MatchHost::default() };
        Self {
            host,
            objectives: BTreeMap::new(),
            overlaps: BTreeSet::new(),
            overlap_sites: BTreeMap::new(),
            capture_zones: Vec::new(),
            events: EventLog::new(),
            seed,
        }
    }

    // ========== Queries ==========

    pub fn now(&self) -> TimeMs {
        self.host.now
    }

    pub fn phase(&self) -> MatchPhase {
        self.host.phase
    }

    pub fn host(&self) -> &MatchHost {
        &self.host
    }

    pub fn objective(&self, id: ObjectiveId) -> Option<&CarriedObjective<MatchBase>> {
        self.objectives.get(&id)
    }

    pub fn objectives(&self) -> impl Iterator<Item = &CarriedObjective<MatchBase>> {
        self.objectives.values()
    }

    pub fn character(&self, id: HolderId) -> Option<&Candidate> {
        self.host.characters.get(&id)
    }

    pub fn carried_by(&self, holder: HolderId) -> Option<ObjectiveId> {
        self.host.carriers.get(&holder).copied()
    }

    pub fn team_score(&self, team: TeamId) -> u32 {
        self.host.team_scores.get(&team).copied().unwrap_or(0)
    }

    pub fn team_scores(&self) -> &BTreeMap<TeamId, u32> {
        &self.host.team_scores
    }

    pub fn scores(&self) -> &[ScoreEvent] {
        &self.host.scores
    }

    pub fn messages(&self) -> &[(ObjectiveId, GameMessage)] {
        &self.host.messages
    }

    pub fn notices(&self) -> &[(HolderId, ObjectiveId, GameMessage)] {
        &self.host.notices
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn snapshots(&self) -> Vec<ObjectiveSnapshot> {
        self.objectives.values().map(|o| o.snapshot(self.host.now)).collect()
    }

    // ========== Setup ==========

    pub fn set_phase(&mut self, phase: MatchPhase) {
        info!(from = ?self.host.phase, to = ?phase, "match phase");
        self.host.phase = phase;
    }

    pub fn add_blocker(&mut self, blocker: Blocker) {
        self.host.blockers.push(blocker);
    }

    pub fn add_capture_zone(&mut self, zone: CaptureZone) {
        self.capture_zones.push(zone);
    }

    pub fn spawn_objective(
        &mut self,
        id: ObjectiveId,
        kind: ObjectiveKind,
        config: ObjectiveConfig,
        base: MatchBase,
    ) -> Result<()> {
        config.validate()?;
        if self.objectives.contains_key(&id) {
            return Err(CtfError::InvalidScenario(format!("duplicate objective {}", id.0)));
        }
        let seed = self.seed.wrapping_add(u64::from(id.0));
        let mut objective = CarriedObjective::new(id, kind, config, seed);
        objective.subscribe(self.events.clone());
        objective.init(base, &self.host);
        self.overlap_sites.insert(id, objective.location());
        self.objectives.insert(id, objective);
        Ok(())
    }

    pub fn spawn_character(
        &mut self,
        id: HolderId,
        team: TeamId,
        location: Position,
    ) -> Result<()> {
        if self.host.characters.contains_key(&id) {
            return Err(CtfError::InvalidScenario(format!("duplicate character {}", id.0)));
        }
        self.host.characters.insert(id, Candidate::new(id, team, location));
        self.process_touches(id);
        Ok(())
    }

    // ========== Character actions ==========

    /// Move a character; carried objectives follow and new overlaps fire touches
    pub fn move_character(&mut self, id: HolderId, to: Position) -> Result<()> {
        let character = self.character_mut(id)?;
        character.velocity = to - character.location;
        if character.velocity.norm() > f32::EPSILON {
            character.facing = character.velocity.normalize();
        }
        character.location = to;

        if let Some(carried) = self.host.carriers.get(&id).copied() {
            if let Some(objective) = self.objectives.get_mut(&carried) {
                objective.track_holder_position(&mut self.host);
            }
            self.check_capture(id, carried);
        }
        self.process_touches(id);
        Ok(())
    }

    pub fn set_incapacitated(&mut self, id: HolderId, incapacitated: bool) -> Result<()> {
        self.character_mut(id)?.incapacitated = incapacitated;
        if !incapacitated {
            self.process_touches(id);
        }
        Ok(())
    }

    /// The character dies; anything carried is dropped with `killer` as instigator
    pub fn kill_character(&mut self, id: HolderId, killer: Option<HolderId>) -> Result<()> {
        let character = self.character_mut(id)?;
        character.alive = false;
        character.velocity = Position::zeros();

        if let Some(carried) = self.host.carriers.get(&id).copied() {
            if let Some(objective) = self.objectives.get_mut(&carried) {
                objective.drop(killer, &mut self.host);
            }
            self.sync_carriers();
        }
        self.overlaps.retain(|(_, holder)| *holder != id);
        info!(character = %id, killer = ?killer, "character killed");
        Ok(())
    }

    pub fn respawn_character(&mut self, id: HolderId, at: Position) -> Result<()> {
        let character = self.character_mut(id)?;
        character.alive = true;
        character.incapacitated = false;
        character.location = at;
        character.velocity = Position::zeros();
        self.process_touches(id);
        Ok(())
    }

    /// Voluntary drop. Returns false when the character carries nothing.
    pub fn drop_carried(&mut self, id: HolderId) -> Result<bool> {
        self.character_mut(id)?;
        let Some(carried) = self.host.carriers.get(&id).copied() else {
            return Ok(false);
        };
        let dropped = match self.objectives.get_mut(&carried) {
            Some(objective) => objective.drop(Some(id), &mut self.host),
            None => false,
        };
        self.sync_carriers();
        Ok(dropped)
    }

    // ========== Objective hazards ==========

    pub fn objective_fell_out(&mut self, id: ObjectiveId) -> Result<()> {
        self.objective_mut(id)?;
        if let Some(objective) = self.objectives.get_mut(&id) {
            objective.fell_out_of_world(&mut self.host);
        }
        self.sync_carriers();
        Ok(())
    }

    pub fn objective_hit_hazard(&mut self, id: ObjectiveId) -> Result<()> {
        self.objective_mut(id)?;
        if let Some(objective) = self.objectives.get_mut(&id) {
            objective.entered_pain_volume(&mut self.host);
        }
        self.sync_carriers();
        Ok(())
    }

    // ========== Time ==========

    /// Advance the clock by `ms`, firing due tasks in deadline order
    pub fn advance(&mut self, ms: u64) {
        let target = self.host.now.saturating_add(ms);
        while let Some(deadline) = self.host.timers.next_deadline() {
            if deadline > target {
                break;
            }
            self.host.now = self.host.now.max(deadline);
            while let Some(task) = self.host.timers.pop_due(self.host.now) {
                if let Some(objective) = self.objectives.get_mut(&task.objective) {
                    objective.on_timer_fired(&task, &mut self.host);
                }
                self.sync_carriers();
            }
        }
        self.host.now = target;
    }

    // ========== Internals ==========

    fn character_mut(&mut self, id: HolderId) -> Result<&mut Candidate> {
        self.host
            .characters
            .get_mut(&id)
            .ok_or(CtfError::UnknownScenarioRef { kind: "character", id: id.0 })
    }

    fn objective_mut(&mut self, id: ObjectiveId) -> Result<&mut CarriedObjective<MatchBase>> {
        self.objectives
            .get_mut(&id)
            .ok_or(CtfError::UnknownScenarioRef { kind: "objective", id: id.0 })
    }

    /// Refresh carriers and the overlap pairs of every objective that moved
    fn sync_carriers(&mut self) {
        self.host.carriers =
            self.objectives.values().filter_map(|o| o.holder().map(|h| (h, o.id()))).collect();

        let moved: Vec<(ObjectiveId, Position, f32)> = self
            .objectives
            .values()
            .filter(|o| self.overlap_sites.get(&o.id()) != Some(&o.location()))
            .map(|o| (o.id(), o.location(), o.config().toss.object_radius))
            .collect();
        for (objective_id, location, radius) in moved {
            self.overlaps.retain(|(o, _)| *o != objective_id);
            for c in self.host.characters.values() {
                if c.alive && (c.location - location).norm() <= radius + c.collision_radius {
                    self.overlaps.insert((objective_id, c.id));
                }
            }
            self.overlap_sites.insert(objective_id, location);
        }
    }

    /// Fire `on_touch` for every objective `id` just started overlapping
    fn process_touches(&mut self, id: HolderId) {
        let ids: Vec<ObjectiveId> = self.objectives.keys().copied().collect();
        for objective_id in ids {
            let Some(character) = self.host.characters.get(&id) else {
                return;
            };
            let Some(objective) = self.objectives.get_mut(&objective_id) else {
                continue;
            };
            let reach = objective.config().toss.object_radius + character.collision_radius;
            let inside =
                character.alive && (character.location - objective.location()).norm() <= reach;
            if !inside {
                self.overlaps.remove(&(objective_id, id));
                continue;
            }
            if !self.overlaps.insert((objective_id, id)) || objective.holder() == Some(id) {
                continue;
            }

            let line_of_sight_clear =
                self.host.line_of_sight(&character.location, &objective.location());
            let Some(candidate) = self.host.candidate(id, objective_id) else {
                continue;
            };
            objective.on_touch(&Touch { candidate, line_of_sight_clear }, &mut self.host);
            self.sync_carriers();
        }
    }

    /// Carrier inside an own-team zone scores, provided every objective of
    /// that team is at home
    fn check_capture(&mut self, holder: HolderId, carried: ObjectiveId) {
        let Some(character) = self.host.characters.get(&holder) else {
            return;
        };
        let team = character.team;
        let in_zone = self
            .capture_zones
            .iter()
            .any(|z| z.team == team && (character.location - z.center).norm() <= z.radius);
        if !in_zone {
            return;
        }
        let own_away =
            self.objectives.values().any(|o| o.team() == Some(team) && o.state().is_away());
        if own_away {
            debug!(%holder, %team, "own objective away, capture refused");
            return;
        }
        if let Some(objective) = self.objectives.get_mut(&carried) {
            objective.score(ScoreReason::Captured, Some(holder), &mut self.host);
        }
        self.sync_carriers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{ObjectiveEvent, TimerKind};
    use crate::types::pos;

    const FLAG: ObjectiveId = ObjectiveId(1);

    /// Red flag at the origin, red zone around it, blue zone at x=10000
    fn ctf_world() -> MatchWorld {
        let mut world = MatchWorld::new(11, 2);
        world
            .spawn_objective(
                FLAG,
                ObjectiveKind::CtfFlag,
                ObjectiveConfig::ctf_flag(),
                MatchBase::new(TeamId(0), pos([0.0, 0.0, 0.0])),
            )
            .unwrap();
        world.add_capture_zone(CaptureZone {
            team: TeamId(1),
            center: pos([10000.0, 0.0, 92.0]),
            radius: 200.0,
        });
        world
    }

    #[test]
    fn test_blocker_geometry() {
        let wall = Blocker { center: pos([500.0, 0.0, 0.0]), radius: 100.0 };
        assert!(wall.contains(&pos([450.0, 0.0, 0.0])));
        assert!(wall.blocks(&pos([0.0, 0.0, 0.0]), &pos([1000.0, 0.0, 0.0])));
        assert!(!wall.blocks(&pos([0.0, 300.0, 0.0]), &pos([1000.0, 300.0, 0.0])));
        assert!(!wall.blocks(&pos([0.0, 0.0, 0.0]), &pos([300.0, 0.0, 0.0])));
    }

    #[test]
    fn test_walking_onto_flag_picks_it_up() {
        let mut world = ctf_world();
        world.spawn_character(HolderId(2), TeamId(1), pos([1000.0, 0.0, 92.0])).unwrap();
        world.move_character(HolderId(2), pos([50.0, 0.0, 92.0])).unwrap();

        let flag = world.objective(FLAG).unwrap();
        assert_eq!(flag.holder(), Some(HolderId(2)));
        assert_eq!(world.carried_by(HolderId(2)), Some(FLAG));
        assert_eq!(flag.home_base().map(|b| b.stats().taken_from_home), Some(1));
    }

    #[test]
    fn test_carry_into_zone_captures() {
        let mut world = ctf_world();
        world.spawn_character(HolderId(2), TeamId(1), pos([50.0, 0.0, 92.0])).unwrap();
        world.advance(1000);
        world.move_character(HolderId(2), pos([10000.0, 0.0, 92.0])).unwrap();

        assert_eq!(world.team_score(TeamId(1)), 1);
        assert_eq!(world.objective(FLAG).map(|f| f.state()), Some(ObjectState::Home));
        assert_eq!(world.carried_by(HolderId(2)), None);
        assert_eq!(world.scores()[0].assists[0].total_held_ms, 1000);
    }

    #[test]
    fn test_capture_skips_the_return_trail() {
        let mut world = MatchWorld::new(11, 2);
        world
            .spawn_objective(
                FLAG,
                ObjectiveKind::CtfFlag,
                ObjectiveConfig::gradual_return(),
                MatchBase::new(TeamId(0), pos([0.0, 0.0, 0.0])),
            )
            .unwrap();
        world.add_capture_zone(CaptureZone {
            team: TeamId(1),
            center: pos([10000.0, 0.0, 92.0]),
            radius: 200.0,
        });
        world.spawn_character(HolderId(2), TeamId(1), pos([50.0, 0.0, 92.0])).unwrap();
        for x in [2000.0, 4000.0, 6000.0, 8000.0, 10000.0] {
            world.move_character(HolderId(2), pos([x, 0.0, 92.0])).unwrap();
        }

        let flag = world.objective(FLAG).unwrap();
        assert_eq!(world.team_score(TeamId(1)), 1);
        assert_eq!(flag.state(), ObjectState::Home);
        assert!(flag.trail().is_empty());
        assert_eq!(flag.ghost(), None);

        world.move_character(HolderId(2), pos([8000.0, 0.0, 92.0])).unwrap();
        world.move_character(HolderId(2), pos([10000.0, 0.0, 92.0])).unwrap();
        assert_eq!(world.team_score(TeamId(1)), 1);
    }

    #[test]
    fn test_kill_drops_with_killer_as_instigator() {
        let mut world = ctf_world();
        world.spawn_character(HolderId(2), TeamId(1), pos([50.0, 0.0, 92.0])).unwrap();
        world.spawn_character(HolderId(3), TeamId(0), pos([3000.0, 0.0, 92.0])).unwrap();
        world.move_character(HolderId(2), pos([2000.0, 0.0, 92.0])).unwrap();
        world.kill_character(HolderId(2), Some(HolderId(3))).unwrap();

        let flag = world.objective(FLAG).unwrap();
        assert_eq!(flag.state(), ObjectState::Dropped);
        assert!(world.events().events().iter().any(|(_, e)| matches!(
            e,
            ObjectiveEvent::Dropped { instigator: Some(HolderId(3)), .. }
        )));
    }

    #[test]
    fn test_defender_returns_dropped_flag() {
        let mut world = ctf_world();
        world.spawn_character(HolderId(2), TeamId(1), pos([50.0, 0.0, 92.0])).unwrap();
        world.spawn_character(HolderId(3), TeamId(0), pos([4000.0, 0.0, 92.0])).unwrap();
        world.move_character(HolderId(2), pos([2000.0, 0.0, 92.0])).unwrap();
        world.kill_character(HolderId(2), None).unwrap();

        let at = world.objective(FLAG).map(|f| f.location()).unwrap();
        world.move_character(HolderId(3), at).unwrap();
        assert_eq!(world.objective(FLAG).map(|f| f.state()), Some(ObjectState::Home));
        assert_eq!(world.scores().last().map(|s| s.reason), Some(ScoreReason::SentHome));
    }

    #[test]
    fn test_one_objective_per_carrier() {
        let mut world = ctf_world();
        world
            .spawn_objective(
                ObjectiveId(2),
                ObjectiveKind::NeutralFlag,
                ObjectiveConfig::neutral_flag(),
                MatchBase::new(TeamId::NONE, pos([0.0, 100.0, 0.0])),
            )
            .unwrap();
        world.spawn_character(HolderId(2), TeamId(1), pos([0.0, 50.0, 92.0])).unwrap();

        assert_eq!(world.carried_by(HolderId(2)), Some(FLAG));
        assert_eq!(world.objective(ObjectiveId(2)).map(|o| o.state()), Some(ObjectState::Home));
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let mut world = ctf_world();
        let err = world.move_character(HolderId(42), pos([0.0, 0.0, 0.0])).unwrap_err();
        assert!(matches!(err, CtfError::UnknownScenarioRef { kind: "character", id: 42 }));
    }

    #[test]
    fn test_duplicate_objective_is_rejected() {
        let mut world = ctf_world();
        let err = world
            .spawn_objective(
                FLAG,
                ObjectiveKind::CtfFlag,
                ObjectiveConfig::ctf_flag(),
                MatchBase::new(TeamId(1), pos([0.0, 0.0, 0.0])),
            )
            .unwrap_err();
        assert!(matches!(err, CtfError::InvalidScenario(_)));
    }

    #[test]
    fn test_overlaps_follow_a_returning_flag() {
        let mut world = ctf_world();
        world.spawn_character(HolderId(2), TeamId(1), pos([50.0, 0.0, 92.0])).unwrap();
        world.move_character(HolderId(2), pos([2000.0, 0.0, 92.0])).unwrap();
        world.kill_character(HolderId(2), None).unwrap();
        let at = world.objective(FLAG).map(|f| f.location()).unwrap();

        // standing on the dropped flag while touches are frozen
        world.set_phase(MatchPhase::Intermission);
        world.spawn_character(HolderId(4), TeamId(1), at).unwrap();
        world.advance(30_000);
        assert_eq!(world.objective(FLAG).map(|f| f.state()), Some(ObjectState::Home));

        world.set_phase(MatchPhase::InProgress);
        world.move_character(HolderId(4), pos([50.0, 0.0, 92.0])).unwrap();
        assert_eq!(world.carried_by(HolderId(4)), Some(FLAG));
    }

    #[test]
    fn test_advance_saturates_the_clock() {
        let mut world = ctf_world();
        world.advance(1000);
        world.advance(u64::MAX);
        assert_eq!(world.now(), u64::MAX);
    }

    #[test]
    fn test_wall_between_defers_touch() {
        let mut world = ctf_world();
        world.add_blocker(Blocker { center: pos([60.0, 0.0, 60.0]), radius: 20.0 });
        world.spawn_character(HolderId(2), TeamId(1), pos([90.0, 0.0, 60.0])).unwrap();

        assert_eq!(world.objective(FLAG).map(|f| f.state()), Some(ObjectState::Home));
        assert_eq!(world.host().timers.pending_for(FLAG, TimerKind::TouchRecheck), 1);
    }
}
