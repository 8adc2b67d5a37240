//! Carried Objective State Machine
//!
//! Home → Held → Dropped → (Held | Home), plus the gradual "step home"
//! loop while Dropped.
//!
//! All mutating entry points are no-ops on observers and on invalid
//! transitions; nothing here returns an error. Timer callbacks re-check
//! the state epoch and silently ignore anything stale.

use super::assist::{AssistEntry, AssistLedger};
use super::eligibility::{DenyReason, PickupContext, PickupEligibilityPolicy, PickupVerdict};
use super::events::{EventChannel, ObjectiveEvent, ObjectiveObserver};
use super::host::{
    GameMessage, HomeBase, ObjectiveHost, ScoreEvent, ScoreReason, TeamRegistry, Touch,
};
use super::kind::{Objective, ObjectiveKind};
use super::return_trail::ReturnTrailTracker;
use super::state::{HolderRecord, ObjectState, Possession};
use super::sync::{ObjectiveSnapshot, Role};
use super::timers::{ScheduledTask, TimerKind};
use super::toss::{plan_toss, resolve_toss};
use crate::config::{ObjectiveConfig, PickupRules};
use crate::error::{CtfError, Result};
use crate::types::{Candidate, HolderId, ObjectiveId, Position, TeamId, TimeMs};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

#[derive(Debug)]
pub struct CarriedObjective<B: HomeBase> {
    id: ObjectiveId,
    kind: ObjectiveKind,
    role: Role,
    config: ObjectiveConfig,
    base: Option<B>,
    team: Option<TeamId>,
    possession: Possession,
    /// Bumped on every transition; stamps scheduled tasks
    epoch: u64,

    location: Position,
    velocity: Position,
    movement_enabled: bool,
    /// Observer fallback when the objective leaves the world
    last_synced_location: Position,

    last_holder: Option<HolderId>,
    last_teleported_at: Option<TimeMs>,
    last_teleported_from: Position,
    last_message_at: Option<TimeMs>,
    pinged_until: Option<TimeMs>,
    auto_return_at: Option<TimeMs>,
    ghost: Option<Position>,

    trail: ReturnTrailTracker,
    assists: AssistLedger,
    events: EventChannel,
    rng: ChaCha8Rng,
}

impl<B: HomeBase> CarriedObjective<B> {
    /// Authoritative instance; `seed` drives drop scatter
    pub fn new(id: ObjectiveId, kind: ObjectiveKind, config: ObjectiveConfig, seed: u64) -> Self {
        let trail = ReturnTrailTracker::new(
            config.returns.min_gradual_return_dist,
            config.returns.trail_capacity,
        );
        Self {
            id,
            kind,
            role: Role::Authority,
            config,
            base: None,
            team: None,
            possession: Possession::Home,
            epoch: 0,
            location: Position::zeros(),
            velocity: Position::zeros(),
            movement_enabled: true,
            last_synced_location: Position::zeros(),
            last_holder: None,
            last_teleported_at: None,
            last_teleported_from: Position::zeros(),
            last_message_at: None,
            pinged_until: None,
            auto_return_at: None,
            ghost: None,
            trail,
            assists: AssistLedger::new(),
            events: EventChannel::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replica that only follows snapshots
    pub fn observer(id: ObjectiveId, kind: ObjectiveKind, config: ObjectiveConfig) -> Self {
        let mut objective = Self::new(id, kind, config, 0);
        objective.role = Role::Observer;
        objective
    }

    pub fn subscribe(&mut self, observer: impl ObjectiveObserver + 'static) {
        self.events.subscribe(observer);
    }

    // ========== Accessors ==========

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &ObjectiveConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.base.is_some()
    }

    pub fn home_base(&self) -> Option<&B> {
        self.base.as_ref()
    }

    pub fn holder_record(&self) -> Option<&HolderRecord> {
        self.possession.holder()
    }

    pub fn last_holder(&self) -> Option<HolderId> {
        self.last_holder
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn velocity(&self) -> Position {
        self.velocity
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn ghost(&self) -> Option<Position> {
        self.ghost
    }

    pub fn trail(&self) -> &ReturnTrailTracker {
        &self.trail
    }

    pub fn assists(&self) -> &AssistLedger {
        &self.assists
    }

    pub fn auto_return_at(&self) -> Option<TimeMs> {
        self.auto_return_at
    }

    pub fn last_message_at(&self) -> Option<TimeMs> {
        self.last_message_at
    }

    pub fn last_teleported_at(&self) -> Option<TimeMs> {
        self.last_teleported_at
    }

    pub fn is_pinged(&self, now: TimeMs) -> bool {
        self.pinged_until.map_or(false, |until| now < until)
    }

    /// Where the objective "sees" from; lags at the pre-teleport spot for a while
    pub fn view_point(&self, now: TimeMs) -> Position {
        match self.last_teleported_at {
            Some(at) if now < at.saturating_add(self.config.timing.teleport_memory_ms) => {
                self.last_teleported_from
            }
            _ => self.location,
        }
    }

    /// Resting pose: base location lifted by the capsule half height
    pub fn home_location(&self) -> Position {
        match self.base.as_ref() {
            Some(base) => {
                base.home_location() + Position::new(0.0, 0.0, self.config.toss.object_half_height)
            }
            None => {
                warn!(objective = %self.id, "querying home location with no home base");
                self.location
            }
        }
    }

    /// Live hold (if `holder` carries it now) plus ledger time
    pub fn held_time(&self, holder: HolderId, now: TimeMs) -> u64 {
        let live = match self.possession.holder() {
            Some(record) if record.holder == holder => now.saturating_sub(record.picked_up_at),
            _ => 0,
        };
        live.saturating_add(self.assists.held_time(holder))
    }

    /// Ledger entries with the live hold folded in
    pub fn credited_assists(&self, now: TimeMs) -> Vec<AssistEntry> {
        let mut entries = self.assists.entries().to_vec();
        if let Some(record) = self.possession.holder() {
            let live = now.saturating_sub(record.picked_up_at);
            match entries.iter_mut().find(|e| e.holder == record.holder) {
                Some(entry) => entry.total_held_ms += live,
                None => entries.push(AssistEntry { holder: record.holder, total_held_ms: live }),
            }
        }
        entries
    }

    // ========== Setup ==========

    /// Bind the home base (once), resolve the team, and rest at home.
    ///
    /// An unknown team id leaves the objective teamless.
    pub fn init(&mut self, base: B, teams: &impl TeamRegistry) {
        if self.base.is_some() {
            warn!(objective = %self.id, "home base already bound, ignoring init");
            return;
        }

        let desired = base.team_id();
        if !desired.is_none() {
            self.team = teams.resolve_team(desired);
            if self.team.is_none() {
                debug!(objective = %self.id, team = %desired, "home base team not registered");
            }
        }

        self.base = Some(base);
        self.possession = Possession::Home;
        self.epoch += 1;
        if self.role.is_authority() {
            if let Some(base) = self.base.as_mut() {
                base.object_state_was_changed(ObjectState::Home);
            }
        }
        self.move_to_home();
        self.emit(ObjectiveEvent::HolderChanged { holder: None });
        info!(objective = %self.id, kind = ?self.kind, team = ?self.team, "objective initialized");
    }

    pub fn set_team(&mut self, team: Option<TeamId>) {
        self.team = team;
    }

    /// Swap pickup rules mid-match (mode changes, overtime)
    pub fn set_pickup_rules(&mut self, rules: PickupRules) {
        self.config.pickup = rules;
    }

    // ========== Touch & Pickup ==========

    /// A character started overlapping the objective.
    ///
    /// Blocked line of sight defers to a touch re-check instead of failing.
    pub fn on_touch<H: ObjectiveHost>(&mut self, touch: &Touch, host: &mut H) -> bool {
        if !self.is_initialized() {
            trace!(objective = %self.id, candidate = %touch.candidate.id, "touch ignored");
            return false;
        }
        if touch.line_of_sight_clear {
            self.try_pickup(&touch.candidate, host)
        } else {
            self.schedule(TimerKind::TouchRecheck, self.config.timing.touch_recheck_delay_ms, host);
            false
        }
    }

    pub fn can_pickup<H: ObjectiveHost>(&self, candidate: &Candidate, host: &H) -> PickupVerdict {
        let ctx = PickupContext {
            rules: &self.config.pickup,
            phase: host.match_phase(),
            state: self.state(),
            objective_team: self.team_num(),
            candidate,
        };
        PickupEligibilityPolicy::evaluate(&ctx)
    }

    /// Returns true when `candidate` became the holder
    pub fn try_pickup<H: ObjectiveHost>(&mut self, candidate: &Candidate, host: &mut H) -> bool {
        if !self.role.is_authority()
            || !self.is_initialized()
            || !candidate.controlled
            || self.state() == ObjectState::Held
        {
            return false;
        }

        match self.can_pickup(candidate, host) {
            PickupVerdict::Allow => {
                if !candidate.can_carry {
                    trace!(
                        objective = %self.id,
                        candidate = %candidate.id,
                        "candidate refused carry"
                    );
                    return false;
                }
                self.set_holder(candidate, host);
                true
            }
            PickupVerdict::Deny(reason) => {
                self.apply_denial(candidate, reason, host);
                false
            }
        }
    }

    fn apply_denial<H: ObjectiveHost>(
        &mut self,
        candidate: &Candidate,
        reason: DenyReason,
        host: &mut H,
    ) {
        debug!(objective = %self.id, candidate = %candidate.id, ?reason, "pickup denied");
        self.emit(ObjectiveEvent::PickupDenied { candidate: candidate.id, reason });

        if reason.wants_recheck() {
            self.schedule(TimerKind::TouchRecheck, self.config.timing.touch_recheck_delay_ms, host);
        }
        if reason.notifies_candidate() {
            host.notify(candidate.id, self.id, GameMessage::PickupDenied);
        }
        if reason.sends_home() {
            self.send_game_message(GameMessage::SentHome { by: candidate.id }, host);
            self.score(ScoreReason::SentHome, Some(candidate.id), host);
        }
    }

    fn set_holder<H: ObjectiveHost>(&mut self, candidate: &Candidate, host: &mut H) {
        let now = host.now();
        let was_home = self.state() == ObjectState::Home;
        let holder = candidate.id;

        self.clear_ghost();
        self.change_state(Possession::Held(HolderRecord {
            holder,
            holder_team: candidate.team,
            picked_up_at: now,
        }));
        if let Some(base) = self.base.as_mut() {
            base.object_was_picked_up(holder, was_home);
        }

        self.location = candidate.location;
        self.auto_return_at = None;
        self.emit(ObjectiveEvent::HolderChanged { holder: Some(holder) });

        if was_home {
            let ping = self.config.timing.ping_duration_ms;
            self.pinged_until = Some(now.saturating_add(ping));
            self.schedule(TimerKind::PingExpired, ping, host);
            self.emit(ObjectiveEvent::GrabCredited { holder, team: candidate.team });
        }

        self.assists.find_or_create(holder);

        self.send_game_message(GameMessage::Taken { holder }, host);
        self.emit(ObjectiveEvent::PickedUp { holder, team: candidate.team, was_home });
        self.emit(ObjectiveEvent::StatusChanged { instigator: Some(holder) });
        info!(objective = %self.id, %holder, was_home, "objective picked up");
    }

    /// Re-scan overlapping characters, skipping the last holder, until one
    /// of them changes the state.
    pub fn check_touching<H: ObjectiveHost>(&mut self, host: &mut H) {
        if !self.is_initialized() || self.state() == ObjectState::Held {
            return;
        }
        let prev = self.state();
        let touches = host.overlapping(self.id, self.location, self.config.toss.object_radius);
        for touch in touches.iter() {
            if Some(touch.candidate.id) == self.last_holder {
                continue;
            }
            self.on_touch(touch, host);
            if self.state() != prev {
                break;
            }
        }
    }

    // ========== Losing the holder ==========

    /// Detach from the holder and move to `next`.
    ///
    /// Credits the finished hold to the ledger and announces the holder
    /// change. Returns the released record, `None` if nobody held it.
    fn no_longer_held<H: ObjectiveHost>(
        &mut self,
        instigator: Option<HolderId>,
        next: Possession,
        host: &mut H,
    ) -> Option<HolderRecord> {
        let record = *self.possession.holder()?;
        let held = host.now().saturating_sub(record.picked_up_at);
        if let Some(index) = self.assists.find(record.holder) {
            self.assists.add_held_time(index, held);
        }
        self.last_holder = Some(record.holder);

        self.change_state(next);
        self.emit(ObjectiveEvent::HolderChanged { holder: None });
        self.emit(ObjectiveEvent::StatusChanged { instigator });
        debug!(objective = %self.id, holder = %record.holder, held_ms = held, "no longer held");
        Some(record)
    }

    /// Holder lets go (death, manual drop). Only valid while held.
    pub fn drop<H: ObjectiveHost>(&mut self, instigator: Option<HolderId>, host: &mut H) -> bool {
        if !self.role.is_authority() {
            return false;
        }
        let Some(record) = self.possession.holder().copied() else {
            return false;
        };
        let holder_state = host.character(record.holder);

        self.send_game_message(GameMessage::Dropped { holder: Some(record.holder) }, host);

        self.no_longer_held(instigator, Possession::Dropped, host);
        match holder_state {
            Some(holder) => {
                let plan = plan_toss(&holder, &self.config.toss, &mut self.rng);
                let outcome = resolve_toss(self.id, &plan, host);
                self.location = outcome.location;
                self.velocity = outcome.velocity;
                self.movement_enabled = outcome.movement_enabled;
            }
            None => {
                warn!(
                    objective = %self.id,
                    holder = %record.holder,
                    "holder vanished, dropping in place"
                );
                self.velocity = Position::zeros();
                self.movement_enabled = true;
            }
        }

        if let Some(base) = self.base.as_mut() {
            base.object_was_dropped(Some(record.holder));
        }
        self.emit(ObjectiveEvent::Dropped {
            last_holder: Some(record.holder),
            instigator,
            location: self.location,
            movement_enabled: self.movement_enabled,
        });

        if self.config.returns.gradual_auto_return && !self.trail.is_empty() {
            self.trail.discard_if_near(&self.location);
            if let Some(next) = self.trail.peek_nearest().copied() {
                self.put_ghost_at(next);
            }
        }

        self.schedule_auto_return(host);
        // touches were suppressed during the toss; catch anyone still overlapping
        self.schedule(TimerKind::TouchRecheck, self.config.timing.touch_recheck_delay_ms, host);
        info!(objective = %self.id, holder = %record.holder, "objective dropped");
        true
    }

    // ========== Scoring & Return ==========

    /// Report a score event; sends home afterwards when configured
    pub fn score<H: ObjectiveHost>(
        &mut self,
        reason: ScoreReason,
        scorer: Option<HolderId>,
        host: &mut H,
    ) {
        if !self.role.is_authority() {
            return;
        }
        let now = host.now();
        self.last_message_at = Some(now);
        let event = ScoreEvent {
            objective: self.id,
            objective_team: self.team,
            scorer,
            reason,
            assists: self.credited_assists(now),
        };
        host.score_object(&event);
        self.emit(ObjectiveEvent::Scored { reason, scorer });
        info!(objective = %self.id, ?reason, scorer = ?scorer, "objective scored");

        if self.config.returns.send_home_on_score {
            // a capture ends the trip; only touches and timers walk the trail
            if reason == ScoreReason::Captured {
                self.trail.clear();
            }
            self.send_home(host);
        }
    }

    /// Return home, or take one gradual step toward it.
    ///
    /// Returns false when already home.
    pub fn send_home<H: ObjectiveHost>(&mut self, host: &mut H) -> bool {
        if !self.role.is_authority() || self.state() == ObjectState::Home {
            return false;
        }
        let now = host.now();
        self.last_teleported_at = Some(now);
        self.last_teleported_from = self.location;

        if self.config.returns.gradual_auto_return && !self.trail.is_empty() {
            self.trail.discard_if_near(&self.location);
            if let Some(next) = self.trail.pop_nearest() {
                self.step_home(next, host);
                return true;
            }
        }

        let was_held = self.state() == ObjectState::Held;
        if was_held {
            self.no_longer_held(None, Possession::Home, host);
        } else {
            self.change_state(Possession::Home);
        }
        self.clear_ghost();
        if let Some(base) = self.base.as_mut() {
            base.object_returned_home(self.last_holder);
        }
        self.move_to_home();
        self.auto_return_at = None;
        self.emit(ObjectiveEvent::ReturnedHome { last_holder: self.last_holder });
        info!(objective = %self.id, "objective returned home");
        true
    }

    fn step_home<H: ObjectiveHost>(&mut self, next: Position, host: &mut H) {
        if self.state() == ObjectState::Held {
            self.no_longer_held(None, Possession::Dropped, host);
        } else {
            // same state, but pending timers belong to the previous spot
            self.epoch += 1;
        }

        self.location = next;
        self.velocity = Position::zeros();
        self.movement_enabled = true;

        self.trail.discard_if_near(&self.location);
        match self.trail.peek_nearest().copied() {
            Some(ghost) => self.put_ghost_at(ghost),
            None => self.clear_ghost(),
        }

        let remaining = self.trail.len();
        self.emit(ObjectiveEvent::ReturnStep { to: next, remaining });
        debug!(objective = %self.id, remaining, "gradual return step");
        self.schedule_auto_return(host);
    }

    /// Fell out of the world (kill Z)
    pub fn fell_out_of_world<H: ObjectiveHost>(&mut self, host: &mut H) {
        if self.role.is_authority() {
            self.send_home_with_notify(host);
        } else {
            self.location = self.last_synced_location;
        }
    }

    /// Touched lava/slime etc.; carried objectives are unaffected
    pub fn entered_pain_volume<H: ObjectiveHost>(&mut self, host: &mut H) {
        if self.state() == ObjectState::Held {
            return;
        }
        self.fell_out_of_world(host);
    }

    fn send_home_with_notify<H: ObjectiveHost>(&mut self, host: &mut H) {
        if self.send_home(host) && self.state() == ObjectState::Home {
            self.send_game_message(GameMessage::Returned, host);
        }
    }

    // ========== Trail ==========

    /// Sample the current holder's location into the trail
    pub fn track_holder_position<H: ObjectiveHost>(&mut self, host: &mut H) {
        if !self.role.is_authority() {
            return;
        }
        let Some(record) = self.possession.holder().copied() else {
            return;
        };
        if let Some(holder) = host.character(record.holder) {
            self.location = holder.location;
            self.record_position(holder.location);
        }
    }

    /// Returns true when the sample was kept.
    ///
    /// The first sample must clear `min_gradual_return_dist` from home.
    pub fn record_position(&mut self, location: Position) -> bool {
        if !self.role.is_authority() || self.state() == ObjectState::Home {
            return false;
        }
        if self.trail.is_empty() && self.is_initialized() {
            let home = self.home_location();
            if (location - home).norm() < self.trail.min_dist() {
                return false;
            }
        }
        self.trail.record(location)
    }

    // ========== Timers ==========

    /// Re-entry point for tasks scheduled through `TimerScheduler`.
    ///
    /// Returns true when the task acted; stale tasks return false.
    pub fn on_timer_fired<H: ObjectiveHost>(&mut self, task: &ScheduledTask, host: &mut H) -> bool {
        if task.objective != self.id || !self.role.is_authority() {
            return false;
        }
        match task.kind {
            TimerKind::TouchRecheck => {
                if self.state() == ObjectState::Held {
                    return false;
                }
                self.check_touching(host);
                true
            }
            TimerKind::AutoReturn => {
                if task.epoch != self.epoch || self.state() != ObjectState::Dropped {
                    trace!(
                        objective = %self.id,
                        task_epoch = task.epoch,
                        epoch = self.epoch,
                        "stale auto return"
                    );
                    return false;
                }
                self.send_home_with_notify(host);
                true
            }
            TimerKind::PingExpired => match self.pinged_until {
                Some(until) if until <= host.now() => {
                    self.pinged_until = None;
                    self.emit(ObjectiveEvent::PingCleared);
                    true
                }
                _ => false,
            },
        }
    }

    fn schedule<H: ObjectiveHost>(&mut self, kind: TimerKind, delay: u64, host: &mut H) {
        let task = ScheduledTask {
            objective: self.id,
            kind,
            deadline: host.now().saturating_add(delay),
            epoch: self.epoch,
        };
        host.schedule(task);
    }

    fn schedule_auto_return<H: ObjectiveHost>(&mut self, host: &mut H) {
        let delay = self.config.returns.auto_return_time_ms;
        if delay == 0 {
            self.auto_return_at = None;
            return;
        }
        self.auto_return_at = Some(host.now().saturating_add(delay));
        self.schedule(TimerKind::AutoReturn, delay, host);
    }

    // ========== Sync ==========

    pub fn snapshot(&self, now: TimeMs) -> ObjectiveSnapshot {
        ObjectiveSnapshot {
            id: self.id,
            kind: self.kind,
            epoch: self.epoch,
            state: self.state(),
            team: self.team,
            holder: self.possession.holder().copied(),
            location: self.location,
            velocity: self.velocity,
            movement_enabled: self.movement_enabled,
            auto_return_at: self.auto_return_at,
            auto_return_time_ms: self.config.returns.auto_return_time_ms,
            gradual_auto_return: self.config.returns.gradual_auto_return,
            friendly_can_pickup: self.config.pickup.friendly_can_pickup,
            enemy_can_pickup: self.config.pickup.enemy_can_pickup,
            pinged: self.is_pinged(now),
            ghost: self.ghost,
        }
    }

    /// Observer side: adopt the authority's view and emit presentation events.
    ///
    /// Returns whether possession (state or holder) changed.
    pub fn apply_snapshot(&mut self, snapshot: &ObjectiveSnapshot) -> Result<bool> {
        if snapshot.id != self.id {
            return Err(CtfError::SnapshotMismatch { found: snapshot.id.0, expected: self.id.0 });
        }
        if self.role.is_authority() {
            warn!(objective = %self.id, "authority ignores snapshots");
            return Ok(false);
        }

        let prev_state = self.state();
        let prev_holder = self.holder();
        let next = match (snapshot.state, snapshot.holder) {
            (ObjectState::Held, Some(record)) => Possession::Held(record),
            (ObjectState::Held, None) => {
                warn!(objective = %self.id, "held snapshot without holder, treating as dropped");
                Possession::Dropped
            }
            (ObjectState::Dropped, _) => Possession::Dropped,
            (ObjectState::Home, _) => Possession::Home,
        };

        self.possession = next;
        self.epoch = snapshot.epoch;
        self.team = snapshot.team;
        self.location = snapshot.location;
        self.last_synced_location = snapshot.location;
        self.velocity = snapshot.velocity;
        self.movement_enabled = snapshot.movement_enabled;
        self.auto_return_at = snapshot.auto_return_at;
        self.config.returns.auto_return_time_ms = snapshot.auto_return_time_ms;
        self.config.returns.gradual_auto_return = snapshot.gradual_auto_return;
        self.config.pickup.friendly_can_pickup = snapshot.friendly_can_pickup;
        self.config.pickup.enemy_can_pickup = snapshot.enemy_can_pickup;

        if snapshot.ghost != self.ghost {
            match snapshot.ghost {
                Some(at) => self.put_ghost_at(at),
                None => self.clear_ghost(),
            }
        }

        let state_changed = prev_state != self.state();
        if state_changed {
            self.emit(ObjectiveEvent::StateChanged { from: prev_state, to: self.state() });
        }
        let holder_changed = prev_holder != self.holder();
        if holder_changed {
            if let Some(prev) = prev_holder {
                self.last_holder = Some(prev);
            }
            self.emit(ObjectiveEvent::HolderChanged { holder: self.holder() });
        }
        Ok(state_changed || holder_changed)
    }

    // ========== Internals ==========

    fn change_state(&mut self, next: Possession) {
        let from = self.state();
        self.possession = next;
        self.epoch += 1;
        let to = self.state();

        if to == ObjectState::Held {
            self.velocity = Position::zeros();
            self.movement_enabled = false;
        } else {
            self.movement_enabled = true;
        }

        if let Some(base) = self.base.as_mut() {
            base.object_state_was_changed(to);
        }
        if from != to {
            self.emit(ObjectiveEvent::StateChanged { from, to });
        }
    }

    /// Rest at home and forget this trip
    fn move_to_home(&mut self) {
        self.assists.clear();
        self.trail.clear();
        self.velocity = Position::zeros();
        self.movement_enabled = true;
        if self.base.is_some() {
            self.location = self.home_location();
        }
    }

    fn put_ghost_at(&mut self, at: Position) {
        self.ghost = Some(at);
        self.emit(ObjectiveEvent::GhostPlaced { at });
    }

    fn clear_ghost(&mut self) {
        if self.ghost.take().is_some() {
            self.emit(ObjectiveEvent::GhostCleared);
        }
    }

    fn send_game_message<H: ObjectiveHost>(&mut self, message: GameMessage, host: &mut H) {
        self.last_message_at = Some(host.now());
        host.broadcast(self.id, message);
    }

    fn emit(&mut self, event: ObjectiveEvent) {
        self.events.emit(self.id, event);
    }
}

impl<B: HomeBase> Objective for CarriedObjective<B> {
    fn id(&self) -> ObjectiveId {
        self.id
    }

    fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    fn state(&self) -> ObjectState {
        self.possession.state()
    }

    fn team(&self) -> Option<TeamId> {
        self.team
    }

    fn holder(&self) -> Option<HolderId> {
        self.possession.holder().map(|r| r.holder)
    }

    fn location(&self) -> Position {
        self.location
    }
}
