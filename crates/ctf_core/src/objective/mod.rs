//! # Carried Objective
//!
//! Possession core for a carryable match objective.
//!
//! ## Structure
//! - `machine` - `CarriedObjective`, the Home/Held/Dropped state machine
//! - `eligibility` - who may pick it up, as a pure verdict
//! - `return_trail` / `assist` - trail samples and held-time credit
//! - `host` - collaborator traits the hosting world implements
//! - `events` / `timers` / `sync` - observers, deferred re-entry, replication
//! - `toss` - drop placement and release velocity

pub mod assist;
pub mod eligibility;
pub mod events;
pub mod host;
pub mod kind;
pub mod machine;
pub mod return_trail;
pub mod state;
pub mod sync;
pub mod timers;
pub mod toss;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use assist::{AssistEntry, AssistLedger};
pub use eligibility::{DenyReason, PickupContext, PickupEligibilityPolicy, PickupVerdict};
pub use events::{EventChannel, EventLog, ObjectiveEvent, ObjectiveObserver};
pub use host::{
    CharacterQuery, GameMessage, HomeBase, MatchClock, MessageSink, MovementCollaborator,
    ObjectiveHost, ScoreEvent, ScoreReason, ScoringNotifier, TeamRegistry, TimerScheduler, Touch,
};
pub use kind::{Objective, ObjectiveKind};
pub use machine::CarriedObjective;
pub use return_trail::ReturnTrailTracker;
pub use state::{HolderRecord, ObjectState, Possession};
pub use sync::{ObjectiveSnapshot, Role};
pub use timers::{ScheduledTask, TimerKind, TimerQueue};
pub use toss::{plan_toss, resolve_toss, TossOutcome, TossPlan};
