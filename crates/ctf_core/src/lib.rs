//! # ctf_core - Carried Objective Possession Core
//!
//! Deterministic state machine for carryable match objectives (CTF flags,
//! neutral flags, team relics): who holds it, when it drops, how it finds
//! its way home and who gets credit along the way.
//!
//! ## Features
//! - Home / Held / Dropped possession with a structural holder invariant
//! - Configurable pickup rules and staged "gradual" return along a trail
//! - Host-agnostic: the engine plugs in through small collaborator traits
//! - Same seed = same drop scatter, so scenarios replay exactly

// Game engine callbacks often carry many parameters
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// `CarriedObjective::drop` mirrors the host-facing operation name
#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod error;
pub mod objective;
pub mod sim;
pub mod types;

pub use config::ObjectiveConfig;
pub use error::{CtfError, Result};
pub use objective::{
    CarriedObjective, HomeBase, ObjectState, Objective, ObjectiveEvent, ObjectiveHost,
    ObjectiveKind, ObjectiveSnapshot, Role, ScoreReason,
};
pub use sim::{run_scenario, MatchWorld, ScenarioReport, ScenarioSpec};
pub use types::{Candidate, HolderId, MatchPhase, ObjectiveId, Position, TeamId, TimeMs};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
