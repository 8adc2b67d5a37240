//! Pickup eligibility
//!
//! Pure decision over (rules, match phase, objective state, team relation).
//! Side effects implied by a verdict (recheck timer, denial message,
//! "sent home" score) are applied by the state machine, not here.

use super::state::ObjectState;
use crate::config::PickupRules;
use crate::types::{Candidate, MatchPhase, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Match not running or in intermission
    MatchNotActive,
    /// Candidate is down; try again shortly
    Incapacitated,
    /// Owning team may not carry it
    FriendlyNotAllowed,
    /// Opposing teams may not carry it
    EnemyNotAllowed,
    /// Touch returns the objective instead of taking it.
    /// `sent_home` is true when the objective was lying dropped.
    SendsHome { sent_home: bool },
}

impl DenyReason {
    pub fn wants_recheck(self) -> bool {
        matches!(self, DenyReason::Incapacitated)
    }

    /// The candidate gets a "you can't pick this up" message
    pub fn notifies_candidate(self) -> bool {
        matches!(self, DenyReason::FriendlyNotAllowed | DenyReason::EnemyNotAllowed)
    }

    pub fn sends_home(self) -> bool {
        matches!(self, DenyReason::SendsHome { sent_home: true })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupVerdict {
    Allow,
    Deny(DenyReason),
}

impl PickupVerdict {
    pub fn is_allowed(self) -> bool {
        matches!(self, PickupVerdict::Allow)
    }

    pub fn deny_reason(self) -> Option<DenyReason> {
        match self {
            PickupVerdict::Allow => None,
            PickupVerdict::Deny(reason) => Some(reason),
        }
    }
}

/// Everything the policy looks at
#[derive(Debug, Clone, Copy)]
pub struct PickupContext<'a> {
    pub rules: &'a PickupRules,
    pub phase: MatchPhase,
    pub state: ObjectState,
    /// Objective's team (`TeamId::NONE` when teamless)
    pub objective_team: TeamId,
    pub candidate: &'a Candidate,
}

pub struct PickupEligibilityPolicy;

impl PickupEligibilityPolicy {
    /// Ordered rule evaluation; the first matching rule wins
    pub fn evaluate(ctx: &PickupContext<'_>) -> PickupVerdict {
        let rules = ctx.rules;
        let dropped = ctx.state == ObjectState::Dropped;

        if !ctx.phase.is_in_progress() || ctx.phase.is_intermission() {
            return PickupVerdict::Deny(DenyReason::MatchNotActive);
        }
        if ctx.candidate.incapacitated {
            return PickupVerdict::Deny(DenyReason::Incapacitated);
        }
        if rules.anyone_can_pickup {
            return PickupVerdict::Allow;
        }

        if ctx.objective_team == ctx.candidate.team {
            if rules.friendly_can_pickup {
                PickupVerdict::Allow
            } else if rules.team_pickup_sends_home {
                PickupVerdict::Deny(DenyReason::SendsHome { sent_home: dropped })
            } else {
                PickupVerdict::Deny(DenyReason::FriendlyNotAllowed)
            }
        } else if rules.enemy_pickup_sends_home {
            PickupVerdict::Deny(DenyReason::SendsHome { sent_home: dropped })
        } else if rules.enemy_can_pickup {
            PickupVerdict::Allow
        } else {
            PickupVerdict::Deny(DenyReason::EnemyNotAllowed)
        }
    }

    pub fn can_pickup(ctx: &PickupContext<'_>) -> bool {
        Self::evaluate(ctx).is_allowed()
    }
}
