//! Scenario files: a scripted match plus assertions about how it ends.
//!
//! Scenarios are JSON or YAML. Actions run in order against a fresh
//! `MatchWorld`; the report lists every assertion that did not hold.

use super::world::{BaseStats, Blocker, CaptureZone, MatchBase, MatchWorld, DEFAULT_CAPTURE_RADIUS};
use crate::config::ObjectiveConfig;
use crate::error::{CtfError, Result};
use crate::objective::{ObjectState, Objective, ObjectiveKind, ObjectiveSnapshot};
use crate::types::{pos, HolderId, MatchPhase, ObjectiveId, TeamId, TimeMs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const POS_TOLERANCE: f32 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioObjective {
    pub id: u32,
    #[serde(default)]
    pub kind: ObjectiveKind,
    /// Base owner; omitted for teamless objectives
    #[serde(default)]
    pub team: Option<u8>,
    pub base: [f32; 3],
    /// Replaces the kind's preset
    #[serde(default)]
    pub config: Option<ObjectiveConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCharacter {
    pub id: u32,
    pub team: u8,
    pub at: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioBlocker {
    pub center: [f32; 3],
    pub radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCaptureZone {
    pub team: u8,
    pub center: [f32; 3],
    #[serde(default = "default_capture_radius")]
    pub radius: f32,
}

fn default_capture_radius() -> f32 {
    DEFAULT_CAPTURE_RADIUS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioAction {
    Move {
        character: u32,
        to: [f32; 3],
    },
    /// Walk through `points`, advancing `step_ms` after each one
    Path {
        character: u32,
        points: Vec<[f32; 3]>,
        #[serde(default)]
        step_ms: u64,
    },
    Kill {
        character: u32,
        #[serde(default)]
        killer: Option<u32>,
    },
    Respawn {
        character: u32,
        at: [f32; 3],
    },
    Drop {
        character: u32,
    },
    Incapacitate {
        character: u32,
        #[serde(default = "default_true")]
        value: bool,
    },
    Advance {
        ms: u64,
    },
    SetPhase {
        phase: MatchPhase,
    },
    FellOutOfWorld {
        objective: u32,
    },
    Hazard {
        objective: u32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveAssertion {
    pub objective: u32,
    #[serde(default)]
    pub state: Option<ObjectState>,
    #[serde(default)]
    pub holder: Option<u32>,
    #[serde(default)]
    pub location: Option<[f32; 3]>,
    #[serde(default)]
    pub has_ghost: Option<bool>,
    #[serde(default)]
    pub trail_len: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventAssertion {
    /// Snake-case event name, e.g. `picked_up`
    pub event: String,
    #[serde(default)]
    pub objective: Option<u32>,
    #[serde(default)]
    pub count_min: Option<u32>,
    #[serde(default)]
    pub count_max: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreAssertion {
    pub team: u8,
    pub points: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSpec {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_team_count")]
    pub team_count: u8,
    #[serde(default)]
    pub phase: Option<MatchPhase>,
    pub objectives: Vec<ScenarioObjective>,
    #[serde(default)]
    pub characters: Vec<ScenarioCharacter>,
    #[serde(default)]
    pub blockers: Vec<ScenarioBlocker>,
    #[serde(default)]
    pub capture_zones: Vec<ScenarioCaptureZone>,
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,
    #[serde(default)]
    pub objective_assertions: Vec<ObjectiveAssertion>,
    #[serde(default)]
    pub event_assertions: Vec<EventAssertion>,
    #[serde(default)]
    pub score_assertions: Vec<ScoreAssertion>,
}

fn default_team_count() -> u8 {
    2
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveReport {
    pub snapshot: ObjectiveSnapshot,
    pub base: BaseStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub id: String,
    pub finished_at: TimeMs,
    pub objectives: Vec<ObjectiveReport>,
    pub team_scores: BTreeMap<TeamId, u32>,
    pub events_by_type: BTreeMap<String, usize>,
    pub assertion_failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.assertion_failures.is_empty()
    }
}

impl ScenarioSpec {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Load from a `.yaml`/`.yml`/`.json` file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            Some("json") => Self::from_json_str(&raw),
            _ => Err(CtfError::UnsupportedFormat { path: path.display().to_string() }),
        }
    }

    /// Fresh world with every objective, character, blocker and zone placed.
    ///
    /// `config_override` replaces every objective's configuration.
    pub fn build_world(&self, config_override: Option<&ObjectiveConfig>) -> Result<MatchWorld> {
        if self.objectives.is_empty() {
            return Err(CtfError::InvalidScenario(format!(
                "scenario {} has no objectives",
                self.id
            )));
        }
        let mut world = MatchWorld::new(self.seed, self.team_count);
        if let Some(phase) = self.phase {
            world.set_phase(phase);
        }

        for blocker in &self.blockers {
            if !blocker.radius.is_finite() || blocker.radius <= 0.0 {
                return Err(CtfError::InvalidScenario(format!(
                    "blocker radius must be > 0, got {}",
                    blocker.radius
                )));
            }
            world.add_blocker(Blocker { center: pos(blocker.center), radius: blocker.radius });
        }
        for zone in &self.capture_zones {
            world.add_capture_zone(CaptureZone {
                team: TeamId(zone.team),
                center: pos(zone.center),
                radius: zone.radius,
            });
        }

        for spec in &self.objectives {
            let config = match (config_override, spec.config.as_ref()) {
                (Some(cfg), _) => cfg.clone(),
                (None, Some(cfg)) => cfg.clone(),
                (None, None) => ObjectiveConfig::for_kind(spec.kind),
            };
            let team = spec.team.map(TeamId).unwrap_or(TeamId::NONE);
            let base = MatchBase::new(team, pos(spec.base));
            world.spawn_objective(ObjectiveId(spec.id), spec.kind, config, base)?;
        }
        for character in &self.characters {
            world.spawn_character(
                HolderId(character.id),
                TeamId(character.team),
                pos(character.at),
            )?;
        }
        Ok(world)
    }
}

pub fn run_scenario(
    spec: &ScenarioSpec,
    config_override: Option<&ObjectiveConfig>,
) -> Result<ScenarioReport> {
    let (report, _world) = run_scenario_with_world(spec, config_override)?;
    Ok(report)
}

/// Like `run_scenario`, also handing back the final world for inspection
pub fn run_scenario_with_world(
    spec: &ScenarioSpec,
    config_override: Option<&ObjectiveConfig>,
) -> Result<(ScenarioReport, MatchWorld)> {
    let mut world = spec.build_world(config_override)?;
    info!(scenario = %spec.id, actions = spec.actions.len(), "running scenario");

    for action in &spec.actions {
        apply_action(&mut world, action)?;
    }

    let mut assertion_failures = Vec::new();
    check_objectives(&world, &spec.objective_assertions, &mut assertion_failures)?;
    check_events(&world, &spec.event_assertions, &mut assertion_failures);
    for assertion in &spec.score_assertions {
        let points = world.team_score(TeamId(assertion.team));
        if points != assertion.points {
            assertion_failures.push(format!(
                "Team {} scored {} (expected {})",
                assertion.team, points, assertion.points
            ));
        }
    }

    let mut events_by_type: BTreeMap<String, usize> = BTreeMap::new();
    for (_, event) in world.events().events() {
        *events_by_type.entry(event.name().to_string()).or_insert(0) += 1;
    }
    let objectives = world
        .objectives()
        .map(|o| ObjectiveReport {
            snapshot: o.snapshot(world.now()),
            base: o.home_base().map(|b| b.stats()).unwrap_or_default(),
        })
        .collect();

    let report = ScenarioReport {
        id: spec.id.clone(),
        finished_at: world.now(),
        objectives,
        team_scores: world.team_scores().clone(),
        events_by_type,
        assertion_failures,
    };
    info!(scenario = %spec.id, passed = report.passed(), "scenario finished");
    Ok((report, world))
}

fn apply_action(world: &mut MatchWorld, action: &ScenarioAction) -> Result<()> {
    match action {
        ScenarioAction::Move { character, to } => {
            world.move_character(HolderId(*character), pos(*to))
        }
        ScenarioAction::Path { character, points, step_ms } => {
            for point in points {
                world.move_character(HolderId(*character), pos(*point))?;
                world.advance(*step_ms);
            }
            Ok(())
        }
        ScenarioAction::Kill { character, killer } => {
            world.kill_character(HolderId(*character), killer.map(HolderId))
        }
        ScenarioAction::Respawn { character, at } => {
            world.respawn_character(HolderId(*character), pos(*at))
        }
        ScenarioAction::Drop { character } => world.drop_carried(HolderId(*character)).map(|_| ()),
        ScenarioAction::Incapacitate { character, value } => {
            world.set_incapacitated(HolderId(*character), *value)
        }
        ScenarioAction::Advance { ms } => {
            world.advance(*ms);
            Ok(())
        }
        ScenarioAction::SetPhase { phase } => {
            world.set_phase(*phase);
            Ok(())
        }
        ScenarioAction::FellOutOfWorld { objective } => {
            world.objective_fell_out(ObjectiveId(*objective))
        }
        ScenarioAction::Hazard { objective } => world.objective_hit_hazard(ObjectiveId(*objective)),
    }
}

fn check_objectives(
    world: &MatchWorld,
    assertions: &[ObjectiveAssertion],
    failures: &mut Vec<String>,
) -> Result<()> {
    for assertion in assertions {
        let objective = world
            .objective(ObjectiveId(assertion.objective))
            .ok_or(CtfError::UnknownScenarioRef { kind: "objective", id: assertion.objective })?;
        let id = assertion.objective;

        if let Some(state) = assertion.state {
            if objective.state() != state {
                failures.push(format!(
                    "Objective {} state {} (expected {})",
                    id,
                    objective.state(),
                    state
                ));
            }
        }
        if let Some(holder) = assertion.holder {
            if objective.holder() != Some(HolderId(holder)) {
                failures.push(format!(
                    "Objective {} holder {:?} (expected {})",
                    id,
                    objective.holder().map(|h| h.0),
                    holder
                ));
            }
        }
        if let Some(expected) = assertion.location {
            let at = objective.location();
            if (at - pos(expected)).norm() > POS_TOLERANCE {
                failures.push(format!(
                    "Objective {} at ({:.1},{:.1},{:.1}) (expected {:.1},{:.1},{:.1})",
                    id, at.x, at.y, at.z, expected[0], expected[1], expected[2]
                ));
            }
        }
        if let Some(has_ghost) = assertion.has_ghost {
            if objective.ghost().is_some() != has_ghost {
                failures.push(format!(
                    "Objective {} ghost present {} (expected {})",
                    id, !has_ghost, has_ghost
                ));
            }
        }
        if let Some(len) = assertion.trail_len {
            if objective.trail().len() != len {
                failures.push(format!(
                    "Objective {} trail length {} (expected {})",
                    id,
                    objective.trail().len(),
                    len
                ));
            }
        }
    }
    Ok(())
}

fn check_events(world: &MatchWorld, assertions: &[EventAssertion], failures: &mut Vec<String>) {
    let events = world.events().events();
    for assertion in assertions {
        let min = assertion.count_min.unwrap_or(0);
        let max = assertion.count_max.unwrap_or(u32::MAX);
        let count = events
            .iter()
            .filter(|(_, event)| event.name() == assertion.event)
            .filter(|(objective, _)| match assertion.objective {
                Some(id) => objective.0 == id,
                None => true,
            })
            .count() as u32;

        if count < min || count > max {
            failures.push(format!(
                "Event {} count {} outside [{}, {}]",
                assertion.event, count, min, max
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = r#"{
        "id": "capture",
        "seed": 3,
        "objectives": [
            { "id": 1, "kind": "ctf_flag", "team": 0, "base": [0, 0, 0] },
            { "id": 2, "kind": "ctf_flag", "team": 1, "base": [10000, 0, 0] }
        ],
        "characters": [ { "id": 7, "team": 1, "at": [9000, 0, 92] } ],
        "capture_zones": [ { "team": 1, "center": [10000, 0, 92] } ],
        "actions": [
            { "type": "path", "character": 7, "step_ms": 500,
              "points": [[3000, 0, 92], [50, 0, 92]] },
            { "type": "path", "character": 7, "step_ms": 500,
              "points": [[5000, 0, 92], [10000, 0, 92]] }
        ],
        "objective_assertions": [ { "objective": 1, "state": "home" } ],
        "event_assertions": [
            { "event": "scored", "objective": 1, "count_min": 1, "count_max": 1 }
        ],
        "score_assertions": [ { "team": 1, "points": 1 } ]
    }"#;

    #[test]
    fn test_capture_scenario_passes() {
        let spec = ScenarioSpec::from_json_str(CAPTURE).unwrap();
        let report = run_scenario(&spec, None).unwrap();
        assert!(report.passed(), "{:?}", report.assertion_failures);
        assert_eq!(report.objectives.len(), 2);
        assert_eq!(report.objectives[0].base.taken_from_home, 1);
        assert_eq!(report.events_by_type.get("picked_up"), Some(&1));
    }

    #[test]
    fn test_failed_assertions_are_reported() {
        let mut spec = ScenarioSpec::from_json_str(CAPTURE).unwrap();
        spec.score_assertions[0].points = 3;
        spec.objective_assertions[0].state = Some(ObjectState::Held);
        let report = run_scenario(&spec, None).unwrap();
        assert!(!report.passed());
        assert_eq!(report.assertion_failures.len(), 2);
    }

    #[test]
    fn test_config_override_applies_to_all() {
        let spec = ScenarioSpec::from_json_str(CAPTURE).unwrap();
        let mut cfg = ObjectiveConfig::ctf_flag();
        cfg.returns.send_home_on_score = false;
        let (_, world) = run_scenario_with_world(&spec, Some(&cfg)).unwrap();
        assert_eq!(world.objective(ObjectiveId(1)).map(|o| o.state()), Some(ObjectState::Held));
    }

    #[test]
    fn test_yaml_scenario() {
        let raw = r#"
id: gradual
seed: 1
objectives:
  - id: 1
    team: 0
    base: [0, 0, 0]
    config:
      pickup:
        team_pickup_sends_home: true
      returns:
        gradual_auto_return: true
        auto_return_time_ms: 5000
characters:
  - { id: 2, team: 1, at: [50, 0, 92] }
actions:
  - type: path
    character: 2
    points: [[2000, 0, 92], [4000, 0, 92], [6000, 0, 92]]
  - { type: kill, character: 2 }
  - { type: advance, ms: 5000 }
objective_assertions:
  - { objective: 1, state: dropped, trail_len: 1, has_ghost: true, location: [4000, 0, 92] }
"#;
        let spec = ScenarioSpec::from_yaml_str(raw).unwrap();
        let report = run_scenario(&spec, None).unwrap();
        assert!(report.passed(), "{:?}", report.assertion_failures);
    }

    #[test]
    fn test_unknown_character_fails_the_run() {
        let mut spec = ScenarioSpec::from_json_str(CAPTURE).unwrap();
        spec.actions.push(ScenarioAction::Drop { character: 99 });
        let err = run_scenario(&spec, None).unwrap_err();
        assert!(matches!(err, CtfError::UnknownScenarioRef { kind: "character", id: 99 }));
    }

    #[test]
    fn test_scenario_without_objectives_is_invalid() {
        let spec =
            ScenarioSpec::from_json_str(r#"{ "id": "empty", "seed": 0, "objectives": [] }"#)
                .unwrap();
        assert!(matches!(run_scenario(&spec, None), Err(CtfError::InvalidScenario(_))));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = ScenarioSpec::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, CtfError::UnsupportedFormat { .. }));
    }
}
