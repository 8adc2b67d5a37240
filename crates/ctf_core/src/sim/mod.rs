//! Deterministic match harness
//!
//! `MatchWorld` hosts carried objectives in memory; `scenario` scripts it
//! from JSON/YAML files and checks the outcome.

pub mod scenario;
pub mod world;


pub use scenario::{
    run_scenario, run_scenario_with_world, ObjectiveReport, ScenarioAction, ScenarioReport,
    ScenarioSpec,
};
pub use world::{BaseStats, Blocker, CaptureZone, MatchBase, MatchHost, MatchWorld};
