//! # Objective Configuration
//!
//! All tuning for a carried objective in one serde-friendly struct.
//!
//! ## Presets
//! - `ctf_flag()` - enemies carry, owners return a dropped flag by touch
//! - `neutral_flag()` - anyone carries
//! - `team_relic()` - owners carry, enemies return it by touch
//! - `gradual_return()` - CTF flag that steps home along its trail
//!
//! ## Usage
//! ```rust
//! use ctf_core::config::ObjectiveConfig;
//!
//! let config = ObjectiveConfig::default();
//! let gradual = ObjectiveConfig::gradual_return();
//! assert!(gradual.returns.gradual_auto_return);
//! ```

mod pickup_config;
mod return_config;
mod timing_config;
mod toss_config;

pub use pickup_config::PickupRules;
pub use return_config::ReturnConfig;
pub use timing_config::TimingConfig;
pub use toss_config::TossConfig;

use crate::error::{CtfError, Result};
use crate::objective::ObjectiveKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full configuration of one carried objective
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObjectiveConfig {
    #[serde(default)]
    pub pickup: PickupRules,
    #[serde(default)]
    pub returns: ReturnConfig,
    #[serde(default)]
    pub toss: TossConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl ObjectiveConfig {
    /// Classic CTF flag (team touch returns a dropped flag)
    pub fn ctf_flag() -> Self {
        let mut cfg = Self::default();
        cfg.pickup.team_pickup_sends_home = true;
        cfg
    }

    /// Single neutral flag anyone may carry
    pub fn neutral_flag() -> Self {
        let mut cfg = Self::default();
        cfg.pickup.anyone_can_pickup = true;
        cfg.returns.auto_return_time_ms = 20_000;
        cfg
    }

    /// Owners escort it; enemies send it home by touching it on the ground
    pub fn team_relic() -> Self {
        let mut cfg = Self::default();
        cfg.pickup.friendly_can_pickup = true;
        cfg.pickup.enemy_can_pickup = false;
        cfg.pickup.enemy_pickup_sends_home = true;
        cfg
    }

    /// CTF flag with staged return along the carried path
    pub fn gradual_return() -> Self {
        let mut cfg = Self::ctf_flag();
        cfg.returns.gradual_auto_return = true;
        cfg.returns.auto_return_time_ms = 8_000;
        cfg
    }

    pub fn for_kind(kind: ObjectiveKind) -> Self {
        match kind {
            ObjectiveKind::CtfFlag => Self::ctf_flag(),
            ObjectiveKind::NeutralFlag => Self::neutral_flag(),
            ObjectiveKind::TeamRelic => Self::team_relic(),
        }
    }

    /// Reject values the state machine cannot work with
    pub fn validate(&self) -> Result<()> {
        let r = &self.returns;
        if !r.min_gradual_return_dist.is_finite() || r.min_gradual_return_dist < 0.0 {
            return Err(invalid(
                "returns.min_gradual_return_dist",
                format!("must be a finite value >= 0, got {}", r.min_gradual_return_dist),
            ));
        }
        if r.gradual_auto_return && r.trail_capacity == 0 {
            return Err(invalid(
                "returns.trail_capacity",
                "must be >= 1 when gradual_auto_return is enabled".to_string(),
            ));
        }

        let t = &self.toss;
        let speeds = [
            ("toss.throw_speed", t.throw_speed),
            ("toss.inherit_velocity", t.inherit_velocity),
            ("toss.scatter_speed", t.scatter_speed),
            ("toss.lift_speed", t.lift_speed),
            ("toss.object_half_height", t.object_half_height),
            ("toss.adjust_fraction", t.adjust_fraction),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be a finite value >= 0, got {}", value)));
            }
        }
        if !t.object_radius.is_finite() || t.object_radius <= 0.0 {
            return Err(invalid(
                "toss.object_radius",
                format!("must be > 0, got {}", t.object_radius),
            ));
        }
        Ok(())
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
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

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn invalid(field: &'static str, reason: String) -> CtfError {
    CtfError::InvalidConfig { field, reason }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = ObjectiveConfig::default();
        assert!(cfg.pickup.enemy_can_pickup);
        assert!(!cfg.pickup.friendly_can_pickup);
        assert_eq!(cfg.returns.auto_return_time_ms, 30_000);
        assert!((cfg.returns.min_gradual_return_dist - 1400.0).abs() < 0.001);
        assert!(cfg.returns.send_home_on_score);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets_differ_in_pickup_rules() {
        assert!(ObjectiveConfig::ctf_flag().pickup.team_pickup_sends_home);
        assert!(ObjectiveConfig::neutral_flag().pickup.anyone_can_pickup);

        let relic = ObjectiveConfig::team_relic();
        assert!(relic.pickup.friendly_can_pickup);
        assert!(!relic.pickup.enemy_can_pickup);
        assert!(relic.pickup.enemy_pickup_sends_home);

        let gradual = ObjectiveConfig::gradual_return();
        assert!(gradual.returns.gradual_auto_return);
        assert!(gradual.pickup.team_pickup_sends_home);
    }

    #[test]
    fn test_for_kind_matches_presets() {
        let cfg = ObjectiveConfig::for_kind(ObjectiveKind::TeamRelic);
        assert_eq!(cfg.pickup, ObjectiveConfig::team_relic().pickup);
    }

    #[test]
    fn test_validate_rejects_negative_distance() {
        let mut cfg = ObjectiveConfig::default();
        cfg.returns.min_gradual_return_dist = -1.0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            CtfError::InvalidConfig { field: "returns.min_gradual_return_dist", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_empty_trail_with_gradual_return() {
        let mut cfg = ObjectiveConfig::gradual_return();
        cfg.returns.trail_capacity = 0;
        assert!(cfg.validate().is_err());

        cfg.returns.gradual_auto_return = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_radius() {
        let mut cfg = ObjectiveConfig::default();
        cfg.toss.object_radius = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "pickup:\n  friendly_can_pickup: true\nreturns:\n  gradual_auto_return: true\n";
        let cfg = ObjectiveConfig::from_yaml_str(yaml).unwrap();
        assert!(cfg.pickup.friendly_can_pickup);
        assert!(cfg.pickup.enemy_can_pickup);
        assert!(cfg.returns.gradual_auto_return);
        assert_eq!(cfg.returns.trail_capacity, 64);
        assert_eq!(cfg.timing.touch_recheck_delay_ms, 100);
    }

    #[test]
    fn test_yaml_round_trip_preserves_preset() {
        let cfg = ObjectiveConfig::team_relic();
        let yaml = cfg.to_yaml_string().unwrap();
        let parsed = ObjectiveConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.pickup, cfg.pickup);
    }

    #[test]
    fn test_load_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("flag.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        write!(file, r#"{{"returns": {{"auto_return_time_ms": 5000}}}}"#).unwrap();
        let cfg = ObjectiveConfig::load_from_path(&json_path).unwrap();
        assert_eq!(cfg.returns.auto_return_time_ms, 5000);

        let txt_path = dir.path().join("flag.txt");
        std::fs::write(&txt_path, "{}").unwrap();
        assert!(matches!(
            ObjectiveConfig::load_from_path(&txt_path),
            Err(CtfError::UnsupportedFormat { .. })
        ));
    }
}
