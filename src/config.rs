//! Loading backend configuration (distribution policy, exam settings, optional banks) from TOML.
//!
//! See `PrepConfig` for the expected schema. Every section is optional.

use serde::Deserialize;
use tracing::{error, info};

use crate::distribute::DistributionPolicy;
use crate::domain::{ConceptItem, Exam};
use crate::error::ConfigError;
use crate::shuffle::DEFAULT_BIAS_TOLERANCE;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PrepConfig {
  #[serde(default)]
  pub distribution: DistributionPolicy,
  #[serde(default)]
  pub exam: ExamSettings,
  #[serde(default)]
  pub shuffle: ShuffleSettings,
  #[serde(default)]
  pub exams: Vec<Exam>,
  #[serde(default)]
  pub concepts: Vec<ConceptItem>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExamSettings {
  /// Percentage needed to pass a level exam.
  pub pass_mark: f64,
  /// Seconds an unsubmitted attempt keeps its translation tables.
  pub attempt_ttl_secs: u64,
}

impl Default for ExamSettings {
  fn default() -> Self { Self { pass_mark: 70.0, attempt_ttl_secs: 2 * 60 * 60 } }
}

impl ExamSettings {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&self.pass_mark) {
      return Err(ConfigError::InvalidSetting {
        section: "exam",
        message: format!("pass_mark {} outside 0..=100", self.pass_mark),
      });
    }
    if self.attempt_ttl_secs == 0 {
      return Err(ConfigError::InvalidSetting {
        section: "exam",
        message: "attempt_ttl_secs must be at least 1".into(),
      });
    }
    Ok(())
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ShuffleSettings {
  /// Allowed deviation per answer position, as a fraction of its expected count.
  pub bias_tolerance: f64,
}

impl Default for ShuffleSettings {
  fn default() -> Self { Self { bias_tolerance: DEFAULT_BIAS_TOLERANCE } }
}

impl ShuffleSettings {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.bias_tolerance.is_finite() || self.bias_tolerance < 0.0 {
      return Err(ConfigError::InvalidSetting {
        section: "shuffle",
        message: format!("bias_tolerance {} is not a non-negative number", self.bias_tolerance),
      });
    }
    Ok(())
  }
}

impl PrepConfig {
  /// Settings checks that must pass before the service starts. Bank entries are
  /// checked separately and skipped one by one.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.distribution.validate()?;
    self.exam.validate()?;
    self.shuffle.validate()
  }
}

/// Parse a TOML document into `PrepConfig`.
pub fn parse_config(s: &str) -> Result<PrepConfig, toml::de::Error> {
  toml::from_str::<PrepConfig>(s)
}

/// Attempt to load `PrepConfig` from PREP_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<PrepConfig> {
  let path = std::env::var("PREP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "aigp_prep_backend", %path, exams = cfg.exams.len(), concepts = cfg.concepts.len(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "aigp_prep_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "aigp_prep_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
