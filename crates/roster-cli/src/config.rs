//! Session configuration, layered from defaults, an optional TOML file and
//! `ROSTER__*` environment variables.

use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, FixedOffset, Offset as _, Utc};
use roster_core::catalog::Catalog;
use serde::Deserialize;

// ─── Operator ─────────────────────────────────────────────────────────────────

/// What the operator may do in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// May create, edit and import contacts.
  #[default]
  Admin,
  /// May browse, comment and export.
  User,
}

/// The simulated signed-in operator. Their name is the actor on every
/// mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
  pub name:  String,
  pub email: String,
  pub role:  Role,
}

impl Default for OperatorConfig {
  fn default() -> Self {
    Self {
      name:  "Alex Tan".into(),
      email: "admin@company.com".into(),
      role:  Role::Admin,
    }
  }
}

// ─── Display ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
  /// Offset from UTC, in hours, used for timestamps and "today".
  pub utc_offset_hours: i32,
  /// `chrono` format string for audit timestamps.
  pub timestamp_format: String,
  /// Shown in place of a missing photo.
  pub default_photo:    String,
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      utc_offset_hours: 8,
      timestamp_format: "%d %b %y, %H:%M".into(),
      default_photo:    "https://www.w3schools.com/howto/img_avatar.png".into(),
    }
  }
}

impl DisplayConfig {
  /// The configured offset; an out-of-range value falls back to UTC.
  pub fn offset(&self) -> FixedOffset {
    self
      .utc_offset_hours
      .checked_mul(3600)
      .and_then(FixedOffset::east_opt)
      .unwrap_or_else(|| Utc.fix())
  }

  pub fn timestamp(&self, at: DateTime<Utc>) -> String {
    at.with_timezone(&self.offset())
      .format(&self.timestamp_format)
      .to_string()
  }
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Everything a session needs besides the store itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub operator:         OperatorConfig,
  pub display:          DisplayConfig,
  pub catalog:          Catalog,
  /// Seed the sample directory at session start.
  pub seed_sample_data: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      operator:         OperatorConfig::default(),
      display:          DisplayConfig::default(),
      catalog:          Catalog::default(),
      seed_sample_data: true,
    }
  }
}

impl Settings {
  /// Load settings from `path` (if it exists) and the environment.
  ///
  /// Nested keys use a double underscore, e.g. `ROSTER__OPERATOR__ROLE=user`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSTER").separator("__"))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Offset, TimeZone};

  use super::*;

  #[test]
  fn defaults_match_the_sample_operator() {
    let settings = Settings::default();
    assert_eq!(settings.operator.name, "Alex Tan");
    assert_eq!(settings.operator.role, Role::Admin);
    assert!(settings.seed_sample_data);
    assert_eq!(settings.catalog.tiers, vec!["A", "B", "C", "D"]);
  }

  #[test]
  fn timestamps_render_in_configured_offset() {
    let display = DisplayConfig::default();
    let at = Utc.with_ymd_and_hms(2026, 1, 5, 20, 15, 0).unwrap();
    assert_eq!(display.timestamp(at), "06 Jan 26, 04:15");
  }

  #[test]
  fn out_of_range_offset_falls_back_to_utc() {
    let display = DisplayConfig { utc_offset_hours: 99, ..DisplayConfig::default() };
    assert_eq!(display.offset(), Utc.fix());
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.toml");
    std::fs::write(
      &path,
      "seed_sample_data = false\n\n[operator]\nname = \"Jo Lee\"\nrole = \"user\"\n\n[catalog]\ntiers = [\"Gold\", \"Silver\"]\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.operator.name, "Jo Lee");
    assert_eq!(settings.operator.role, Role::User);
    assert_eq!(settings.operator.email, "admin@company.com");
    assert!(!settings.seed_sample_data);
    assert_eq!(settings.catalog.tiers, vec!["Gold", "Silver"]);
    assert_eq!(settings.catalog.statuses, vec!["Active", "Inactive"]);
  }

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.display.utc_offset_hours, 8);
  }
}
