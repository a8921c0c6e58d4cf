//! Runtime settings, read from an optional TOML file and `FLEET_`-prefixed
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{ConfigBuilder, builder::DefaultState};
use fleet_core::{WorkspaceSettings, alert::AlertPolicy, retention::RetentionPolicy};
use serde::Deserialize;

/// Shape of `fleet.toml`. Every key is optional.
///
/// Nested keys can be set from the environment with a double underscore,
/// e.g. `FLEET_ALERTS__NOTIFY_WITHIN_DAYS=30`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path:    PathBuf,
  pub alerts:        AlertPolicy,
  pub activity:      RetentionPolicy,
  /// Only `retention_days` applies to notifications.
  pub notifications: RetentionPolicy,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:    PathBuf::from("fleet.db"),
      alerts:        AlertPolicy::default(),
      activity:      RetentionPolicy::default(),
      notifications: RetentionPolicy::default(),
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let builder = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(environment());
    Self::build(builder)
  }

  fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn workspace(&self) -> WorkspaceSettings {
    WorkspaceSettings {
      alerts:        self.alerts.clone(),
      activity:      self.activity.clone(),
      notifications: self.notifications.clone(),
    }
  }

  /// `store_path` with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// `FLEET_STORE_PATH`, `FLEET_ALERTS__NOTIFY_WITHIN_DAYS` and so on. The
/// prefix is joined with a single underscore, nested keys with two.
fn environment() -> config::Environment {
  config::Environment::with_prefix("FLEET")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
