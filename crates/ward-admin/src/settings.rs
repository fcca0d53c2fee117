//! Runtime configuration for the `ward` binary.
//!
//! Read from an optional TOML file layered under `WARD_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `WARD_POLICY__ADMIN_REQUIRES_STAFF=true`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use ward_core::provision::RolePolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
  pub policy:     RolePolicy,
}

impl Default for AdminConfig {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("~/.local/share/ward/ward.db"),
      policy:     RolePolicy::default(),
    }
  }
}

impl AdminConfig {
  /// Load from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("WARD")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise AdminConfig")
  }

  /// `store_path` with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
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
