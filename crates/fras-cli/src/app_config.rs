//! Layered runtime configuration: defaults, then `fras.toml`, then `FRAS_*`
//! environment variables, then command-line flags.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite file holding the durable identity slot.
  pub store_path:        PathBuf,
  /// Where tracing output goes; the terminal belongs to the UI.
  pub log_path:          PathBuf,
  pub login_latency_ms:  u64,
  pub submit_latency_ms: u64,
  /// Fixes the generated attendance month.
  pub seed:              Option<u64>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:        PathBuf::from("fras.db"),
      log_path:          PathBuf::from("fras.log"),
      login_latency_ms:  1000,
      submit_latency_ms: 1500,
      seed:              None,
    }
  }
}

impl AppConfig {
  /// Read the optional file at `path` and the `FRAS_*` environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FRAS"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.log_path = expand_tilde(&cfg.log_path);
    Ok(cfg)
  }

  pub fn login_latency(&self) -> Duration {
    Duration::from_millis(self.login_latency_ms)
  }

  pub fn submit_latency(&self) -> Duration {
    Duration::from_millis(self.submit_latency_ms)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let cfg = AppConfig::load(Path::new("definitely/not/here.toml")).unwrap();
    assert_eq!(cfg.login_latency(), Duration::from_secs(1));
    assert_eq!(cfg.submit_latency_ms, 1500);
    assert!(cfg.seed.is_none());
  }

  #[test]
  fn tilde_is_left_alone_elsewhere() {
    assert_eq!(expand_tilde(Path::new("a/~/b")), PathBuf::from("a/~/b"));
    assert_eq!(expand_tilde(Path::new("fras.db")), PathBuf::from("fras.db"));
  }
}
