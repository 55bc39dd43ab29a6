//! Runtime configuration: an optional TOML file overlaid by `PLACEBOOK_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use config::{ConfigBuilder, Environment, builder::DefaultState};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  #[serde(default = "default_store_path")]
  pub store_path:  PathBuf,
  /// Shared HS256 secret of the auth service that issues caller tokens.
  #[serde(default)]
  pub auth_secret: String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("placebook.db") }

impl ServerConfig {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::from_builder(
      config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(environment()),
    )
  }

  /// Deserialise whatever sources `builder` already carries.
  fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read config")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  /// The token secret. Fails if unset.
  pub fn auth_secret(&self) -> anyhow::Result<&str> {
    if self.auth_secret.trim().is_empty() {
      bail!("auth_secret must be set (config file or PLACEBOOK_AUTH_SECRET)");
    }
    Ok(&self.auth_secret)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn environment() -> Environment { Environment::with_prefix("PLACEBOOK") }

fn expand_tilde(path: &Path) -> PathBuf {
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
  use config::{File, FileFormat};

  fn from_toml(toml: &str) -> anyhow::Result<ServerConfig> {
    ServerConfig::from_builder(
      config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
  }

  #[test]
  fn defaults_fill_missing_keys() {
    let cfg = from_toml("auth_secret = \"s3cret\"").unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:5000");
    assert_eq!(cfg.auth_secret().unwrap(), "s3cret");
    assert_eq!(cfg.store_path, PathBuf::from("placebook.db"));
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      "host = \"0.0.0.0\"\nport = 8080\nstore_path = \"/var/lib/placebook.db\"\nauth_secret = \"x\"",
    )
    .unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/placebook.db"));
  }

  #[test]
  fn missing_secret_is_rejected() {
    let cfg = from_toml("port = 8080").unwrap();
    assert!(cfg.auth_secret().is_err());
  }

  #[test]
  fn environment_overrides_file() {
    let vars = config::Map::from([
      ("PLACEBOOK_PORT".to_owned(), "9090".to_owned()),
      ("PLACEBOOK_AUTH_SECRET".to_owned(), "from-env".to_owned()),
    ]);
    let cfg = ServerConfig::from_builder(
      config::Config::builder()
        .add_source(File::from_str("port = 8080\nauth_secret = \"x\"", FileFormat::Toml))
        .add_source(environment().source(Some(vars))),
    )
    .unwrap();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.auth_secret().unwrap(), "from-env");
  }

  #[test]
  fn absolute_paths_are_not_expanded() {
    assert_eq!(expand_tilde(Path::new("/tmp/a.db")), PathBuf::from("/tmp/a.db"));
  }
}
