//! Runtime configuration.
//!
//! Sources, later ones winning: the TOML file named on the command line (if it
//! exists), `REVIEWS_*` environment variables, then the conventional `PORT`
//! variable.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 3000
//! store_uri = "sqlite://reviews.db"
//! allowed_origins = ["http://localhost:3000"]
//! list_approved_only = false
//!
//! [connect]
//! max_attempts = 3
//! retry_delay_secs = 5
//! ```

use std::{path::Path, time::Duration};

use ::config::{Config, ConfigError, Environment, File};
use reviewbox_core::connect::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_uri")]
  pub store_uri:          String,
  /// Origins allowed to make credentialed cross-origin requests.
  #[serde(default = "default_allowed_origins")]
  pub allowed_origins:    Vec<String>,
  /// Hide reviews with `approved = false` from listings.
  #[serde(default)]
  pub list_approved_only: bool,
  #[serde(default)]
  pub connect:            ConnectConfig,
}

/// Startup connection retry settings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectConfig {
  pub max_attempts:     u32,
  pub retry_delay_secs: u64,
}

impl Default for ConnectConfig {
  fn default() -> Self {
    Self {
      max_attempts:     DEFAULT_MAX_ATTEMPTS,
      retry_delay_secs: DEFAULT_RETRY_DELAY.as_secs(),
    }
  }
}

impl From<ConnectConfig> for RetryPolicy {
  fn from(c: ConnectConfig) -> Self {
    RetryPolicy {
      max_attempts: c.max_attempts,
      delay:        Duration::from_secs(c.retry_delay_secs),
    }
  }
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_store_uri() -> String { "sqlite://reviews.db".to_owned() }

fn default_allowed_origins() -> Vec<String> {
  vec![
    "http://localhost:3000".to_owned(),
    "http://localhost:5173".to_owned(),
  ]
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_uri:          default_store_uri(),
      allowed_origins:    default_allowed_origins(),
      list_approved_only: false,
      connect:            ConnectConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Load configuration from `path` (optional) and the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(path, std::env::var("PORT").ok())
  }

  fn from_sources(path: &Path, port: Option<String>) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(
        Environment::with_prefix("REVIEWS")
          .prefix_separator("_")
          .separator("__")
          .list_separator(",")
          .with_list_parse_key("allowed_origins")
          .try_parsing(true),
      )
      .set_override_option("port", port)?
      .build()?
      .try_deserialize()
  }

  pub fn retry_policy(&self) -> RetryPolicy { self.connect.into() }
}
