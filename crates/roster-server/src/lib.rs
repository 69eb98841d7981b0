//! HTTP server assembly for the Roster directory.
//!
//! Loads [`ServerConfig`], wires the SQLite store into the JSON API, and
//! wraps everything in request tracing.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::Router;
use roster_api::{ApiConfig, ApiState, api_router};
use roster_core::{defaults::PrivacyOptions, store::DirectoryStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `ROSTER_`-prefixed environment overrides.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  pub session_ttl_secs: u64,
  pub privacy:          PrivacyOptions,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8080,
      store_path:       PathBuf::from("~/.local/share/roster/roster.db"),
      session_ttl_secs: ApiConfig::default().session_ttl_secs,
      privacy:          PrivacyOptions::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (optional) layered under the environment, e.g.
  /// `ROSTER_PORT=9000` or `ROSTER_PRIVACY__DEFAULT_MODE=mask`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("ROSTER")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig { session_ttl_secs: self.session_ttl_secs, privacy: self.privacy }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API under `/api`, with every request traced.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: DirectoryStore + Clone + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
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
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use roster_core::filter::FilterMode;
  use roster_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/roster.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.privacy.default_mode, FilterMode::Redact);
    assert!(!cfg.privacy.photo_url_in_defaults);
  }

  #[test]
  fn file_values_are_read() {
    let dir = std::env::temp_dir().join(format!("roster-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(
      &path,
      "port = 9001\nstore_path = \"/tmp/r.db\"\n\n[privacy]\ndefault_mode = \"mask\"\nphoto_url_in_defaults = true\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9001);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/r.db"));
    assert_eq!(cfg.api_config().privacy.default_mode, FilterMode::Mask);
    assert!(cfg.privacy.photo_url_in_defaults);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let router = app(ApiState::new(store, ApiConfig::default()));

    let resp = router
      .clone()
      .oneshot(Request::get("/api/campuses").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router
      .oneshot(Request::get("/campuses").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
