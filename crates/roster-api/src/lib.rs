//! JSON REST API for the Roster student directory.
//!
//! Exposes an axum [`Router`] backed by any
//! [`roster_core::store::DirectoryStore`]. Every student view leaving this
//! crate has passed through the privacy resolver and field filter for the
//! requesting viewer. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod privacy;
pub mod reference;
pub mod students;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use roster_core::{defaults::PrivacyOptions, store::DirectoryStore};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// API behaviour knobs, deserialised as part of the server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Lifetime of a bearer session issued at login or registration.
  pub session_ttl_secs: u64,
  pub privacy:          PrivacyOptions,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self { session_ttl_secs: 7 * 24 * 60 * 60, privacy: PrivacyOptions::default() }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

impl<S> ApiState<S> {
  pub fn new(store: S, config: ApiConfig) -> Self {
    Self { store: Arc::new(store), config: Arc::new(config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: DirectoryStore + Clone + 'static,
{
  Router::new()
    // Identity
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/me", get(auth::me::<S>))
    // Directory
    .route("/students", get(students::list::<S>))
    .route("/students/search", post(students::search::<S>))
    .route(
      "/students/{id}",
      get(students::get_one::<S>)
        .put(students::update::<S>)
        .delete(students::delete_one::<S>),
    )
    // Own profile and privacy
    .route("/profile", get(privacy::profile::<S>))
    .route(
      "/privacy-settings",
      get(privacy::get_own::<S>).put(privacy::put_many::<S>),
    )
    .route("/privacy-settings/{field}", put(privacy::put_one::<S>))
    .route("/privacy-settings/student/{id}", get(privacy::by_student::<S>))
    // Staff
    .route(
      "/staff",
      get(reference::list_staff::<S>).post(reference::create_staff::<S>),
    )
    .route(
      "/staff/{id}",
      get(reference::get_staff::<S>)
        .put(reference::update_staff::<S>)
        .delete(reference::delete_staff::<S>),
    )
    // Campuses, departments, courses, majors
    .route(
      "/{kind}",
      get(reference::list::<S>).post(reference::create::<S>),
    )
    .route(
      "/{kind}/{id}",
      get(reference::get_one::<S>)
        .put(reference::update::<S>)
        .delete(reference::delete_one::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
