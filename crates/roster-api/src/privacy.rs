//! Handlers for the signed-in student's own profile and privacy settings.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/profile` | Own student record, unfiltered |
//! | `GET` | `/privacy-settings` | Own settings; creates the defaults on first access |
//! | `PUT` | `/privacy-settings/{field}` | Body: `{"is_private":true}` |
//! | `PUT` | `/privacy-settings` | Body: `[{"field_name":"mobile","is_private":true}, ..]` |
//! | `GET` | `/privacy-settings/student/{id}` | Admin or owner; stored rows as-is |

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{
  defaults::ensure_defaults,
  field::PrivacyField,
  setting::{PrivacySetting, PrivacySettings},
  store::DirectoryStore,
  student::StudentRecord,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, auth::CurrentUser, error::ApiError, students::fetch_student};

/// Privacy settings belong to students; admins have none of their own.
fn require_student(user: &CurrentUser) -> Result<(), ApiError> {
  if user.viewer().is_admin() { Err(ApiError::Forbidden) } else { Ok(()) }
}

// ─── Profile ──────────────────────────────────────────────────────────────────

/// `GET /profile`
pub async fn profile<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
) -> Result<Json<StudentRecord>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let record = state
    .store
    .student_by_user(user.0.id)
    .await
    .map_err(ApiError::fetch)?
    .ok_or_else(|| ApiError::NotFound("no student profile for this account".into()))?;
  Ok(Json(record))
}

// ─── Own settings ─────────────────────────────────────────────────────────────

/// `GET /privacy-settings`
pub async fn get_own<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
) -> Result<Json<PrivacySettings>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  require_student(&user)?;
  let user_id = user.0.id;

  let existing = state
    .store
    .settings_by_user(user_id)
    .await
    .map_err(ApiError::fetch)?;
  let settings =
    ensure_defaults(&*state.store, user_id, existing, &state.config.privacy).await?;
  Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
  pub is_private: bool,
}

/// `PUT /privacy-settings/{field}`
pub async fn put_one<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(field): Path<String>,
  Json(body): Json<ToggleBody>,
) -> Result<Json<PrivacySetting>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  require_student(&user)?;
  let field = PrivacyField::parse(&field)?;

  let setting = state
    .store
    .upsert_setting(user.0.id, field, body.is_private)
    .await
    .map_err(ApiError::write)?;

  tracing::debug!(user_id = %user.0.id, %field, is_private = body.is_private, "privacy toggled");
  Ok(Json(setting))
}

#[derive(Debug, Deserialize)]
pub struct SettingChange {
  pub field_name: PrivacyField,
  pub is_private: bool,
}

/// `PUT /privacy-settings`: applies all changes atomically, then returns the
/// full stored set.
pub async fn put_many<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Json(changes): Json<Vec<SettingChange>>,
) -> Result<Json<PrivacySettings>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  require_student(&user)?;
  let user_id = user.0.id;

  let changes = changes
    .into_iter()
    .map(|c| (c.field_name, c.is_private))
    .collect();
  state
    .store
    .upsert_settings(user_id, changes)
    .await
    .map_err(ApiError::write)?;

  let rows = state
    .store
    .settings_by_user(user_id)
    .await
    .map_err(ApiError::fetch)?;
  Ok(Json(PrivacySettings::from_rows(rows)))
}

// ─── By student ───────────────────────────────────────────────────────────────

/// `GET /privacy-settings/student/{id}`
pub async fn by_student<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<PrivacySetting>>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let viewer = user.viewer();
  let record = fetch_student(&state, id).await?;
  if !viewer.is_admin() && viewer.id != record.user_id {
    return Err(ApiError::Forbidden);
  }

  let rows = state
    .store
    .settings_by_student(id)
    .await
    .map_err(ApiError::fetch)?;
  Ok(Json(rows))
}
