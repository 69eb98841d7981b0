//! Handlers for `/students` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/students` | Structured filters, `?view=mask\|redact`; one filtered view per student |
//! | `GET`    | `/students/{id}` | Filtered detail view |
//! | `POST`   | `/students/search` | Body: [`SearchBody`]; text matched against visible fields only |
//! | `PUT`    | `/students/{id}` | Owner or admin |
//! | `DELETE` | `/students/{id}` | Admin |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use roster_core::{
  filter::{FilterMode, ViewRecord, filter_for_viewer},
  identity::{UserId, Viewer},
  resolve::{VisibilityDecision, decide},
  search::{SearchMode, TextQuery},
  setting::SettingsState,
  store::DirectoryStore,
  student::{StudentFilter, StudentRecord, StudentUpdate},
};
use serde::Deserialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{
  ApiState,
  auth::{CurrentUser, OptionalUser},
  error::ApiError,
  validate,
};

// ─── Privacy plumbing ────────────────────────────────────────────────────────

/// Whether `viewer` needs the target's settings at all. Admins and owners
/// see everything regardless.
fn needs_settings(viewer: Option<&Viewer>, target: UserId) -> bool {
  !viewer.is_some_and(|v| v.is_admin() || v.id == target)
}

/// Fetch the settings of every target concurrently, one task per student.
///
/// A failed fetch leaves that student `NotLoaded`, which hides every field
/// from non-admin viewers; the page itself still renders.
pub(crate) async fn load_states<S>(
  store: &Arc<S>,
  viewer: Option<&Viewer>,
  targets: &[UserId],
) -> Vec<SettingsState>
where
  S: DirectoryStore + 'static,
{
  let mut states = vec![SettingsState::NotLoaded; targets.len()];
  let mut tasks = JoinSet::new();

  for (idx, &user_id) in targets.iter().enumerate() {
    if !needs_settings(viewer, user_id) {
      continue;
    }
    let store = Arc::clone(store);
    tasks.spawn(async move { (idx, user_id, store.settings_by_user(user_id).await) });
  }

  while let Some(joined) = tasks.join_next().await {
    match joined {
      Ok((idx, _, Ok(rows))) => states[idx] = SettingsState::loaded(rows),
      Ok((_, user_id, Err(e))) => {
        tracing::warn!(%user_id, "privacy settings unavailable, hiding fields: {e}");
      }
      Err(e) => tracing::warn!("privacy settings task failed: {e}"),
    }
  }
  states
}

async fn load_state<S>(
  store: &Arc<S>,
  viewer: Option<&Viewer>,
  target: UserId,
) -> SettingsState
where
  S: DirectoryStore + 'static,
{
  load_states(store, viewer, &[target])
    .await
    .pop()
    .unwrap_or(SettingsState::NotLoaded)
}

/// Decisions for each record, in order.
async fn decisions_for<S>(
  store: &Arc<S>,
  viewer: Option<&Viewer>,
  records: &[StudentRecord],
) -> Vec<VisibilityDecision>
where
  S: DirectoryStore + 'static,
{
  let targets: Vec<UserId> = records.iter().map(|r| r.user_id).collect();
  let states = load_states(store, viewer, &targets).await;
  targets
    .iter()
    .zip(&states)
    .map(|(target, state)| decide(viewer, *target, state))
    .collect()
}

fn project(
  records: &[StudentRecord],
  decisions: &[VisibilityDecision],
  mode: FilterMode,
) -> Result<Vec<ViewRecord>, ApiError> {
  records
    .iter()
    .zip(decisions)
    .map(|(r, d)| Ok(filter_for_viewer(r, d, mode)?))
    .collect()
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub campus_id:         Option<Uuid>,
  pub course_id:         Option<Uuid>,
  pub major_id:          Option<Uuid>,
  pub department_id:     Option<Uuid>,
  pub year_of_admission: Option<i32>,
  /// Honoured for admins only.
  #[serde(default)]
  pub include_alumni:    bool,
  pub limit:             Option<usize>,
  pub offset:            Option<usize>,
  /// Overrides the configured filter mode.
  pub view:              Option<FilterMode>,
}

impl ListParams {
  fn filter(&self, viewer: Option<&Viewer>) -> StudentFilter {
    StudentFilter {
      campus_id:         self.campus_id,
      course_id:         self.course_id,
      major_id:          self.major_id,
      department_id:     self.department_id,
      year_of_admission: self.year_of_admission,
      include_alumni:    self.include_alumni && viewer.is_some_and(Viewer::is_admin),
      limit:             self.limit,
      offset:            self.offset,
    }
  }
}

/// `GET /students[?campus_id=..][&view=mask][&limit=..][&offset=..]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  user: OptionalUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ViewRecord>>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let viewer = user.viewer();
  let records = state
    .store
    .list_students(&params.filter(viewer.as_ref()))
    .await
    .map_err(ApiError::fetch)?;

  let decisions = decisions_for(&state.store, viewer.as_ref(), &records).await;
  let mode = params.view.unwrap_or(state.config.privacy.default_mode);
  Ok(Json(project(&records, &decisions, mode)?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ViewParams {
  pub view: Option<FilterMode>,
}

/// `GET /students/{id}[?view=mask]`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  user: OptionalUser,
  Path(id): Path<Uuid>,
  Query(params): Query<ViewParams>,
) -> Result<Json<ViewRecord>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let viewer = user.viewer();
  let record = fetch_student(&state, id).await?;

  let settings = load_state(&state.store, viewer.as_ref(), record.user_id).await;
  let decision = decide(viewer.as_ref(), record.user_id, &settings);
  let mode = params.view.unwrap_or(state.config.privacy.default_mode);
  Ok(Json(filter_for_viewer(&record, &decision, mode)?))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SearchBody {
  pub term:              String,
  pub mode:              SearchMode,
  pub campus_id:         Option<Uuid>,
  pub course_id:         Option<Uuid>,
  pub major_id:          Option<Uuid>,
  pub department_id:     Option<Uuid>,
  pub year_of_admission: Option<i32>,
  pub include_alumni:    bool,
  pub limit:             Option<usize>,
  pub offset:            Option<usize>,
  pub view:              Option<FilterMode>,
}

/// `POST /students/search`
///
/// Structured filters narrow the candidates in the store; the text term is
/// then matched per candidate against only the fields that candidate's
/// settings let this viewer see. Pagination applies to the matches.
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  user: OptionalUser,
  Json(body): Json<SearchBody>,
) -> Result<Json<Vec<ViewRecord>>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let viewer = user.viewer();
  let filter = StudentFilter {
    campus_id:         body.campus_id,
    course_id:         body.course_id,
    major_id:          body.major_id,
    department_id:     body.department_id,
    year_of_admission: body.year_of_admission,
    include_alumni:    body.include_alumni && viewer.is_some_and(|v| v.is_admin()),
    limit:             None,
    offset:            None,
  };
  let candidates = state
    .store
    .list_students(&filter)
    .await
    .map_err(ApiError::fetch)?;
  let decisions = decisions_for(&state.store, viewer.as_ref(), &candidates).await;

  let query = TextQuery { term: body.term, mode: body.mode };
  let (records, decisions): (Vec<StudentRecord>, Vec<VisibilityDecision>) = candidates
    .into_iter()
    .zip(decisions)
    .filter(|(r, d)| query.matches(r, d))
    .skip(body.offset.unwrap_or(0))
    .take(body.limit.unwrap_or(usize::MAX))
    .unzip();

  tracing::debug!(matches = records.len(), mode = ?query.mode, "student search");
  let mode = body.view.unwrap_or(state.config.privacy.default_mode);
  Ok(Json(project(&records, &decisions, mode)?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /students/{id}`: the owner may edit their own record; admins may
/// edit any, and are the only ones who can change `is_alumnus`.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(mut body): Json<StudentUpdate>,
) -> Result<Json<StudentRecord>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let viewer = user.viewer();
  let record = fetch_student(&state, id).await?;
  if !viewer.is_admin() && viewer.id != record.user_id {
    return Err(ApiError::Forbidden);
  }
  if !viewer.is_admin() {
    body.is_alumnus = None;
  }
  if body.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
    return Err(ApiError::BadRequest("name cannot be empty".into()));
  }
  validate::update_references(&state, &body).await?;

  let updated = state
    .store
    .update_student(id, body)
    .await
    .map_err(ApiError::write)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /students/{id}`: admin only.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  user.require_admin()?;
  let deleted = state.store.delete_student(id).await.map_err(ApiError::write)?;
  if !deleted {
    return Err(not_found(id));
  }
  tracing::info!(student_id = %id, "student deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

pub(crate) async fn fetch_student<S>(
  state: &ApiState<S>,
  id: Uuid,
) -> Result<StudentRecord, ApiError>
where
  S: DirectoryStore,
{
  state
    .store
    .get_student(id)
    .await
    .map_err(ApiError::fetch)?
    .ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("student {id} not found")) }

#[cfg(test)]
mod tests {
  use roster_core::identity::Role;

  use super::*;

  #[test]
  fn admins_and_owners_skip_the_settings_fetch() {
    let admin = Viewer { id: UserId(1), role: Role::Admin };
    let owner = Viewer { id: UserId(2), role: Role::Student };
    let other = Viewer { id: UserId(3), role: Role::Student };

    assert!(!needs_settings(Some(&admin), UserId(2)));
    assert!(!needs_settings(Some(&owner), UserId(2)));
    assert!(needs_settings(Some(&other), UserId(2)));
    assert!(needs_settings(None, UserId(2)));
  }

  #[test]
  fn alumni_filter_is_admin_only() {
    let params = ListParams { include_alumni: true, ..Default::default() };
    let admin = Viewer { id: UserId(1), role: Role::Admin };
    let student = Viewer { id: UserId(2), role: Role::Student };

    assert!(params.filter(Some(&admin)).include_alumni);
    assert!(!params.filter(Some(&student)).include_alumni);
    assert!(!params.filter(None).include_alumni);
  }
}
