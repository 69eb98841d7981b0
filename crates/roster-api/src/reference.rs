//! Handlers for reference data: `/campuses`, `/departments`, `/courses`,
//! `/majors`, and `/staff`.
//!
//! Reference items are public to read; every write is admin-only. Staff
//! records are admin-only throughout.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  reference::{NewReference, NewStaff, ReferenceItem, ReferenceKind, Staff},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::{ApiState, auth::CurrentUser, error::ApiError, validate};

fn kind_of(segment: &str) -> Result<ReferenceKind, ApiError> {
  ReferenceKind::from_plural(segment).map_err(|_| ApiError::NotFound(format!("no such collection: {segment}")))
}

fn item_not_found(kind: ReferenceKind, id: Uuid) -> ApiError {
  ApiError::NotFound(format!("{} {id} not found", kind.as_str()))
}

// ─── Reference items ──────────────────────────────────────────────────────────

/// `GET /{kind}`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(kind): Path<String>,
) -> Result<Json<Vec<ReferenceItem>>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let kind = kind_of(&kind)?;
  let items = state
    .store
    .list_references(kind)
    .await
    .map_err(ApiError::fetch)?;
  Ok(Json(items))
}

/// `POST /{kind}`: admin only.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(kind): Path<String>,
  Json(body): Json<NewReference>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let kind = kind_of(&kind)?;
  user.require_admin()?;
  validate::new_reference(&state, kind, &body).await?;

  let item = state
    .store
    .create_reference(kind, body)
    .await
    .map_err(ApiError::write)?;
  tracing::info!(kind = kind.as_str(), id = %item.id, "reference item created");
  Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /{kind}/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<ReferenceItem>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let kind = kind_of(&kind)?;
  let item = state
    .store
    .get_reference(kind, id)
    .await
    .map_err(ApiError::fetch)?
    .ok_or_else(|| item_not_found(kind, id))?;
  Ok(Json(item))
}

/// `PUT /{kind}/{id}`: admin only; replaces name, description and parent.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path((kind, id)): Path<(String, Uuid)>,
  Json(body): Json<NewReference>,
) -> Result<Json<ReferenceItem>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let kind = kind_of(&kind)?;
  user.require_admin()?;
  if body.parent_id == Some(id) {
    return Err(ApiError::BadRequest("an item cannot be its own parent".into()));
  }
  validate::new_reference(&state, kind, &body).await?;

  let item = state
    .store
    .update_reference(kind, id, body)
    .await
    .map_err(ApiError::write)?
    .ok_or_else(|| item_not_found(kind, id))?;
  Ok(Json(item))
}

/// `DELETE /{kind}/{id}`: admin only. Students and children pointing at
/// the item keep their rows with the link cleared.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path((kind, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let kind = kind_of(&kind)?;
  user.require_admin()?;
  if !state
    .store
    .delete_reference(kind, id)
    .await
    .map_err(ApiError::write)?
  {
    return Err(item_not_found(kind, id));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Staff ────────────────────────────────────────────────────────────────────

fn staff_not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("staff {id} not found")) }

/// `GET /staff`
pub async fn list_staff<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
) -> Result<Json<Vec<Staff>>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  user.require_admin()?;
  Ok(Json(state.store.list_staff().await.map_err(ApiError::fetch)?))
}

/// `POST /staff`
pub async fn create_staff<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Json(body): Json<NewStaff>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  user.require_admin()?;
  validate::staff_references(&state, &body).await?;
  let staff = state.store.create_staff(body).await.map_err(ApiError::write)?;
  Ok((StatusCode::CREATED, Json(staff)))
}

/// `GET /staff/{id}`
pub async fn get_staff<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Staff>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  user.require_admin()?;
  let staff = state
    .store
    .get_staff(id)
    .await
    .map_err(ApiError::fetch)?
    .ok_or_else(|| staff_not_found(id))?;
  Ok(Json(staff))
}

/// `PUT /staff/{id}`
pub async fn update_staff<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<NewStaff>,
) -> Result<Json<Staff>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  user.require_admin()?;
  validate::staff_references(&state, &body).await?;
  let staff = state
    .store
    .update_staff(id, body)
    .await
    .map_err(ApiError::write)?
    .ok_or_else(|| staff_not_found(id))?;
  Ok(Json(staff))
}

/// `DELETE /staff/{id}`
pub async fn delete_staff<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  user.require_admin()?;
  if !state.store.delete_staff(id).await.map_err(ApiError::write)? {
    return Err(staff_not_found(id));
  }
  Ok(StatusCode::NO_CONTENT)
}
