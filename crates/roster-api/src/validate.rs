//! Checks that ids supplied by clients point at existing reference items.

use roster_core::{
  reference::{NewReference, NewStaff, ReferenceKind},
  store::DirectoryStore,
  student::{StudentProfile, StudentUpdate},
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `BadRequest` unless `id` is `None` or names an item of `kind`.
pub async fn reference<S>(
  state: &ApiState<S>,
  kind: ReferenceKind,
  id: Option<Uuid>,
) -> Result<(), ApiError>
where
  S: DirectoryStore,
{
  let Some(id) = id else { return Ok(()) };
  state
    .store
    .get_reference(kind, id)
    .await
    .map_err(ApiError::fetch)?
    .map(|_| ())
    .ok_or_else(|| ApiError::BadRequest(format!("unknown {} {id}", kind.as_str())))
}

async fn placement<S>(
  state: &ApiState<S>,
  campus: Option<Uuid>,
  course: Option<Uuid>,
  major: Option<Uuid>,
  department: Option<Uuid>,
) -> Result<(), ApiError>
where
  S: DirectoryStore,
{
  reference(state, ReferenceKind::Campus, campus).await?;
  reference(state, ReferenceKind::Course, course).await?;
  reference(state, ReferenceKind::Major, major).await?;
  reference(state, ReferenceKind::Department, department).await
}

pub async fn profile_references<S>(
  state: &ApiState<S>,
  p: &StudentProfile,
) -> Result<(), ApiError>
where
  S: DirectoryStore,
{
  placement(state, p.campus_id, p.course_id, p.major_id, p.department_id).await
}

pub async fn update_references<S>(
  state: &ApiState<S>,
  u: &StudentUpdate,
) -> Result<(), ApiError>
where
  S: DirectoryStore,
{
  placement(state, u.campus_id, u.course_id, u.major_id, u.department_id).await
}

pub async fn staff_references<S>(state: &ApiState<S>, s: &NewStaff) -> Result<(), ApiError>
where
  S: DirectoryStore,
{
  if s.full_name.trim().is_empty() {
    return Err(ApiError::BadRequest("full_name is required".into()));
  }
  reference(state, ReferenceKind::Department, s.department_id).await?;
  reference(state, ReferenceKind::Campus, s.campus_id).await
}

/// A reference item needs a name, and may only point at an item of its
/// parent kind.
pub async fn new_reference<S>(
  state: &ApiState<S>,
  kind: ReferenceKind,
  input: &NewReference,
) -> Result<(), ApiError>
where
  S: DirectoryStore,
{
  if input.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name is required".into()));
  }
  match (kind.parent_kind(), input.parent_id) {
    (_, None) => Ok(()),
    (None, Some(_)) => Err(ApiError::BadRequest(format!(
      "a {} has no parent",
      kind.as_str()
    ))),
    (Some(parent), id) => reference(state, parent, id).await,
  }
}
