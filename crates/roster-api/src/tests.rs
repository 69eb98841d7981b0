//! Router tests against an in-memory SQLite store.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use roster_core::{
  identity::{NewUser, Role},
  store::{DirectoryStore, IdentityStore, StudentStore},
  student::StudentProfile,
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiConfig, ApiState, api_router, auth::generate_token};

async fn make_state() -> ApiState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  ApiState::new(store, ApiConfig::default())
}

async fn send<S: DirectoryStore + Clone + 'static>(
  state: &ApiState<S>,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };

  let resp = api_router(state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, value)
}

/// Register a student over HTTP; returns (token, student id).
async fn register(state: &ApiState<SqliteStore>, email: &str, profile: Value) -> (String, String) {
  let mut body = json!({ "email": email, "password": "correct horse" });
  if let (Some(obj), Value::Object(extra)) = (body.as_object_mut(), profile) {
    obj.extend(extra);
  }
  let (status, resp) = send(state, "POST", "/auth/register", None, Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "{resp}");
  (
    resp["token"].as_str().unwrap().to_owned(),
    resp["student_id"].as_str().unwrap().to_owned(),
  )
}

/// An admin with a live session, created directly in the store.
async fn admin_token(state: &ApiState<SqliteStore>) -> String {
  let admin = state
    .store
    .create_user(NewUser {
      email:         "admin@example.edu".into(),
      password_hash: "unused".into(),
      role:          Role::Admin,
    })
    .await
    .unwrap()
    .unwrap();
  let (token, hash) = generate_token();
  state
    .store
    .create_session(hash, admin.id, Utc::now() + Duration::hours(1))
    .await
    .unwrap();
  token
}

fn jane() -> Value {
  json!({
    "name": "Jane Doe",
    "mobile": "555-0100",
    "personal_email": "jane@home.test",
  })
}

// ── Registration and sessions ────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_default_settings() {
  let state = make_state().await;
  let (token, _) = register(&state, "jane@example.edu", jane()).await;

  let (status, settings) = send(&state, "GET", "/privacy-settings", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  let rows = settings.as_array().unwrap();
  assert_eq!(rows.len(), 12);
  assert!(rows.iter().all(|r| r["is_private"] == json!(false)));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
  let state = make_state().await;
  register(&state, "jane@example.edu", jane()).await;

  let body = json!({ "email": "JANE@example.edu", "password": "whatever1", "name": "J" });
  let (status, _) = send(&state, "POST", "/auth/register", None, Some(body)).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_and_logout() {
  let state = make_state().await;
  register(&state, "jane@example.edu", jane()).await;

  let (status, _) = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": "jane@example.edu", "password": "wrong" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, session) = send(
    &state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "email": "jane@example.edu", "password": "correct horse" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(session["role"], "student");
  let token = session["token"].as_str().unwrap();

  let (status, me) = send(&state, "GET", "/auth/me", Some(token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["user"]["email"], "jane@example.edu");

  let (status, _) = send(&state, "POST", "/auth/logout", Some(token), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&state, "GET", "/auth/me", Some(token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oversized_session_lifetime_registers_nothing() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let state = ApiState::new(store, ApiConfig { session_ttl_secs: u64::MAX, ..Default::default() });

  let mut body = jane();
  body["email"] = json!("jane@example.edu");
  body["password"] = json!("correct horse");
  let (status, resp) = send(&state, "POST", "/auth/register", None, Some(body)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(resp["error"].is_string());
  assert!(state.store.user_by_email("jane@example.edu").await.unwrap().is_none());
}

#[tokio::test]
async fn anonymous_me_is_null() {
  let state = make_state().await;
  let (status, me) = send(&state, "GET", "/auth/me", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["user"], Value::Null);
}

// ── Directory views ──────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_listing_is_masked() {
  let state = make_state().await;
  let (token, _) = register(&state, "jane@example.edu", jane()).await;
  let (status, _) = send(
    &state,
    "PUT",
    "/privacy-settings/mobile",
    Some(&token),
    Some(json!({ "is_private": true })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, list) = send(&state, "GET", "/students?view=mask", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let jane = &list[0];
  assert_eq!(jane["name"], "Jane Doe");
  assert_eq!(jane["mobile"], "Hidden");
  assert_eq!(jane["personal_email"], "jane@home.test");

  // Redact is the default mode.
  let (_, list) = send(&state, "GET", "/students", None, None).await;
  assert!(list[0].get("mobile").is_none());
  assert_eq!(list[0]["name"], "Jane Doe");
}

#[tokio::test]
async fn admin_listing_is_unmasked() {
  let state = make_state().await;
  let (token, _) = register(&state, "jane@example.edu", jane()).await;
  send(
    &state,
    "PUT",
    "/privacy-settings/mobile",
    Some(&token),
    Some(json!({ "is_private": true })),
  )
  .await;
  let admin = admin_token(&state).await;

  let (status, list) = send(&state, "GET", "/students?view=mask", Some(&admin), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list[0]["mobile"], "555-0100");
}

#[tokio::test]
async fn owner_sees_own_record_in_full() {
  let state = make_state().await;
  let (token, id) = register(&state, "jane@example.edu", jane()).await;
  send(
    &state,
    "PUT",
    "/privacy-settings/mobile",
    Some(&token),
    Some(json!({ "is_private": true })),
  )
  .await;

  let uri = format!("/students/{id}?view=mask");
  let (_, own) = send(&state, "GET", &uri, Some(&token), None).await;
  assert_eq!(own["mobile"], "555-0100");

  let (_, anon) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(anon["mobile"], "Hidden");
}

#[tokio::test]
async fn students_without_rows_are_visible() {
  let state = make_state().await;
  let user = state
    .store
    .create_user(NewUser {
      email:         "old@example.edu".into(),
      password_hash: "unused".into(),
      role:          Role::Student,
    })
    .await
    .unwrap()
    .unwrap();
  state
    .store
    .create_student(user.id, StudentProfile {
      name: "Legacy Student".into(),
      mobile: Some("555-0199".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let (_, list) = send(&state, "GET", "/students?view=mask", None, None).await;
  assert_eq!(list[0]["mobile"], "555-0199");
}

#[tokio::test]
async fn search_never_matches_hidden_values() {
  let state = make_state().await;
  let (token, _) = register(&state, "jane@example.edu", jane()).await;
  send(
    &state,
    "PUT",
    "/privacy-settings/mobile",
    Some(&token),
    Some(json!({ "is_private": true })),
  )
  .await;
  let admin = admin_token(&state).await;

  let by_mobile = json!({ "term": "555" });
  let (status, hits) = send(&state, "POST", "/students/search", None, Some(by_mobile.clone())).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(hits.as_array().unwrap().len(), 0);

  let (_, hits) = send(&state, "POST", "/students/search", Some(&admin), Some(by_mobile)).await;
  assert_eq!(hits.as_array().unwrap().len(), 1);

  let (_, hits) =
    send(&state, "POST", "/students/search", None, Some(json!({ "term": "jane doe", "mode": "and" })))
      .await;
  assert_eq!(hits.as_array().unwrap().len(), 1);
}

// ── Privacy settings ─────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_round_trip() {
  let state = make_state().await;
  let (token, id) = register(&state, "jane@example.edu", jane()).await;

  for private in [true, false, true] {
    let (status, row) = send(
      &state,
      "PUT",
      "/privacy-settings/personal_email",
      Some(&token),
      Some(json!({ "is_private": private })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["is_private"], json!(private));
  }

  let (_, rows) = send(&state, "GET", "/privacy-settings", Some(&token), None).await;
  let rows = rows.as_array().unwrap();
  assert_eq!(rows.len(), 12);
  let email = rows.iter().find(|r| r["field_name"] == "personal_email").unwrap();
  assert_eq!(email["is_private"], json!(true));

  let (status, raw) =
    send(&state, "GET", &format!("/privacy-settings/student/{id}"), Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(raw.as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn bulk_update_applies_every_change() {
  let state = make_state().await;
  let (token, _) = register(&state, "jane@example.edu", jane()).await;

  let changes = json!([
    { "field_name": "mobile", "is_private": true },
    { "field_name": "student_hobbies", "is_private": true },
  ]);
  let (status, rows) = send(&state, "PUT", "/privacy-settings", Some(&token), Some(changes)).await;
  assert_eq!(status, StatusCode::OK);
  let rows = rows.as_array().unwrap();
  assert_eq!(rows.len(), 13);
  assert!(rows.iter().any(|r| r["field_name"] == "student_hobbies" && r["is_private"] == json!(true)));
}

#[tokio::test]
async fn unknown_field_is_bad_request() {
  let state = make_state().await;
  let (token, _) = register(&state, "jane@example.edu", jane()).await;

  let (status, _) = send(
    &state,
    "PUT",
    "/privacy-settings/shoe_size",
    Some(&token),
    Some(json!({ "is_private": true })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Access control ───────────────────────────────────────────────────────────

#[tokio::test]
async fn bad_token_is_unauthorized() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/students", Some("not-a-session"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_cannot_edit_or_delete_others() {
  let state = make_state().await;
  let (_, jane_id) = register(&state, "jane@example.edu", jane()).await;
  let (bob, _) = register(&state, "bob@example.edu", json!({ "name": "Bob" })).await;
  let uri = format!("/students/{jane_id}");

  let edit = json!({ "mobile": "000" });
  let (status, _) = send(&state, "PUT", &uri, None, Some(edit.clone())).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  let (status, _) = send(&state, "PUT", &uri, Some(&bob), Some(edit)).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, _) = send(&state, "DELETE", &uri, Some(&bob), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, _) =
    send(&state, "GET", &format!("/privacy-settings/student/{jane_id}"), Some(&bob), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let admin = admin_token(&state).await;
  let (status, _) = send(&state, "DELETE", &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_update_ignores_alumnus_flag() {
  let state = make_state().await;
  let (token, id) = register(&state, "jane@example.edu", jane()).await;

  let (status, updated) = send(
    &state,
    "PUT",
    &format!("/students/{id}"),
    Some(&token),
    Some(json!({ "present_address": "12 Elm St", "is_alumnus": true })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["present_address"], "12 Elm St");
  assert_eq!(updated["is_alumnus"], json!(false));
}

// ── Reference data ───────────────────────────────────────────────────────────

#[tokio::test]
async fn reference_writes_are_admin_only() {
  let state = make_state().await;
  let (student, _) = register(&state, "jane@example.edu", jane()).await;
  let admin = admin_token(&state).await;
  let campus = json!({ "name": "North" });

  let (status, _) = send(&state, "POST", "/campuses", Some(&student), Some(campus.clone())).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, created) = send(&state, "POST", "/campuses", Some(&admin), Some(campus)).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, list) = send(&state, "GET", "/campuses", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list[0]["name"], "North");

  let (status, _) = send(&state, "GET", "/planets", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  // A department may hang off a campus; a campus may not have a parent.
  let dept = json!({ "name": "Physics", "parent_id": created["id"] });
  let (status, _) = send(&state, "POST", "/departments", Some(&admin), Some(dept)).await;
  assert_eq!(status, StatusCode::CREATED);
  let orphan = json!({ "name": "South", "parent_id": created["id"] });
  let (status, _) = send(&state, "POST", "/campuses", Some(&admin), Some(orphan)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_rejects_unknown_reference_ids() {
  let state = make_state().await;
  let body = json!({
    "email": "jane@example.edu",
    "password": "correct horse",
    "name": "Jane Doe",
    "campus_id": "00000000-0000-0000-0000-000000000001",
  });
  let (status, _) = send(&state, "POST", "/auth/register", None, Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_are_admin_only() {
  let state = make_state().await;
  let (student, _) = register(&state, "jane@example.edu", jane()).await;
  let admin = admin_token(&state).await;

  let (status, _) = send(&state, "GET", "/staff", Some(&student), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, staff) = send(
    &state,
    "POST",
    "/staff",
    Some(&admin),
    Some(json!({ "full_name": "Dr. Grey", "designation": "Lecturer" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(staff["user_id"].is_null());

  let (_, list) = send(&state, "GET", "/staff", Some(&admin), None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
}

// ── Degraded settings ────────────────────────────────────────────────────────

mod unavailable_settings {
  use chrono::{DateTime, Utc};
  use roster_core::{
    field::PrivacyField,
    identity::{NewUser, User, UserCredentials, UserId},
    reference::{NewReference, NewStaff, ReferenceItem, ReferenceKind, Staff},
    setting::PrivacySetting,
    store::{IdentityStore, PrivacyStore, ReferenceStore, Store, StudentStore},
    student::{StudentFilter, StudentProfile, StudentRecord, StudentUpdate},
  };
  use roster_store_sqlite::{Error, SqliteStore};
  use uuid::Uuid;

  use super::*;

  /// A SQLite store whose settings lookup fails for one user.
  #[derive(Clone)]
  struct FailingSettings {
    inner:  SqliteStore,
    broken: UserId,
  }

  impl Store for FailingSettings {
    type Error = Error;
  }

  impl PrivacyStore for FailingSettings {
    async fn settings_by_user(&self, user_id: UserId) -> Result<Vec<PrivacySetting>, Error> {
      if user_id == self.broken {
        return Err(roster_core::Error::FetchFailed("settings table unreachable".into()).into());
      }
      self.inner.settings_by_user(user_id).await
    }

    async fn settings_by_student(&self, student_id: Uuid) -> Result<Vec<PrivacySetting>, Error> {
      self.inner.settings_by_student(student_id).await
    }

    async fn upsert_setting(
      &self,
      user_id: UserId,
      field: PrivacyField,
      is_private: bool,
    ) -> Result<PrivacySetting, Error> {
      self.inner.upsert_setting(user_id, field, is_private).await
    }

    async fn upsert_settings(
      &self,
      user_id: UserId,
      changes: Vec<(PrivacyField, bool)>,
    ) -> Result<(), Error> {
      self.inner.upsert_settings(user_id, changes).await
    }

    async fn batch_insert_settings(&self, rows: Vec<PrivacySetting>) -> Result<(), Error> {
      self.inner.batch_insert_settings(rows).await
    }
  }

  impl IdentityStore for FailingSettings {
    async fn create_user(&self, input: NewUser) -> Result<Option<User>, Error> {
      self.inner.create_user(input).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, Error> {
      self.inner.get_user(id).await
    }

    async fn user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<UserCredentials>, Error> {
      self.inner.user_by_email(email).await
    }

    async fn create_session(
      &self,
      token_hash: String,
      user_id: UserId,
      expires_at: DateTime<Utc>,
    ) -> Result<(), Error> {
      self.inner.create_session(token_hash, user_id, expires_at).await
    }

    async fn session_user(
      &self,
      token_hash: String,
      now: DateTime<Utc>,
    ) -> Result<Option<User>, Error> {
      self.inner.session_user(token_hash, now).await
    }

    async fn delete_session(&self, token_hash: String) -> Result<(), Error> {
      self.inner.delete_session(token_hash).await
    }
  }

  impl StudentStore for FailingSettings {
    async fn create_student(
      &self,
      user_id: UserId,
      profile: StudentProfile,
    ) -> Result<StudentRecord, Error> {
      self.inner.create_student(user_id, profile).await
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<StudentRecord>, Error> {
      self.inner.get_student(id).await
    }

    async fn student_by_user(&self, user_id: UserId) -> Result<Option<StudentRecord>, Error> {
      self.inner.student_by_user(user_id).await
    }

    async fn update_student(
      &self,
      id: Uuid,
      update: StudentUpdate,
    ) -> Result<Option<StudentRecord>, Error> {
      self.inner.update_student(id, update).await
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, Error> {
      self.inner.delete_student(id).await
    }

    async fn list_students<'a>(
      &'a self,
      filter: &'a StudentFilter,
    ) -> Result<Vec<StudentRecord>, Error> {
      self.inner.list_students(filter).await
    }
  }

  impl ReferenceStore for FailingSettings {
    async fn create_reference(
      &self,
      kind: ReferenceKind,
      input: NewReference,
    ) -> Result<ReferenceItem, Error> {
      self.inner.create_reference(kind, input).await
    }

    async fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>, Error> {
      self.inner.list_references(kind).await
    }

    async fn get_reference(
      &self,
      kind: ReferenceKind,
      id: Uuid,
    ) -> Result<Option<ReferenceItem>, Error> {
      self.inner.get_reference(kind, id).await
    }

    async fn update_reference(
      &self,
      kind: ReferenceKind,
      id: Uuid,
      input: NewReference,
    ) -> Result<Option<ReferenceItem>, Error> {
      self.inner.update_reference(kind, id, input).await
    }

    async fn delete_reference(&self, kind: ReferenceKind, id: Uuid) -> Result<bool, Error> {
      self.inner.delete_reference(kind, id).await
    }

    async fn create_staff(&self, input: NewStaff) -> Result<Staff, Error> {
      self.inner.create_staff(input).await
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, Error> {
      self.inner.list_staff().await
    }

    async fn get_staff(&self, id: Uuid) -> Result<Option<Staff>, Error> {
      self.inner.get_staff(id).await
    }

    async fn update_staff(&self, id: Uuid, input: NewStaff) -> Result<Option<Staff>, Error> {
      self.inner.update_staff(id, input).await
    }

    async fn delete_staff(&self, id: Uuid) -> Result<bool, Error> {
      self.inner.delete_staff(id).await
    }
  }

  #[tokio::test]
  async fn failed_settings_hide_only_that_student() {
    let state = make_state().await;
    let (_, jane_id) = register(&state, "jane@example.edu", jane()).await;
    register(&state, "john@example.edu", json!({ "name": "John Smith", "mobile": "555-0111" }))
      .await;

    let jane_record = state
      .store
      .get_student(jane_id.parse().unwrap())
      .await
      .unwrap()
      .unwrap();
    let flaky = ApiState::new(
      FailingSettings { inner: (*state.store).clone(), broken: jane_record.user_id },
      ApiConfig::default(),
    );

    let (status, list) = send(&flaky, "GET", "/students?view=mask", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);

    let jane = list.iter().find(|s| s["id"] == json!(jane_id)).unwrap();
    assert_eq!(jane["name"], "Hidden");
    assert_eq!(jane["mobile"], "Hidden");
    assert_eq!(jane["personal_email"], "Hidden");
    assert_eq!(jane["user_id"], serde_json::to_value(jane_record.user_id).unwrap());

    let john = list.iter().find(|s| s["id"] != json!(jane_id)).unwrap();
    assert_eq!(john["name"], "John Smith");
    assert_eq!(john["mobile"], "555-0111");
  }
}
