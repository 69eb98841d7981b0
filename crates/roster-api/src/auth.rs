//! Viewer identity: password hashing, session tokens, request extractors,
//! and the `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Student sign-up; returns a session token |
//! | `POST` | `/auth/login` | `{"email":..,"password":..}`; returns a session token |
//! | `POST` | `/auth/logout` | Bearer only; ends the session |
//! | `GET`  | `/auth/me` | The current user, or `null` when anonymous |
//!
//! Every request may carry `Authorization: Bearer <token>` or
//! `Authorization: Basic <email:password>`. No header means an anonymous
//! viewer; a header that does not authenticate is rejected with 401.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, TimeDelta, Utc};
use rand_core::{OsRng, RngCore};
use roster_core::{
  defaults::ensure_defaults,
  identity::{NewUser, Role, User, UserId, Viewer},
  store::DirectoryStore,
  student::StudentProfile,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, validate};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// ─── Passwords and tokens ────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// `false` for a wrong password and for a malformed stored hash alike.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// A fresh random bearer token (hex) and the hash it is stored under.
pub fn generate_token() -> (String, String) {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  let token = hex::encode(bytes);
  let hash = hash_token(&token);
  (token, hash)
}

/// SHA-256 of a bearer token, hex-encoded. Only this is persisted.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

// ─── Credentials in headers ──────────────────────────────────────────────────

enum Credentials {
  Bearer(String),
  Basic { email: String, password: String },
}

/// `Ok(None)` when there is no `Authorization` header at all.
fn credentials(headers: &HeaderMap) -> Result<Option<Credentials>, ApiError> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let value = value.to_str().map_err(|_| ApiError::Unauthorized)?;

  if let Some(token) = value.strip_prefix("Bearer ") {
    return Ok(Some(Credentials::Bearer(token.trim().to_owned())));
  }

  let encoded = value.strip_prefix("Basic ").ok_or(ApiError::Unauthorized)?;
  let decoded = B64.decode(encoded.trim()).map_err(|_| ApiError::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  Ok(Some(Credentials::Basic {
    email:    email.to_owned(),
    password: password.to_owned(),
  }))
}

async fn authenticate<S>(state: &ApiState<S>, creds: Credentials) -> Result<User, ApiError>
where
  S: DirectoryStore,
{
  match creds {
    Credentials::Bearer(token) => state
      .store
      .session_user(hash_token(&token), Utc::now())
      .await
      .map_err(ApiError::fetch)?
      .ok_or(ApiError::Unauthorized),
    Credentials::Basic { email, password } => {
      let found = state
        .store
        .user_by_email(&email)
        .await
        .map_err(ApiError::fetch)?
        .ok_or(ApiError::Unauthorized)?;
      if !verify_password(&password, &found.password_hash) {
        return Err(ApiError::Unauthorized);
      }
      Ok(found.user)
    }
  }
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The requesting user, or `None` for an anonymous request.
pub struct OptionalUser(pub Option<User>);

impl OptionalUser {
  pub fn viewer(&self) -> Option<Viewer> { self.0.as_ref().map(User::viewer) }
}

impl<S> FromRequestParts<ApiState<S>> for OptionalUser
where
  S: DirectoryStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    match credentials(&parts.headers)? {
      None => Ok(OptionalUser(None)),
      Some(creds) => Ok(OptionalUser(Some(authenticate(state, creds).await?))),
    }
  }
}

/// An authenticated user; anonymous requests are rejected with 401.
pub struct CurrentUser(pub User);

impl CurrentUser {
  pub fn viewer(&self) -> Viewer { self.0.viewer() }

  pub fn require_admin(&self) -> Result<(), ApiError> {
    if self.0.role == Role::Admin { Ok(()) } else { Err(ApiError::Forbidden) }
  }
}

impl<S> FromRequestParts<ApiState<S>> for CurrentUser
where
  S: DirectoryStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let creds = credentials(&parts.headers)?.ok_or(ApiError::Unauthorized)?;
    Ok(CurrentUser(authenticate(state, creds).await?))
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
  pub token:      String,
  pub role:       Role,
  pub user:       User,
  /// The user's student record, if they have one.
  pub student_id: Option<Uuid>,
}

/// When a session opened now would expire, or an error if the configured
/// lifetime does not fit in a timestamp.
fn session_expiry(ttl_secs: u64) -> Result<DateTime<Utc>, ApiError> {
  i64::try_from(ttl_secs)
    .ok()
    .and_then(TimeDelta::try_seconds)
    .and_then(|ttl| Utc::now().checked_add_signed(ttl))
    .ok_or_else(|| {
      ApiError::write(roster_core::Error::WriteFailed(format!(
        "session lifetime of {ttl_secs}s is out of range"
      )))
    })
}

async fn open_session<S>(
  state: &ApiState<S>,
  user: User,
  student_id: Option<Uuid>,
  expires_at: DateTime<Utc>,
) -> Result<SessionResponse, ApiError>
where
  S: DirectoryStore,
{
  let (token, token_hash) = generate_token();

  state
    .store
    .create_session(token_hash, user.id, expires_at)
    .await
    .map_err(ApiError::write)?;

  Ok(SessionResponse { token, role: user.role, user, student_id })
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    String,
  pub password: String,
  #[serde(flatten)]
  pub profile:  StudentProfile,
}

/// `POST /auth/register`: creates the user, their student record, and
/// their default privacy settings. Always registers a student.
pub async fn register<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let email = body.email.trim().to_owned();
  if !email.contains('@') {
    return Err(ApiError::BadRequest("a valid email is required".into()));
  }
  if body.password.len() < MIN_PASSWORD_LEN {
    return Err(ApiError::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  if body.profile.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name is required".into()));
  }
  validate::profile_references(&state, &body.profile).await?;
  let expires_at = session_expiry(state.config.session_ttl_secs)?;

  let password_hash = hash_password(&body.password)
    .map_err(|e| ApiError::write(roster_core::Error::WriteFailed(e.to_string())))?;

  let user = state
    .store
    .create_user(NewUser { email, password_hash, role: Role::Student })
    .await
    .map_err(ApiError::write)?
    .ok_or_else(|| ApiError::Conflict("email already registered".into()))?;

  let student = state
    .store
    .create_student(user.id, body.profile)
    .await
    .map_err(ApiError::write)?;

  // The initializer runs again lazily on first settings access.
  if let Err(e) = ensure_defaults(&*state.store, user.id, Vec::new(), &state.config.privacy).await
  {
    tracing::warn!(user_id = %user.id, "default privacy settings not created: {e}");
  }

  tracing::info!(user_id = %user.id, student_id = %student.id, "student registered");
  let session = open_session(&state, user, Some(student.id), expires_at).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

// ─── Login / logout ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let found = state
    .store
    .user_by_email(&body.email)
    .await
    .map_err(ApiError::fetch)?
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&body.password, &found.password_hash) {
    tracing::debug!(user_id = %found.user.id, "login rejected");
    return Err(ApiError::Unauthorized);
  }

  let expires_at = session_expiry(state.config.session_ttl_secs)?;
  let student_id = student_id_of(&state, found.user.id).await?;
  Ok(Json(open_session(&state, found.user, student_id, expires_at).await?))
}

/// `POST /auth/logout`: bearer sessions only.
pub async fn logout<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let Some(Credentials::Bearer(token)) = credentials(&headers)? else {
    return Err(ApiError::Unauthorized);
  };

  state
    .store
    .delete_session(hash_token(&token))
    .await
    .map_err(ApiError::write)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Me ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
  pub user:       Option<User>,
  pub student_id: Option<Uuid>,
}

/// `GET /auth/me`
pub async fn me<S>(
  State(state): State<ApiState<S>>,
  OptionalUser(user): OptionalUser,
) -> Result<Json<MeResponse>, ApiError>
where
  S: DirectoryStore + Clone + 'static,
{
  let student_id = match &user {
    Some(u) => student_id_of(&state, u.id).await?,
    None => None,
  };
  Ok(Json(MeResponse { user, student_id }))
}

async fn student_id_of<S>(state: &ApiState<S>, user_id: UserId) -> Result<Option<Uuid>, ApiError>
where
  S: DirectoryStore,
{
  Ok(
    state
      .store
      .student_by_user(user_id)
      .await
      .map_err(ApiError::fetch)?
      .map(|s| s.id),
  )
}
