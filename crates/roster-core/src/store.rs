//! Storage traits.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). Higher
//! layers (`roster-api`, `roster-server`) depend on these abstractions, not
//! on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used from
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  field::PrivacyField,
  identity::{NewUser, User, UserCredentials, UserId},
  reference::{NewReference, NewStaff, ReferenceItem, ReferenceKind, Staff},
  setting::PrivacySetting,
  student::{StudentFilter, StudentProfile, StudentRecord, StudentUpdate},
};

/// The error type shared by every store trait.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Privacy ─────────────────────────────────────────────────────────────────

pub trait PrivacyStore: Store {
  /// All settings rows stored for `user_id`. Rows naming a field outside the
  /// recognized set are skipped.
  fn settings_by_user(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<PrivacySetting>, Self::Error>> + Send + '_;

  /// Settings of the user owning `student_id`; empty if the student does not
  /// exist.
  fn settings_by_student(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PrivacySetting>, Self::Error>> + Send + '_;

  /// Create or overwrite the row for (`user_id`, `field`).
  fn upsert_setting(
    &self,
    user_id: UserId,
    field: PrivacyField,
    is_private: bool,
  ) -> impl Future<Output = Result<PrivacySetting, Self::Error>> + Send + '_;

  /// Apply every (`field`, `is_private`) change for `user_id`, or none of
  /// them. Later changes to the same field win.
  fn upsert_settings(
    &self,
    user_id: UserId,
    changes: Vec<(PrivacyField, bool)>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert all `rows` or none of them. Rows whose (user, field) pair already
  /// exists are left as stored.
  fn batch_insert_settings(
    &self,
    rows: Vec<PrivacySetting>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Identity ────────────────────────────────────────────────────────────────

pub trait IdentityStore: Store {
  /// Returns `None` if the email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;

  /// Persist a session keyed by the hash of its bearer token.
  fn create_session(
    &self,
    token_hash: String,
    user_id: UserId,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The user owning an unexpired session, if any.
  fn session_user(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Students ────────────────────────────────────────────────────────────────

pub trait StudentStore: Store {
  fn create_student(
    &self,
    user_id: UserId,
    profile: StudentProfile,
  ) -> impl Future<Output = Result<StudentRecord, Self::Error>> + Send + '_;

  /// Retrieve a student with references and collections resolved.
  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StudentRecord>, Self::Error>> + Send + '_;

  fn student_by_user(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Option<StudentRecord>, Self::Error>> + Send + '_;

  /// Returns `None` if the student does not exist.
  fn update_student(
    &self,
    id: Uuid,
    update: StudentUpdate,
  ) -> impl Future<Output = Result<Option<StudentRecord>, Self::Error>> + Send + '_;

  /// Returns `false` if the student did not exist.
  fn delete_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Students matching the structured filters, ordered by name.
  fn list_students<'a>(
    &'a self,
    filter: &'a StudentFilter,
  ) -> impl Future<Output = Result<Vec<StudentRecord>, Self::Error>> + Send + 'a;
}

// ─── Reference data ──────────────────────────────────────────────────────────

pub trait ReferenceStore: Store {
  fn create_reference(
    &self,
    kind: ReferenceKind,
    input: NewReference,
  ) -> impl Future<Output = Result<ReferenceItem, Self::Error>> + Send + '_;

  fn list_references(
    &self,
    kind: ReferenceKind,
  ) -> impl Future<Output = Result<Vec<ReferenceItem>, Self::Error>> + Send + '_;

  fn get_reference(
    &self,
    kind: ReferenceKind,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ReferenceItem>, Self::Error>> + Send + '_;

  fn update_reference(
    &self,
    kind: ReferenceKind,
    id: Uuid,
    input: NewReference,
  ) -> impl Future<Output = Result<Option<ReferenceItem>, Self::Error>> + Send + '_;

  fn delete_reference(
    &self,
    kind: ReferenceKind,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_staff(
    &self,
    input: NewStaff,
  ) -> impl Future<Output = Result<Staff, Self::Error>> + Send + '_;

  fn list_staff(&self) -> impl Future<Output = Result<Vec<Staff>, Self::Error>> + Send + '_;

  fn get_staff(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  fn update_staff(
    &self,
    id: Uuid,
    input: NewStaff,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  fn delete_staff(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Combined ────────────────────────────────────────────────────────────────

/// Everything the directory service needs from a backend.
pub trait DirectoryStore:
  PrivacyStore + IdentityStore + StudentStore + ReferenceStore
{
}

impl<T> DirectoryStore for T where
  T: PrivacyStore + IdentityStore + StudentStore + ReferenceStore
{
}
