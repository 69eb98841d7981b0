//! Users, roles, and the viewer on whose behalf a request is served.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier of a user account. Opaque to the privacy layer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Admin,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Student => "student",
      Self::Admin => "admin",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "student" => Ok(Self::Student),
      "admin" => Ok(Self::Admin),
      other => Err(Error::UnknownRole(other.to_owned())),
    }
  }
}

/// The authenticated actor requesting data. Anonymous requests carry no
/// `Viewer` at all (`Option<&Viewer>` at call sites).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
  pub id:   UserId,
  pub role: Role,
}

impl Viewer {
  pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// A registered account. The password hash never leaves the store layer
/// inside this type; see [`UserCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:         UserId,
  pub email:      String,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn viewer(&self) -> Viewer { Viewer { id: self.id, role: self.role } }
}

/// A user together with the stored argon2 PHC string.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

/// Input to [`crate::store::IdentityStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}
