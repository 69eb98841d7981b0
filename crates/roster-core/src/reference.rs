//! Reference data managed by administrators: campuses, departments,
//! courses, majors, and staff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, identity::UserId};

// ─── Reference items ─────────────────────────────────────────────────────────

/// The kind of a named reference item. All kinds share one shape and differ
/// only in what their `parent_id` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
  Campus,
  Department,
  Course,
  Major,
}

impl ReferenceKind {
  pub const ALL: [ReferenceKind; 4] =
    [Self::Campus, Self::Department, Self::Course, Self::Major];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Campus => "campus",
      Self::Department => "department",
      Self::Course => "course",
      Self::Major => "major",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "campus" => Ok(Self::Campus),
      "department" => Ok(Self::Department),
      "course" => Ok(Self::Course),
      "major" => Ok(Self::Major),
      other => Err(Error::UnknownReferenceKind(other.to_owned())),
    }
  }

  /// The collection path segment, e.g. `campuses`.
  pub fn plural(self) -> &'static str {
    match self {
      Self::Campus => "campuses",
      Self::Department => "departments",
      Self::Course => "courses",
      Self::Major => "majors",
    }
  }

  pub fn from_plural(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|k| k.plural() == s)
      .ok_or_else(|| Error::UnknownReferenceKind(s.to_owned()))
  }

  /// The kind that `parent_id` refers to: a department belongs to a campus,
  /// a course to a department, a major to a course.
  pub fn parent_kind(self) -> Option<ReferenceKind> {
    match self {
      Self::Campus => None,
      Self::Department => Some(Self::Campus),
      Self::Course => Some(Self::Department),
      Self::Major => Some(Self::Course),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
  pub id:          Uuid,
  pub kind:        ReferenceKind,
  pub name:        String,
  pub description: Option<String>,
  pub parent_id:   Option<Uuid>,
  pub created_at:  DateTime<Utc>,
}

/// Input for creating or replacing a reference item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReference {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub parent_id:   Option<Uuid>,
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
  pub id:            Uuid,
  pub user_id:       Option<UserId>,
  pub full_name:     String,
  pub department_id: Option<Uuid>,
  pub campus_id:     Option<Uuid>,
  pub designation:   Option<String>,
  pub mobile:        Option<String>,
  pub email:         Option<String>,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
  #[serde(default)]
  pub user_id:       Option<UserId>,
  pub full_name:     String,
  #[serde(default)]
  pub department_id: Option<Uuid>,
  #[serde(default)]
  pub campus_id:     Option<Uuid>,
  #[serde(default)]
  pub designation:   Option<String>,
  #[serde(default)]
  pub mobile:        Option<String>,
  #[serde(default)]
  pub email:         Option<String>,
}
