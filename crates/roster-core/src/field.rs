//! The closed set of student attributes that can be marked private.
//!
//! Field names double as the JSON keys of a serialised
//! [`StudentRecord`](crate::student::StudentRecord) and as the `field_name`
//! column of the `privacy_settings` table, so the snake_case spelling below is
//! load-bearing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// How a field is represented on a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// A plain value stored on the `students` row.
  Scalar,
  /// An embedded reference item (campus, course, …) resolved from an id.
  Relational,
  /// A nested list (hobbies, internships, …).
  Collection,
}

/// A student attribute eligible for field-level privacy.
///
/// `id`, `user_id`, `created_at` and `is_alumnus` are deliberately absent:
/// they are never subject to privacy.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrivacyField {
  // ── Scalar ──────────────────────────────────────────────────────────────
  Name,
  RegisteredNumber,
  YearOfAdmission,
  CampusId,
  CourseId,
  MajorId,
  DepartmentId,
  Mobile,
  PersonalEmail,
  EmergencyContact,
  PresentAddress,
  PermanentAddress,
  PhotoUrl,

  // ── Relational ──────────────────────────────────────────────────────────
  Department,
  Course,
  Major,
  Campus,

  // ── Collections ─────────────────────────────────────────────────────────
  StudentCoCurricularInterests,
  StudentExtraCurricularInterests,
  StudentHobbies,
  StudentInternships,
  StudentJobOffers,
}

/// Fields that receive a row when a student's settings are first created.
/// `photo_url` is added on top of these when configured.
pub const DEFAULT_FIELDS: [PrivacyField; 12] = [
  PrivacyField::Name,
  PrivacyField::RegisteredNumber,
  PrivacyField::YearOfAdmission,
  PrivacyField::CampusId,
  PrivacyField::CourseId,
  PrivacyField::MajorId,
  PrivacyField::DepartmentId,
  PrivacyField::Mobile,
  PrivacyField::PersonalEmail,
  PrivacyField::EmergencyContact,
  PrivacyField::PresentAddress,
  PrivacyField::PermanentAddress,
];

impl PrivacyField {
  /// The `field_name` string, e.g. `"personal_email"`.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a stored `field_name`. Unknown names are an error the caller is
  /// expected to skip, not propagate.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownField(s.to_owned()))
  }

  pub fn kind(self) -> FieldKind {
    match self {
      Self::Department | Self::Course | Self::Major | Self::Campus => {
        FieldKind::Relational
      }
      Self::StudentCoCurricularInterests
      | Self::StudentExtraCurricularInterests
      | Self::StudentHobbies
      | Self::StudentInternships
      | Self::StudentJobOffers => FieldKind::Collection,
      _ => FieldKind::Scalar,
    }
  }

  /// For a relational field, the id field it is resolved from.
  pub fn id_field(self) -> Option<Self> {
    match self {
      Self::Campus => Some(Self::CampusId),
      Self::Course => Some(Self::CourseId),
      Self::Major => Some(Self::MajorId),
      Self::Department => Some(Self::DepartmentId),
      _ => None,
    }
  }

  /// The other half of an id/reference pair: `campus_id` ↔ `campus`, etc.
  pub fn linked_field(self) -> Option<Self> {
    match self {
      Self::CampusId => Some(Self::Campus),
      Self::CourseId => Some(Self::Course),
      Self::MajorId => Some(Self::Major),
      Self::DepartmentId => Some(Self::Department),
      other => other.id_field(),
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn names_round_trip_through_parse() {
    for field in PrivacyField::iter() {
      assert_eq!(PrivacyField::parse(field.as_str()).unwrap(), field);
    }
  }

  #[test]
  fn recognized_set_has_twenty_two_members() {
    assert_eq!(PrivacyField::iter().count(), 22);
  }

  #[test]
  fn collection_names_match_record_keys() {
    assert_eq!(
      PrivacyField::StudentCoCurricularInterests.as_str(),
      "student_co_curricular_interests"
    );
    assert_eq!(PrivacyField::CampusId.as_str(), "campus_id");
    assert_eq!(
      serde_json::to_value(PrivacyField::StudentJobOffers).unwrap(),
      serde_json::json!("student_job_offers")
    );
  }

  #[test]
  fn always_visible_names_are_not_recognized() {
    for name in ["id", "user_id", "created_at", "is_alumnus"] {
      assert!(matches!(
        PrivacyField::parse(name),
        Err(Error::UnknownField(ref n)) if n == name
      ));
    }
  }

  #[test]
  fn relational_fields_point_at_their_ids() {
    assert_eq!(PrivacyField::Major.id_field(), Some(PrivacyField::MajorId));
    assert_eq!(PrivacyField::Major.kind(), FieldKind::Relational);
    assert_eq!(PrivacyField::Mobile.id_field(), None);
    assert_eq!(PrivacyField::StudentHobbies.kind(), FieldKind::Collection);
    assert_eq!(PrivacyField::CourseId.linked_field(), Some(PrivacyField::Course));
    assert_eq!(PrivacyField::Course.linked_field(), Some(PrivacyField::CourseId));
    assert_eq!(PrivacyField::Name.linked_field(), None);
  }
}
