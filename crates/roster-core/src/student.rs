//! Student records and the inputs used to create, update, and list them.
//!
//! The JSON keys of a serialised [`StudentRecord`] are exactly the
//! [`PrivacyField`] names plus the always-visible `id`, `user_id`,
//! `is_alumnus`, and `created_at`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{field::PrivacyField, identity::UserId, reference::ReferenceItem};

// ─── Nested collections ──────────────────────────────────────────────────────

/// A named interest or hobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internship {
  pub company_name: String,
  pub position:     String,
  #[serde(default)]
  pub start_date:   Option<NaiveDate>,
  #[serde(default)]
  pub end_date:     Option<NaiveDate>,
  #[serde(default)]
  pub description:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
  pub company_name: String,
  pub position:     String,
  #[serde(default)]
  pub offer_date:   Option<NaiveDate>,
  /// Free text, e.g. "accepted" or "pending".
  #[serde(default)]
  pub status:       Option<String>,
}

/// The three kinds of named interest a student can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestKind {
  CoCurricular,
  ExtraCurricular,
  Hobby,
}

impl InterestKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::CoCurricular => "co_curricular",
      Self::ExtraCurricular => "extra_curricular",
      Self::Hobby => "hobby",
    }
  }
}

// ─── StudentRecord ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
  pub id:                                 Uuid,
  pub user_id:                            UserId,
  pub name:                               String,
  pub registered_number:                  Option<String>,
  pub year_of_admission:                  Option<i32>,
  pub campus_id:                          Option<Uuid>,
  pub course_id:                          Option<Uuid>,
  pub major_id:                           Option<Uuid>,
  pub department_id:                      Option<Uuid>,
  pub campus:                             Option<ReferenceItem>,
  pub course:                             Option<ReferenceItem>,
  pub major:                              Option<ReferenceItem>,
  pub department:                         Option<ReferenceItem>,
  pub mobile:                             Option<String>,
  pub personal_email:                     Option<String>,
  pub emergency_contact:                  Option<String>,
  pub present_address:                    Option<String>,
  pub permanent_address:                  Option<String>,
  pub photo_url:                          Option<String>,
  pub is_alumnus:                         bool,
  pub created_at:                         DateTime<Utc>,
  pub student_co_curricular_interests:    Vec<Interest>,
  pub student_extra_curricular_interests: Vec<Interest>,
  pub student_hobbies:                    Vec<Interest>,
  pub student_internships:                Vec<Internship>,
  pub student_job_offers:                 Vec<JobOffer>,
}

impl StudentRecord {
  /// The plain-text value of a searchable scalar field.
  pub fn text_value(&self, field: PrivacyField) -> Option<&str> {
    match field {
      PrivacyField::Name => Some(self.name.as_str()),
      PrivacyField::RegisteredNumber => self.registered_number.as_deref(),
      PrivacyField::Mobile => self.mobile.as_deref(),
      PrivacyField::PersonalEmail => self.personal_email.as_deref(),
      PrivacyField::EmergencyContact => self.emergency_contact.as_deref(),
      PrivacyField::PresentAddress => self.present_address.as_deref(),
      PrivacyField::PermanentAddress => self.permanent_address.as_deref(),
      PrivacyField::PhotoUrl => self.photo_url.as_deref(),
      _ => None,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::StudentStore::create_student`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
  pub name:                               String,
  pub registered_number:                  Option<String>,
  pub year_of_admission:                  Option<i32>,
  pub campus_id:                          Option<Uuid>,
  pub course_id:                          Option<Uuid>,
  pub major_id:                           Option<Uuid>,
  pub department_id:                      Option<Uuid>,
  pub mobile:                             Option<String>,
  pub personal_email:                     Option<String>,
  pub emergency_contact:                  Option<String>,
  pub present_address:                    Option<String>,
  pub permanent_address:                  Option<String>,
  pub photo_url:                          Option<String>,
  pub is_alumnus:                         bool,
  pub student_co_curricular_interests:    Vec<Interest>,
  pub student_extra_curricular_interests: Vec<Interest>,
  pub student_hobbies:                    Vec<Interest>,
  pub student_internships:                Vec<Internship>,
  pub student_job_offers:                 Vec<JobOffer>,
}

/// A partial update: `None` leaves a column unchanged, `Some` replaces it.
/// Collections are replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentUpdate {
  pub name:                               Option<String>,
  pub registered_number:                  Option<String>,
  pub year_of_admission:                  Option<i32>,
  pub campus_id:                          Option<Uuid>,
  pub course_id:                          Option<Uuid>,
  pub major_id:                           Option<Uuid>,
  pub department_id:                      Option<Uuid>,
  pub mobile:                             Option<String>,
  pub personal_email:                     Option<String>,
  pub emergency_contact:                  Option<String>,
  pub present_address:                    Option<String>,
  pub permanent_address:                  Option<String>,
  pub photo_url:                          Option<String>,
  /// Only honoured for admin callers.
  pub is_alumnus:                         Option<bool>,
  pub student_co_curricular_interests:    Option<Vec<Interest>>,
  pub student_extra_curricular_interests: Option<Vec<Interest>>,
  pub student_hobbies:                    Option<Vec<Interest>>,
  pub student_internships:                Option<Vec<Internship>>,
  pub student_job_offers:                 Option<Vec<JobOffer>>,
}

/// Structured filters for [`crate::store::StudentStore::list_students`].
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
  pub campus_id:         Option<Uuid>,
  pub course_id:         Option<Uuid>,
  pub major_id:          Option<Uuid>,
  pub department_id:     Option<Uuid>,
  pub year_of_admission: Option<i32>,
  /// Alumni are excluded unless this is set.
  pub include_alumni:    bool,
  pub limit:             Option<usize>,
  pub offset:            Option<usize>,
}
