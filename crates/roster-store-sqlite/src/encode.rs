//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order matches chronological order. Nested collections are
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use roster_core::{
  field::PrivacyField,
  identity::{Role, User, UserCredentials, UserId},
  reference::{ReferenceItem, ReferenceKind, Staff},
  setting::PrivacySetting,
  student::{Interest, Internship, JobOffer, StudentRecord},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON collections ────────────────────────────────────────────────────────

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       i64,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, email, password_hash, role, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      role:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_credentials(self) -> Result<UserCredentials> {
    Ok(UserCredentials {
      user:          User {
        id:         UserId(self.user_id),
        email:      self.email,
        role:       Role::parse(&self.role)?,
        created_at: decode_dt(&self.created_at)?,
      },
      password_hash: self.password_hash,
    })
  }

  pub fn into_user(self) -> Result<User> { Ok(self.into_credentials()?.user) }
}

/// Raw values read directly from a `privacy_settings` row.
pub struct RawSetting {
  pub user_id:    i64,
  pub field_name: String,
  pub is_private: bool,
}

impl RawSetting {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      field_name: row.get(1)?,
      is_private: row.get(2)?,
    })
  }

  /// Fails with [`roster_core::Error::UnknownField`] for names outside the
  /// recognized set.
  pub fn into_setting(self) -> Result<PrivacySetting> {
    Ok(PrivacySetting {
      user_id:    UserId(self.user_id),
      field_name: PrivacyField::parse(&self.field_name)?,
      is_private: self.is_private,
    })
  }
}

/// Decode settings rows, skipping (and logging) rows with unknown field
/// names.
pub fn decode_settings(raws: Vec<RawSetting>) -> Vec<PrivacySetting> {
  raws
    .into_iter()
    .filter_map(|raw| {
      let user_id = raw.user_id;
      match raw.into_setting() {
        Ok(setting) => Some(setting),
        Err(e) => {
          tracing::warn!(user_id, "ignoring privacy setting row: {e}");
          None
        }
      }
    })
    .collect()
}

/// Raw values read directly from a `reference_items` row.
pub struct RawReference {
  pub item_id:     String,
  pub kind:        String,
  pub name:        String,
  pub description: Option<String>,
  pub parent_id:   Option<String>,
  pub created_at:  String,
}

impl RawReference {
  pub const COLUMNS: &'static str =
    "item_id, kind, name, description, parent_id, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      kind:        row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      parent_id:   row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_item(self) -> Result<ReferenceItem> {
    Ok(ReferenceItem {
      id:          decode_uuid(&self.item_id)?,
      kind:        ReferenceKind::parse(&self.kind)?,
      name:        self.name,
      description: self.description,
      parent_id:   decode_opt_uuid(self.parent_id.as_deref())?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `staff` row.
pub struct RawStaff {
  pub staff_id:      String,
  pub user_id:       Option<i64>,
  pub full_name:     String,
  pub department_id: Option<String>,
  pub campus_id:     Option<String>,
  pub designation:   Option<String>,
  pub mobile:        Option<String>,
  pub email:         Option<String>,
  pub created_at:    String,
}

impl RawStaff {
  pub const COLUMNS: &'static str = "staff_id, user_id, full_name, department_id, \
                                     campus_id, designation, mobile, email, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      staff_id:      row.get(0)?,
      user_id:       row.get(1)?,
      full_name:     row.get(2)?,
      department_id: row.get(3)?,
      campus_id:     row.get(4)?,
      designation:   row.get(5)?,
      mobile:        row.get(6)?,
      email:         row.get(7)?,
      created_at:    row.get(8)?,
    })
  }

  pub fn into_staff(self) -> Result<Staff> {
    Ok(Staff {
      id:            decode_uuid(&self.staff_id)?,
      user_id:       self.user_id.map(UserId),
      full_name:     self.full_name,
      department_id: decode_opt_uuid(self.department_id.as_deref())?,
      campus_id:     decode_opt_uuid(self.campus_id.as_deref())?,
      designation:   self.designation,
      mobile:        self.mobile,
      email:         self.email,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from a `students` row, plus the reference rows it points
/// at (looked up in the same database call).
pub struct RawStudent {
  pub student_id:        String,
  pub user_id:           i64,
  pub name:              String,
  pub registered_number: Option<String>,
  pub year_of_admission: Option<i32>,
  pub campus_id:         Option<String>,
  pub course_id:         Option<String>,
  pub major_id:          Option<String>,
  pub department_id:     Option<String>,
  pub mobile:            Option<String>,
  pub personal_email:    Option<String>,
  pub emergency_contact: Option<String>,
  pub present_address:   Option<String>,
  pub permanent_address: Option<String>,
  pub photo_url:         Option<String>,
  pub is_alumnus:        bool,
  pub created_at:        String,
  pub co_curricular:     String,
  pub extra_curricular:  String,
  pub hobbies:           String,
  pub internships:       String,
  pub job_offers:        String,
  // reference lookups
  pub campus:            Option<RawReference>,
  pub course:            Option<RawReference>,
  pub major:             Option<RawReference>,
  pub department:        Option<RawReference>,
}

impl RawStudent {
  pub const COLUMNS: &'static str = "student_id, user_id, name, registered_number, \
     year_of_admission, campus_id, course_id, major_id, department_id, mobile, \
     personal_email, emergency_contact, present_address, permanent_address, \
     photo_url, is_alumnus, created_at, co_curricular, extra_curricular, hobbies, \
     internships, job_offers";

  /// Reads the student columns; reference lookups are filled in afterwards.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:        row.get(0)?,
      user_id:           row.get(1)?,
      name:              row.get(2)?,
      registered_number: row.get(3)?,
      year_of_admission: row.get(4)?,
      campus_id:         row.get(5)?,
      course_id:         row.get(6)?,
      major_id:          row.get(7)?,
      department_id:     row.get(8)?,
      mobile:            row.get(9)?,
      personal_email:    row.get(10)?,
      emergency_contact: row.get(11)?,
      present_address:   row.get(12)?,
      permanent_address: row.get(13)?,
      photo_url:         row.get(14)?,
      is_alumnus:        row.get(15)?,
      created_at:        row.get(16)?,
      co_curricular:     row.get(17)?,
      extra_curricular:  row.get(18)?,
      hobbies:           row.get(19)?,
      internships:       row.get(20)?,
      job_offers:        row.get(21)?,
      campus:            None,
      course:            None,
      major:             None,
      department:        None,
    })
  }

  pub fn into_record(self) -> Result<StudentRecord> {
    let reference = |raw: Option<RawReference>| raw.map(RawReference::into_item).transpose();

    Ok(StudentRecord {
      id:                                 decode_uuid(&self.student_id)?,
      user_id:                            UserId(self.user_id),
      name:                               self.name,
      registered_number:                  self.registered_number,
      year_of_admission:                  self.year_of_admission,
      campus_id:                          decode_opt_uuid(self.campus_id.as_deref())?,
      course_id:                          decode_opt_uuid(self.course_id.as_deref())?,
      major_id:                           decode_opt_uuid(self.major_id.as_deref())?,
      department_id:                      decode_opt_uuid(self.department_id.as_deref())?,
      campus:                             reference(self.campus)?,
      course:                             reference(self.course)?,
      major:                              reference(self.major)?,
      department:                         reference(self.department)?,
      mobile:                             self.mobile,
      personal_email:                     self.personal_email,
      emergency_contact:                  self.emergency_contact,
      present_address:                    self.present_address,
      permanent_address:                  self.permanent_address,
      photo_url:                          self.photo_url,
      is_alumnus:                         self.is_alumnus,
      created_at:                         decode_dt(&self.created_at)?,
      student_co_curricular_interests:    decode_json::<Vec<Interest>>(&self.co_curricular)?,
      student_extra_curricular_interests: decode_json::<Vec<Interest>>(&self.extra_curricular)?,
      student_hobbies:                    decode_json::<Vec<Interest>>(&self.hobbies)?,
      student_internships:                decode_json::<Vec<Internship>>(&self.internships)?,
      student_job_offers:                 decode_json::<Vec<JobOffer>>(&self.job_offers)?,
    })
  }
}
