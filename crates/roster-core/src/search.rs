//! Free-text directory search, evaluated only over values the viewer may see.

use serde::{Deserialize, Serialize};

use crate::{field::PrivacyField, resolve::VisibilityDecision, student::StudentRecord};

/// Fields consulted by a text search.
pub const SEARCH_FIELDS: [PrivacyField; 6] = [
  PrivacyField::Name,
  PrivacyField::RegisteredNumber,
  PrivacyField::Mobile,
  PrivacyField::PersonalEmail,
  PrivacyField::PresentAddress,
  PrivacyField::PermanentAddress,
];

/// How the words of a search term combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
  /// Every word must appear in some searchable field.
  And,
  /// The whole term must appear in some searchable field.
  #[default]
  Or,
  /// The whole term must appear in no searchable field.
  Not,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextQuery {
  pub term: String,
  #[serde(default)]
  pub mode: SearchMode,
}

impl TextQuery {
  /// Case-insensitive match against the fields of `record` that
  /// `decisions` lets the viewer see. An empty term matches everything.
  pub fn matches(&self, record: &StudentRecord, decisions: &VisibilityDecision) -> bool {
    let term = self.term.trim().to_lowercase();
    if term.is_empty() {
      return true;
    }

    let haystacks: Vec<String> = SEARCH_FIELDS
      .iter()
      .filter(|f| decisions.is_visible(**f))
      .filter_map(|f| record.text_value(*f))
      .map(str::to_lowercase)
      .collect();
    let contains = |needle: &str| haystacks.iter().any(|h| h.contains(needle));

    match self.mode {
      SearchMode::And => term.split_whitespace().all(contains),
      SearchMode::Or => contains(&term),
      SearchMode::Not => !contains(&term),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{
    identity::UserId,
    resolve::decide,
    setting::{PrivacySetting, SettingsState},
  };

  fn record() -> StudentRecord {
    StudentRecord {
      id:                                 Uuid::new_v4(),
      user_id:                            UserId(3),
      name:                               "Ada Lovelace".into(),
      registered_number:                  Some("19MAT042".into()),
      year_of_admission:                  Some(2019),
      campus_id:                          None,
      course_id:                          None,
      major_id:                           None,
      department_id:                      None,
      campus:                             None,
      course:                             None,
      major:                              None,
      department:                         None,
      mobile:                             Some("0700 900 123".into()),
      personal_email:                     Some("ada@engines.org".into()),
      emergency_contact:                  None,
      present_address:                    Some("Marylebone, London".into()),
      permanent_address:                  None,
      photo_url:                          None,
      is_alumnus:                         false,
      created_at:                         Utc::now(),
      student_co_curricular_interests:    vec![],
      student_extra_curricular_interests: vec![],
      student_hobbies:                    vec![],
      student_internships:                vec![],
      student_job_offers:                 vec![],
    }
  }

  fn query(term: &str, mode: SearchMode) -> TextQuery {
    TextQuery { term: term.into(), mode }
  }

  fn public() -> VisibilityDecision { decide(None, UserId(3), &SettingsState::loaded([])) }

  #[test]
  fn or_matches_whole_term_case_insensitively() {
    assert!(query("LOVELACE", SearchMode::Or).matches(&record(), &public()));
    assert!(!query("babbage", SearchMode::Or).matches(&record(), &public()));
  }

  #[test]
  fn and_requires_every_word_somewhere() {
    assert!(query("ada london", SearchMode::And).matches(&record(), &public()));
    assert!(!query("ada paris", SearchMode::And).matches(&record(), &public()));
  }

  #[test]
  fn not_excludes_matches() {
    assert!(query("paris", SearchMode::Not).matches(&record(), &public()));
    assert!(!query("ada", SearchMode::Not).matches(&record(), &public()));
  }

  #[test]
  fn hidden_fields_are_never_matched() {
    let settings = SettingsState::loaded([PrivacySetting {
      user_id:    UserId(3),
      field_name: PrivacyField::Mobile,
      is_private: true,
    }]);
    let decisions = decide(None, UserId(3), &settings);
    assert!(!query("900", SearchMode::Or).matches(&record(), &decisions));
    assert!(query("900", SearchMode::Or).matches(&record(), &public()));
  }

  #[test]
  fn empty_term_matches_everything() {
    assert!(query("  ", SearchMode::Not).matches(&record(), &public()));
  }
}
