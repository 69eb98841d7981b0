//! Plain-text rendering of filtered student views.
//!
//! Views arrive already filtered by the server; this module only decides
//! labels and order. Detail views are masked: a hidden field carries the
//! string `Hidden` and is shown as such. List views are redacted: a hidden
//! field is simply absent, so a name that really is `Hidden` stays a name.

use roster_core::filter::{HIDDEN, ViewRecord};
use serde_json::Value;
use uuid::Uuid;

/// Display order and labels for the keys of a student view.
pub const DETAIL_FIELDS: [(&str, &str); 18] = [
  ("name", "Name"),
  ("registered_number", "Reg. number"),
  ("year_of_admission", "Admitted"),
  ("campus", "Campus"),
  ("department", "Department"),
  ("course", "Course"),
  ("major", "Major"),
  ("mobile", "Mobile"),
  ("personal_email", "Email"),
  ("emergency_contact", "Emergency"),
  ("present_address", "Address"),
  ("permanent_address", "Home address"),
  ("photo_url", "Photo"),
  ("student_co_curricular_interests", "Co-curricular"),
  ("student_extra_curricular_interests", "Extra-curricular"),
  ("student_hobbies", "Hobbies"),
  ("student_internships", "Internships"),
  ("student_job_offers", "Job offers"),
];

/// The record's id, if it parses.
pub fn record_id(record: &ViewRecord) -> Option<Uuid> {
  record.get("id")?.as_str()?.parse().ok()
}

/// The name of a redacted list view, or `None` when it was removed.
pub fn visible_name(record: &ViewRecord) -> Option<&str> {
  record.get("name")?.as_str()
}

/// Label shown in lists: the name, or `Hidden` when it was removed.
pub fn list_label(record: &ViewRecord) -> String {
  match record.get("name") {
    Some(v) => display_value(v),
    None => HIDDEN.to_string(),
  }
}

/// Render one JSON value from a view as a single line.
pub fn display_value(value: &Value) -> String {
  match value {
    Value::Null => "—".to_string(),
    Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
    Value::Number(n) => n.to_string(),
    Value::String(s) => s.clone(),
    Value::Array(items) if items.is_empty() => "—".to_string(),
    Value::Array(items) => {
      items.iter().map(display_value).collect::<Vec<_>>().join(", ")
    }
    Value::Object(obj) => {
      if let Some(name) = obj.get("name").and_then(Value::as_str) {
        return name.to_string();
      }
      // Internships and job offers.
      let company = obj.get("company_name").and_then(Value::as_str);
      let position = obj.get("position").and_then(Value::as_str);
      match (position, company) {
        (Some(p), Some(c)) => format!("{p} at {c}"),
        (None, Some(c)) => c.to_string(),
        _ => value.to_string(),
      }
    }
  }
}

/// `(label, value)` rows for a detail view, in display order. Keys the
/// server removed (redact mode) are skipped.
pub fn detail_rows(record: &ViewRecord) -> Vec<(&'static str, String)> {
  let mut rows: Vec<_> = DETAIL_FIELDS
    .iter()
    .filter_map(|(key, label)| record.get(*key).map(|v| (*label, display_value(v))))
    .collect();
  if let Some(Value::Bool(true)) = record.get("is_alumnus") {
    rows.push(("Alumnus", "yes".to_string()));
  }
  rows
}
