//! The field filter: turns a student record into a view-safe projection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use crate::{
  Result, field::PrivacyField, resolve::VisibilityDecision, student::StudentRecord,
};

/// A student record as a JSON object, after filtering.
pub type ViewRecord = Map<String, Value>;

/// Placeholder written over hidden values in [`FilterMode::Mask`].
pub const HIDDEN: &str = "Hidden";

/// What happens to a hidden field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
  /// Remove the key from the payload.
  #[default]
  Redact,
  /// Keep the key, replace the value with [`HIDDEN`].
  Mask,
}

/// Project `record` for a viewer whose decisions are `decisions`.
pub fn filter_for_viewer(
  record: &StudentRecord,
  decisions: &VisibilityDecision,
  mode: FilterMode,
) -> Result<ViewRecord> {
  let object = match serde_json::to_value(record)? {
    Value::Object(map) => map,
    _ => Map::new(),
  };
  Ok(filter_object(object, decisions, mode))
}

/// Apply `decisions` to an arbitrary JSON object. Keys that are not
/// recognized privacy fields are left untouched.
pub fn filter_object(
  mut object: ViewRecord,
  decisions: &VisibilityDecision,
  mode: FilterMode,
) -> ViewRecord {
  for field in PrivacyField::iter() {
    if is_shown(decisions, field) {
      continue;
    }
    let key = field.as_str();
    if !object.contains_key(key) {
      continue;
    }
    match mode {
      FilterMode::Redact => {
        object.remove(key);
      }
      FilterMode::Mask => {
        object.insert(key.to_owned(), Value::String(HIDDEN.to_owned()));
      }
    }
  }
  object
}

/// An id and its embedded reference are shown only when both are visible.
fn is_shown(decisions: &VisibilityDecision, field: PrivacyField) -> bool {
  decisions.is_visible(field)
    && field.linked_field().is_none_or(|other| decisions.is_visible(other))
}
