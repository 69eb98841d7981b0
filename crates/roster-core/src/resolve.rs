//! The privacy resolver: per-field show/hide decisions for a viewer.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
  field::PrivacyField,
  identity::{Role, UserId, Viewer},
  setting::SettingsState,
};

/// Decide whether `field` is shown to a viewer with `role` (`None` for an
/// anonymous viewer).
///
/// - Admins see every field, whatever the settings say.
/// - With settings not yet loaded, non-admins see nothing.
/// - With settings loaded, a field without a row is visible; a field with a
///   row is visible unless it is marked private.
pub fn resolve(
  role: Option<Role>,
  settings: &SettingsState,
  field: PrivacyField,
) -> bool {
  if role == Some(Role::Admin) {
    return true;
  }
  match settings {
    SettingsState::NotLoaded => false,
    SettingsState::Loaded(s) => !s.is_private(field).unwrap_or(false),
  }
}

/// The computed show/hide flag for every recognized field. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibilityDecision {
  visible: BTreeMap<PrivacyField, bool>,
}

impl VisibilityDecision {
  pub fn all_visible() -> Self {
    Self { visible: PrivacyField::iter().map(|f| (f, true)).collect() }
  }

  pub fn is_visible(&self, field: PrivacyField) -> bool {
    self.visible.get(&field).copied().unwrap_or(false)
  }

  pub fn hidden_fields(&self) -> impl Iterator<Item = PrivacyField> + '_ {
    self.visible.iter().filter(|(_, v)| !**v).map(|(f, _)| *f)
  }
}

/// Resolve every recognized field for `viewer` looking at the record owned
/// by `target`. Owners always see their own record in full.
pub fn decide(
  viewer: Option<&Viewer>,
  target: UserId,
  settings: &SettingsState,
) -> VisibilityDecision {
  if viewer.is_some_and(|v| v.id == target) {
    return VisibilityDecision::all_visible();
  }
  let role = viewer.map(|v| v.role);
  VisibilityDecision {
    visible: PrivacyField::iter()
      .map(|f| (f, resolve(role, settings, f)))
      .collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::setting::PrivacySetting;

  const TARGET: UserId = UserId(7);

  fn row(field: PrivacyField, is_private: bool) -> PrivacySetting {
    PrivacySetting { user_id: TARGET, field_name: field, is_private }
  }

  fn everything_private() -> SettingsState {
    SettingsState::loaded(PrivacyField::iter().map(|f| row(f, true)))
  }

  #[test]
  fn admin_sees_every_field_regardless_of_settings() {
    for settings in [
      SettingsState::NotLoaded,
      SettingsState::loaded([]),
      everything_private(),
    ] {
      for field in PrivacyField::iter() {
        assert!(resolve(Some(Role::Admin), &settings, field), "{field}");
      }
    }
  }

  #[test]
  fn missing_row_in_loaded_list_is_visible() {
    let empty = SettingsState::loaded([]);
    let partial = SettingsState::loaded([row(PrivacyField::Mobile, true)]);
    for role in [None, Some(Role::Student)] {
      for field in PrivacyField::iter() {
        assert!(resolve(role, &empty, field));
      }
      assert!(resolve(role, &partial, PrivacyField::PersonalEmail));
    }
  }

  #[test]
  fn explicit_rows_decide_for_non_admins() {
    let settings = SettingsState::loaded([
      row(PrivacyField::Mobile, true),
      row(PrivacyField::Name, false),
    ]);
    assert!(!resolve(Some(Role::Student), &settings, PrivacyField::Mobile));
    assert!(resolve(Some(Role::Student), &settings, PrivacyField::Name));
    assert!(!resolve(None, &settings, PrivacyField::Mobile));
  }

  #[test]
  fn not_loaded_hides_everything_for_non_admins() {
    for field in PrivacyField::iter() {
      assert!(!resolve(Some(Role::Student), &SettingsState::NotLoaded, field));
      assert!(!resolve(None, &SettingsState::NotLoaded, field));
    }
  }

  #[test]
  fn duplicate_rows_resolve_like_the_first() {
    let single = SettingsState::loaded([row(PrivacyField::Name, true)]);
    let duplicated = SettingsState::loaded([
      row(PrivacyField::Name, true),
      row(PrivacyField::Name, false),
    ]);
    for field in PrivacyField::iter() {
      assert_eq!(
        resolve(Some(Role::Student), &single, field),
        resolve(Some(Role::Student), &duplicated, field),
      );
    }
  }

  #[test]
  fn owner_sees_own_private_fields() {
    let owner = Viewer { id: TARGET, role: Role::Student };
    let decision = decide(Some(&owner), TARGET, &everything_private());
    assert_eq!(decision.hidden_fields().count(), 0);

    let other = Viewer { id: UserId(8), role: Role::Student };
    let decision = decide(Some(&other), TARGET, &everything_private());
    assert_eq!(decision.hidden_fields().count(), 22);
  }

  #[test]
  fn anonymous_decision_matches_student_decision() {
    let settings = SettingsState::loaded([row(PrivacyField::Mobile, true)]);
    let student = Viewer { id: UserId(99), role: Role::Student };
    assert_eq!(
      decide(None, TARGET, &settings),
      decide(Some(&student), TARGET, &settings),
    );
  }
}
