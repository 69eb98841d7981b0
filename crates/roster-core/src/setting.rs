//! Privacy setting rows and the deduplicated per-user set built from them.

use serde::{Deserialize, Serialize};

use crate::{field::PrivacyField, identity::UserId};

/// One stored row: whether `user_id` has marked `field_name` private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySetting {
  pub user_id:    UserId,
  pub field_name: PrivacyField,
  pub is_private: bool,
}

impl PrivacySetting {
  pub fn public(user_id: UserId, field_name: PrivacyField) -> Self {
    Self { user_id, field_name, is_private: false }
  }
}

/// The settings of a single user with at most one row per field.
///
/// Built with [`PrivacySettings::from_rows`], which keeps the first row seen
/// for each field and drops later duplicates. Row order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrivacySettings {
  rows: Vec<PrivacySetting>,
}

impl PrivacySettings {
  pub fn from_rows(rows: impl IntoIterator<Item = PrivacySetting>) -> Self {
    let mut deduped: Vec<PrivacySetting> = Vec::new();
    for row in rows {
      if !deduped.iter().any(|r| r.field_name == row.field_name) {
        deduped.push(row);
      }
    }
    Self { rows: deduped }
  }

  pub fn get(&self, field: PrivacyField) -> Option<&PrivacySetting> {
    self.rows.iter().find(|r| r.field_name == field)
  }

  /// `None` when the user has no row for `field`.
  pub fn is_private(&self, field: PrivacyField) -> Option<bool> {
    self.get(field).map(|r| r.is_private)
  }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn iter(&self) -> impl Iterator<Item = &PrivacySetting> { self.rows.iter() }

  pub fn into_vec(self) -> Vec<PrivacySetting> { self.rows }

  /// Set a field locally, returning the previous state so a failed remote
  /// write can be undone with [`PrivacySettings::restore`].
  pub fn set(
    &mut self,
    user_id: UserId,
    field: PrivacyField,
    is_private: bool,
  ) -> Option<bool> {
    match self.rows.iter_mut().find(|r| r.field_name == field) {
      Some(row) => Some(std::mem::replace(&mut row.is_private, is_private)),
      None => {
        self.rows.push(PrivacySetting { user_id, field_name: field, is_private });
        None
      }
    }
  }

  /// Undo a [`PrivacySettings::set`]; `previous = None` removes the row again.
  pub fn restore(&mut self, field: PrivacyField, previous: Option<bool>) {
    match previous {
      Some(p) => {
        if let Some(row) = self.rows.iter_mut().find(|r| r.field_name == field) {
          row.is_private = p;
        }
      }
      None => self.rows.retain(|r| r.field_name != field),
    }
  }
}

impl<'de> Deserialize<'de> for PrivacySettings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let rows = Vec::<PrivacySetting>::deserialize(deserializer)?;
    Ok(Self::from_rows(rows))
  }
}

/// Whether a target's settings have been fetched at all.
///
/// `NotLoaded` and "loaded, but no row for this field" resolve differently
/// for non-admin viewers: the first hides everything, the second shows the
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsState {
  NotLoaded,
  Loaded(PrivacySettings),
}

impl SettingsState {
  pub fn loaded(rows: impl IntoIterator<Item = PrivacySetting>) -> Self {
    Self::Loaded(PrivacySettings::from_rows(rows))
  }
}
