//! Lazy creation of a student's default (all public) privacy settings.

use serde::Deserialize;

use crate::{
  Error, Result,
  field::{DEFAULT_FIELDS, PrivacyField},
  filter::FilterMode,
  identity::UserId,
  setting::{PrivacySetting, PrivacySettings},
  store::PrivacyStore,
};

/// Deployment-level knobs for the privacy subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrivacyOptions {
  /// Whether `photo_url` receives a row when defaults are created.
  pub photo_url_in_defaults: bool,
  /// Filter mode used when a request does not ask for one.
  pub default_mode:          FilterMode,
}

/// The fields that receive a row on first access.
pub fn default_fields(options: &PrivacyOptions) -> Vec<PrivacyField> {
  let mut fields = DEFAULT_FIELDS.to_vec();
  if options.photo_url_in_defaults {
    fields.push(PrivacyField::PhotoUrl);
  }
  fields
}

/// One public row per default field.
pub fn default_settings(
  user_id: UserId,
  options: &PrivacyOptions,
) -> Vec<PrivacySetting> {
  default_fields(options)
    .into_iter()
    .map(|f| PrivacySetting::public(user_id, f))
    .collect()
}

/// Return `existing` if it has any rows; otherwise write the defaults for
/// `user_id` as one batch and return what the store now holds.
///
/// Existing sets are not reconciled against newly recognized fields; rows
/// missing for those fields resolve as visible.
pub async fn ensure_defaults<S: PrivacyStore>(
  store: &S,
  user_id: UserId,
  existing: Vec<PrivacySetting>,
  options: &PrivacyOptions,
) -> Result<PrivacySettings> {
  if !existing.is_empty() {
    return Ok(PrivacySettings::from_rows(existing));
  }

  store
    .batch_insert_settings(default_settings(user_id, options))
    .await
    .map_err(|e| Error::WriteFailed(e.to_string()))?;

  let stored = store
    .settings_by_user(user_id)
    .await
    .map_err(|e| Error::FetchFailed(e.to_string()))?;

  Ok(PrivacySettings::from_rows(stored))
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use uuid::Uuid;

  use super::*;
  use crate::store::Store;

  /// Appends blindly, so duplicate rows reach the reader the way a lagging
  /// backend might return them.
  #[derive(Default)]
  struct MemoryStore {
    rows:        Mutex<Vec<PrivacySetting>>,
    fail_writes: AtomicBool,
  }

  #[derive(Debug, thiserror::Error)]
  #[error("unavailable")]
  struct Unavailable;

  impl Store for MemoryStore {
    type Error = Unavailable;
  }

  impl PrivacyStore for MemoryStore {
    async fn settings_by_user(
      &self,
      user_id: UserId,
    ) -> Result<Vec<PrivacySetting>, Unavailable> {
      let rows = self.rows.lock().unwrap();
      Ok(rows.iter().filter(|r| r.user_id == user_id).copied().collect())
    }

    async fn settings_by_student(
      &self,
      _: Uuid,
    ) -> Result<Vec<PrivacySetting>, Unavailable> {
      Ok(vec![])
    }

    async fn upsert_setting(
      &self,
      user_id: UserId,
      field: PrivacyField,
      is_private: bool,
    ) -> Result<PrivacySetting, Unavailable> {
      let row = PrivacySetting { user_id, field_name: field, is_private };
      self.rows.lock().unwrap().push(row);
      Ok(row)
    }

    async fn upsert_settings(
      &self,
      user_id: UserId,
      changes: Vec<(PrivacyField, bool)>,
    ) -> Result<(), Unavailable> {
      let mut rows = self.rows.lock().unwrap();
      rows.extend(
        changes
          .into_iter()
          .map(|(field_name, is_private)| PrivacySetting { user_id, field_name, is_private }),
      );
      Ok(())
    }

    async fn batch_insert_settings(
      &self,
      rows: Vec<PrivacySetting>,
    ) -> Result<(), Unavailable> {
      if self.fail_writes.load(Ordering::SeqCst) {
        return Err(Unavailable);
      }
      self.rows.lock().unwrap().extend(rows);
      Ok(())
    }
  }

  #[tokio::test]
  async fn empty_settings_get_twelve_public_rows() {
    let store = MemoryStore::default();
    let settings = ensure_defaults(&store, UserId(7), vec![], &PrivacyOptions::default())
      .await
      .unwrap();

    assert_eq!(settings.len(), 12);
    assert!(settings.iter().all(|r| !r.is_private && r.user_id == UserId(7)));
    assert!(settings.get(PrivacyField::PhotoUrl).is_none());
  }

  #[tokio::test]
  async fn photo_url_is_included_when_configured() {
    let store = MemoryStore::default();
    let options = PrivacyOptions { photo_url_in_defaults: true, ..Default::default() };
    let settings = ensure_defaults(&store, UserId(7), vec![], &options)
      .await
      .unwrap();
    assert_eq!(settings.len(), 13);
    assert_eq!(settings.is_private(PrivacyField::PhotoUrl), Some(false));
  }

  #[tokio::test]
  async fn repeated_calls_yield_one_row_per_field() {
    let store = MemoryStore::default();
    let options = PrivacyOptions::default();

    let first = ensure_defaults(&store, UserId(7), vec![], &options).await.unwrap();
    let second = ensure_defaults(&store, UserId(7), vec![], &options).await.unwrap();

    assert_eq!(first.len(), 12);
    assert_eq!(second.len(), 12);
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn existing_settings_are_returned_untouched() {
    let store = MemoryStore::default();
    let existing = vec![PrivacySetting {
      user_id:    UserId(7),
      field_name: PrivacyField::Mobile,
      is_private: true,
    }];
    let settings = ensure_defaults(&store, UserId(7), existing, &PrivacyOptions::default())
      .await
      .unwrap();

    assert_eq!(settings.len(), 1);
    assert_eq!(settings.is_private(PrivacyField::Mobile), Some(true));
    assert!(store.rows.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failed_batch_surfaces_write_failed() {
    let store = MemoryStore::default();
    store.fail_writes.store(true, Ordering::SeqCst);

    let err = ensure_defaults(&store, UserId(7), vec![], &PrivacyOptions::default())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::WriteFailed(_)));
  }
}
