//! Optimistic privacy edits.
//!
//! The local [`PrivacySettings`] is updated before the request goes out so
//! the UI reflects the change immediately; a failed write restores the
//! previous state.

use anyhow::Result;
use roster_core::{
  field::PrivacyField,
  identity::UserId,
  setting::{PrivacySetting, PrivacySettings},
};

use crate::client::ApiClient;

/// Somewhere a single privacy setting can be saved.
#[allow(async_fn_in_trait)]
pub trait SettingsRemote {
  async fn put_setting(&self, field: PrivacyField, is_private: bool) -> Result<PrivacySetting>;
}

impl SettingsRemote for ApiClient {
  async fn put_setting(&self, field: PrivacyField, is_private: bool) -> Result<PrivacySetting> {
    self.set_privacy(field, is_private).await
  }
}

/// Set `field` locally, then remotely; on failure the local change is undone
/// and the error returned.
pub async fn set_field<R: SettingsRemote>(
  remote: &R,
  settings: &mut PrivacySettings,
  user_id: UserId,
  field: PrivacyField,
  is_private: bool,
) -> Result<()> {
  let previous = settings.set(user_id, field, is_private);
  if let Err(e) = remote.put_setting(field, is_private).await {
    settings.restore(field, previous);
    return Err(e);
  }
  Ok(())
}

/// Flip `field`; a field without a row counts as public. Returns the new
/// `is_private` value.
pub async fn toggle_field<R: SettingsRemote>(
  remote: &R,
  settings: &mut PrivacySettings,
  user_id: UserId,
  field: PrivacyField,
) -> Result<bool> {
  let next = !settings.is_private(field).unwrap_or(false);
  set_field(remote, settings, user_id, field, next).await?;
  Ok(next)
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use anyhow::anyhow;

  use super::*;

  const U: UserId = UserId(7);

  #[derive(Default)]
  struct Recorder {
    fail:  bool,
    calls: Mutex<Vec<(PrivacyField, bool)>>,
  }

  impl SettingsRemote for Recorder {
    async fn put_setting(
      &self,
      field: PrivacyField,
      is_private: bool,
    ) -> Result<PrivacySetting> {
      self.calls.lock().unwrap().push((field, is_private));
      if self.fail {
        return Err(anyhow!("connection refused"));
      }
      Ok(PrivacySetting { user_id: U, field_name: field, is_private })
    }
  }

  fn settings() -> PrivacySettings {
    PrivacySettings::from_rows([PrivacySetting::public(U, PrivacyField::Mobile)])
  }

  #[tokio::test]
  async fn successful_toggle_keeps_the_change() {
    let remote = Recorder::default();
    let mut s = settings();

    let now = toggle_field(&remote, &mut s, U, PrivacyField::Mobile).await.unwrap();
    assert!(now);
    assert_eq!(s.is_private(PrivacyField::Mobile), Some(true));
    assert_eq!(*remote.calls.lock().unwrap(), vec![(PrivacyField::Mobile, true)]);

    let now = toggle_field(&remote, &mut s, U, PrivacyField::Mobile).await.unwrap();
    assert!(!now);
    assert_eq!(s.is_private(PrivacyField::Mobile), Some(false));
  }

  #[tokio::test]
  async fn failed_write_rolls_back_existing_row() {
    let remote = Recorder { fail: true, ..Default::default() };
    let mut s = settings();

    assert!(toggle_field(&remote, &mut s, U, PrivacyField::Mobile).await.is_err());
    assert_eq!(s.is_private(PrivacyField::Mobile), Some(false));
    assert_eq!(remote.calls.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn failed_write_removes_new_row() {
    let remote = Recorder { fail: true, ..Default::default() };
    let mut s = settings();

    assert!(set_field(&remote, &mut s, U, PrivacyField::StudentHobbies, true).await.is_err());
    assert_eq!(s.is_private(PrivacyField::StudentHobbies), None);
    assert_eq!(s.len(), 1);
  }

  #[tokio::test]
  async fn missing_row_toggles_to_private() {
    let remote = Recorder::default();
    let mut s = settings();

    assert!(toggle_field(&remote, &mut s, U, PrivacyField::PhotoUrl).await.unwrap());
    assert_eq!(s.is_private(PrivacyField::PhotoUrl), Some(true));
    assert_eq!(s.len(), 2);
  }
}
