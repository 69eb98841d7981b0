//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use roster_core::{field::PrivacyField, filter::ViewRecord, setting::PrivacySettings};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::{
  client::{ApiClient, Me, StudentQuery},
  render, toggle,
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the student list; right pane shows the last opened student.
  StudentList,
  /// Focus on the student detail pane.
  StudentDetail,
  /// The signed-in student's own privacy settings.
  Privacy,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  /// Who the API says we are; `None` until loaded.
  pub me: Option<Me>,

  /// Redacted views of every listed student.
  pub students: Vec<ViewRecord>,

  /// Current fuzzy-filter string (only edited while `filter_active`).
  pub filter: String,
  pub filter_active: bool,

  /// Cursor position within the *filtered* student list.
  pub list_cursor: usize,

  /// The student open in the detail pane.
  pub detail: Option<ViewRecord>,
  pub detail_scroll: usize,

  /// Own privacy settings; loaded on first visit to the privacy screen.
  pub privacy: Option<PrivacySettings>,
  pub privacy_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::StudentList,
      me: None,
      students: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      detail: None,
      detail_scroll: 0,
      privacy: None,
      privacy_cursor: 0,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch identity and the student list.
  pub async fn load(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading students…".into();
    self.me = Some(self.client.me().await?);
    self.students = self.client.list_students(&StudentQuery::default()).await?;
    self.list_cursor = 0;
    self.status_msg = String::new();
    Ok(())
  }

  pub fn signed_in_as(&self) -> Option<&str> {
    self.me.as_ref()?.user.as_ref().map(|u| u.email.as_str())
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Students whose visible name fuzzy-matches the filter. Removed names
  /// never match a non-empty filter.
  pub fn filtered_students(&self) -> Vec<&ViewRecord> {
    filter_by_name(&self.students, &self.filter)
  }

  pub fn cursor_student_id(&self) -> Option<Uuid> {
    self
      .filtered_students()
      .get(self.list_cursor)
      .and_then(|r| render::record_id(r))
  }

  /// The privacy field under the cursor on the privacy screen.
  pub fn cursor_field(&self) -> Option<PrivacyField> {
    PrivacyField::iter().nth(self.privacy_cursor)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      return self.handle_filter_key(key).await;
    }

    match self.screen {
      Screen::StudentList => self.handle_list_key(key).await,
      Screen::StudentDetail => self.handle_detail_key(key).await,
      Screen::Privacy => self.handle_privacy_key(key).await,
    }
  }

  async fn handle_filter_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        let only = match self.filtered_students().as_slice() {
          [one] => render::record_id(one),
          _ => None,
        };
        if let Some(id) = only {
          self.open_detail(id).await;
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_students().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_student_id() {
          self.open_detail(id).await;
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      KeyCode::Char('p') => self.open_privacy().await,

      KeyCode::Char('r') => {
        if let Err(e) = self.load().await {
          self.status_msg = format!("Error: {e}");
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::StudentList;
      }

      KeyCode::Down | KeyCode::Char('j') => {
        let rows = self.detail.as_ref().map(|r| render::detail_rows(r).len()).unwrap_or(0);
        if self.detail_scroll + 1 < rows {
          self.detail_scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      KeyCode::Char(']') | KeyCode::PageDown => {
        let len = self.filtered_students().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
          if let Some(id) = self.cursor_student_id() {
            self.open_detail(id).await;
          }
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          if let Some(id) = self.cursor_student_id() {
            self.open_detail(id).await;
          }
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_privacy_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::StudentList;
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.privacy_cursor + 1 < PrivacyField::iter().count() {
          self.privacy_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.privacy_cursor = self.privacy_cursor.saturating_sub(1);
      }

      KeyCode::Char(' ') | KeyCode::Enter => self.toggle_cursor_field().await,

      _ => {}
    }
    Ok(true)
  }

  /// Load the student's full record into the detail pane.
  async fn open_detail(&mut self, id: Uuid) {
    self.status_msg = "Loading…".into();
    match self.client.get_student(id).await {
      Ok(record) => {
        self.detail = Some(record);
        self.detail_scroll = 0;
        self.screen = Screen::StudentDetail;
        self.status_msg = String::new();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn open_privacy(&mut self) {
    let has_profile = self.me.as_ref().is_some_and(|m| m.student_id.is_some());
    if !has_profile {
      self.status_msg = "Privacy settings belong to signed-in students".into();
      return;
    }
    if self.privacy.is_none() {
      match self.client.privacy_settings().await {
        Ok(settings) => self.privacy = Some(settings),
        Err(e) => {
          self.status_msg = format!("Error: {e}");
          return;
        }
      }
    }
    self.status_msg = String::new();
    self.screen = Screen::Privacy;
  }

  /// Flip the field under the cursor. The list updates before the request
  /// completes and reverts if it fails.
  async fn toggle_cursor_field(&mut self) {
    let Some(field) = self.cursor_field() else { return };
    let Some(user_id) = self.me.as_ref().and_then(|m| m.user.as_ref()).map(|u| u.id) else {
      return;
    };
    let Some(settings) = self.privacy.as_mut() else { return };

    match toggle::toggle_field(self.client.as_ref(), settings, user_id, field).await {
      Ok(true) => self.status_msg = format!("{field} is now private"),
      Ok(false) => self.status_msg = format!("{field} is now public"),
      Err(e) => {
        tracing::warn!(%field, error = %e, "privacy update failed");
        self.status_msg = format!("Could not update {field}: {e}");
      }
    }
  }
}

/// Fuzzy-match students by their visible name.
fn filter_by_name<'a>(students: &'a [ViewRecord], filter: &str) -> Vec<&'a ViewRecord> {
  if filter.is_empty() {
    return students.iter().collect();
  }
  let matcher = SkimMatcherV2::default();
  students
    .iter()
    .filter(|r| {
      render::visible_name(r).is_some_and(|name| matcher.fuzzy_match(name, filter).is_some())
    })
    .collect()
}
