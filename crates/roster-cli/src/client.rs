//! Async HTTP client wrapping the roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use roster_core::{
  field::PrivacyField,
  filter::{FilterMode, ViewRecord},
  identity::User,
  reference::{NewReference, ReferenceItem, ReferenceKind},
  search::SearchMode,
  setting::{PrivacySetting, PrivacySettings},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the roster API.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Bearer token; takes precedence over email/password.
  pub token:    String,
  pub email:    String,
  pub password: String,
}

/// `GET /auth/me` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
  pub user:       Option<User>,
  pub student_id: Option<Uuid>,
}

/// Structured listing filters, sent as query parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentQuery {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub campus_id:         Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub course_id:         Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub major_id:          Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department_id:     Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub year_of_admission: Option<i32>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub include_alumni:    bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub limit:             Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub offset:            Option<usize>,
}

/// Async HTTP client for the roster JSON REST API.
///
/// Lists and search results come back redacted, so a hidden field is an
/// absent key; a single student comes back masked.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if !self.config.token.is_empty() {
      req.bearer_auth(&self.config.token)
    } else if !self.config.email.is_empty() {
      req.basic_auth(&self.config.email, Some(&self.config.password))
    } else {
      req
    }
  }

  /// Send `req`, turning a non-2xx status into an error carrying the
  /// server's `{"error": …}` message when there is one.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    tracing::debug!(%status, "{what}");
    if status.is_success() {
      return Ok(resp);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
      error: String,
    }
    match resp.json::<ErrorBody>().await {
      Ok(body) => Err(anyhow!("{what} → {status}: {}", body.error)),
      Err(_) => Err(anyhow!("{what} → {status}")),
    }
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  /// `GET /api/auth/me`
  pub async fn me(&self) -> Result<Me> {
    self
      .send(self.client.get(self.url("/auth/me")), "GET /auth/me")
      .await?
      .json()
      .await
      .context("deserialising identity")
  }

  // ── Students ──────────────────────────────────────────────────────────────

  /// `GET /api/students?view=redact&…`
  pub async fn list_students(&self, query: &StudentQuery) -> Result<Vec<ViewRecord>> {
    let req = self
      .client
      .get(self.url("/students"))
      .query(query)
      .query(&[("view", "redact")]);
    self
      .send(req, "GET /students")
      .await?
      .json()
      .await
      .context("deserialising students")
  }

  /// `GET /api/students/{id}?view=mask`
  pub async fn get_student(&self, id: Uuid) -> Result<ViewRecord> {
    let req = self
      .client
      .get(self.url(&format!("/students/{id}")))
      .query(&[("view", "mask")]);
    self
      .send(req, "GET /students/{id}")
      .await?
      .json()
      .await
      .context("deserialising student")
  }

  /// `POST /api/students/search`
  pub async fn search(
    &self,
    term: &str,
    mode: SearchMode,
    query: &StudentQuery,
  ) -> Result<Vec<ViewRecord>> {
    let mut body = serde_json::to_value(query).context("encoding filters")?;
    if let Some(obj) = body.as_object_mut() {
      obj.insert("term".into(), json!(term));
      obj.insert("mode".into(), json!(mode));
      obj.insert("view".into(), json!(FilterMode::Redact));
    }
    let req = self.client.post(self.url("/students/search")).json(&body);
    self
      .send(req, "POST /students/search")
      .await?
      .json()
      .await
      .context("deserialising search results")
  }

  // ── Privacy ───────────────────────────────────────────────────────────────

  /// `GET /api/privacy-settings`
  pub async fn privacy_settings(&self) -> Result<PrivacySettings> {
    self
      .send(self.client.get(self.url("/privacy-settings")), "GET /privacy-settings")
      .await?
      .json()
      .await
      .context("deserialising privacy settings")
  }

  /// `PUT /api/privacy-settings/{field}`
  pub async fn set_privacy(
    &self,
    field: PrivacyField,
    is_private: bool,
  ) -> Result<PrivacySetting> {
    let req = self
      .client
      .put(self.url(&format!("/privacy-settings/{}", field.as_str())))
      .json(&json!({ "is_private": is_private }));
    self
      .send(req, "PUT /privacy-settings/{field}")
      .await?
      .json()
      .await
      .context("deserialising privacy setting")
  }

  // ── Reference data ────────────────────────────────────────────────────────

  /// `GET /api/{kind}`
  pub async fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>> {
    let path = format!("/{}", kind.plural());
    self
      .send(self.client.get(self.url(&path)), &format!("GET {path}"))
      .await?
      .json()
      .await
      .context("deserialising reference items")
  }

  /// `POST /api/{kind}` (admin only)
  pub async fn create_reference(
    &self,
    kind: ReferenceKind,
    item: &NewReference,
  ) -> Result<ReferenceItem> {
    let path = format!("/{}", kind.plural());
    self
      .send(self.client.post(self.url(&path)).json(item), &format!("POST {path}"))
      .await?
      .json()
      .await
      .context("deserialising reference item")
  }
}
