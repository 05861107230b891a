//! Async HTTP client for the mission service.
//!
//! Every endpoint answers with a JSON envelope `{success, error?, mission?,
//! missions?}`. Each request carries a deadline, and transient failures
//! (network, timeout) are retried once.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use voidline_core::config::MissionConfig;
use voidline_core::events::GameEvent;
use voidline_core::mission::{FactionStandings, Mission, MissionId};

use crate::error::{MissionError, Result};

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub mission: Option<Mission>,
    #[serde(default)]
    pub missions: Option<Vec<Mission>>,
    #[serde(default)]
    pub templates: Option<Vec<Value>>,
}

impl Envelope {
    /// Turn `success: false` into an API error.
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(MissionError::Api {
                status: 200,
                message: self.error.unwrap_or_else(|| "request failed".into()),
            })
        }
    }

    fn into_mission(self) -> Result<Mission> {
        self.mission
            .ok_or_else(|| MissionError::Api {
                status: 200,
                message: "response carried no mission".into(),
            })
    }

    fn into_missions(self) -> Vec<Mission> {
        match (self.missions, self.mission) {
            (Some(list), _) => list,
            (None, Some(single)) => vec![single],
            (None, None) => Vec::new(),
        }
    }
}

/// Parameters for `POST /api/missions/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub template_id: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
}

pub struct MissionClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl MissionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &MissionConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// `GET /api/missions?location=…&faction_standings=…`
    pub async fn available(
        &self,
        location: &str,
        standings: &FactionStandings,
    ) -> Result<Vec<Mission>> {
        let query = [
            ("location", location.to_string()),
            ("faction_standings", standings.to_query_value()),
        ];
        let envelope = self.call(Method::GET, "", &query, None).await?;
        Ok(envelope.into_missions())
    }

    /// `GET /api/missions/active`
    pub async fn active(&self) -> Result<Vec<Mission>> {
        let envelope = self.call(Method::GET, "/active", &[], None).await?;
        Ok(envelope.into_missions())
    }

    /// `POST /api/missions/active/clear`
    pub async fn clear_active(&self) -> Result<()> {
        self.call(Method::POST, "/active/clear", &[], None).await?;
        Ok(())
    }

    /// `POST /api/missions/{id}/accept`
    pub async fn accept(&self, id: &MissionId) -> Result<Mission> {
        let path = format!("/{id}/accept");
        self.call(Method::POST, &path, &[], None).await?.into_mission()
    }

    /// `POST /api/missions/{id}/abandon`
    pub async fn abandon(&self, id: &MissionId) -> Result<Option<Mission>> {
        let path = format!("/{id}/abandon");
        Ok(self.call(Method::POST, &path, &[], None).await?.mission)
    }

    /// `POST /api/missions/{id}/objectives/{oid}/complete`
    pub async fn complete_objective(&self, id: &MissionId, objective_id: &str) -> Result<Mission> {
        let path = format!("/{id}/objectives/{objective_id}/complete");
        self.call(Method::POST, &path, &[], None).await?.into_mission()
    }

    /// `POST /api/missions/{id}/progress`
    pub async fn update_progress(&self, id: &MissionId, progress: &Value) -> Result<Mission> {
        let path = format!("/{id}/progress");
        self.call(Method::POST, &path, &[], Some(progress))
            .await?
            .into_mission()
    }

    /// `POST /api/missions/events/{kind}`. Returns the missions the event
    /// updated.
    pub async fn report_event(&self, event: &GameEvent) -> Result<Vec<Mission>> {
        let (kind, body) = event_request(event)?;
        let path = format!("/events/{kind}");
        let envelope = self.call(Method::POST, &path, &[], Some(&body)).await?;
        Ok(envelope.into_missions())
    }

    /// `GET /api/missions/templates`
    pub async fn templates(&self) -> Result<Vec<Value>> {
        let envelope = self.call(Method::GET, "/templates", &[], None).await?;
        Ok(envelope.templates.unwrap_or_default())
    }

    /// `POST /api/missions/generate`
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Mission> {
        let body = serde_json::to_value(request)?;
        self.call(Method::POST, "/generate", &[], Some(&body))
            .await?
            .into_mission()
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Envelope> {
        match self.call_once(method.clone(), path, query, body).await {
            Err(err) if err.is_transient() => {
                warn!(path, error = %err, "mission request failed, retrying once");
                self.call_once(method, path, query, body).await
            }
            other => other,
        }
    }

    async fn call_once(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Envelope> {
        let url = endpoint_url(&self.base_url, path);
        debug!(%method, %url, "mission request");

        let mut request = self
            .client
            .request(method, &url)
            .timeout(self.timeout)
            .header("content-type", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Envelope>(&text)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or(text);
            return Err(MissionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        decode_envelope(&text)
    }
}

/// Full URL for a path under `/api/missions`.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/api/missions{}", base_url.trim_end_matches('/'), path)
}

/// Parse and check a response body.
pub fn decode_envelope(body: &str) -> Result<Envelope> {
    let envelope: Envelope = serde_json::from_str(body)?;
    envelope.into_result()
}

/// Event kind and JSON body for a combat-side event.
pub fn event_request(event: &GameEvent) -> Result<(&'static str, Value)> {
    let kind = event.service_kind().ok_or_else(|| MissionError::Api {
        status: 0,
        message: "event is not reported to the mission service".into(),
    })?;
    let mut body = serde_json::to_value(event)?;
    if let Value::Object(map) = &mut body {
        map.remove("type");
    }
    Ok((kind, body))
}
