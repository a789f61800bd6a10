use std::time::Duration;

use async_trait::async_trait;
use models::{ModelSpec, RawEntity, SearchCondition};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::EntityService;
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct CyodaClientConfig {
    /// e.g. `https://platform.example.com/api`
    pub base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
}

/// REST client for the entity platform.
pub struct CyodaHttpClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl CyodaHttpClient {
    pub fn new(cfg: CyodaClientConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| ServiceError::Platform(format!("cannot build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_token: cfg.api_token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn entity_url(&self, model: &ModelSpec) -> String {
        format!("{}/entity/{}/{}", self.base_url, model.name, model.version)
    }

    fn entity_id_url(&self, model: &ModelSpec, id: Uuid) -> String {
        format!("{}/{}", self.entity_url(model), id)
    }

    fn search_url(&self, model: &ModelSpec) -> String {
        format!("{}/search/{}/{}", self.base_url, model.name, model.version)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let req = match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        req.send().await.map_err(|e| {
            warn!(error = %e, "entity_platform_request_failed");
            if e.is_connect() || e.is_timeout() {
                ServiceError::Unavailable(e.to_string())
            } else {
                ServiceError::Platform(e.to_string())
            }
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Platform(format!("unexpected platform response: {e}")))
    }
}

/// Best-effort extraction of a readable message from an error body.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = json.get(key).and_then(Value::as_str) {
                if !msg.trim().is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status.canonical_reason().map(str::to_string).unwrap_or_else(|| status.to_string())
}

/// Map a non-success platform response onto the service error taxonomy.
pub fn classify_status(status: StatusCode, message: String, transition_requested: bool) -> ServiceError {
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(message),
        StatusCode::CONFLICT => ServiceError::Duplicate(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if transition_requested => {
            ServiceError::TransitionRejected(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ServiceError::Validation(message),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            ServiceError::Unavailable(message)
        }
        _ => ServiceError::Platform(message),
    }
}

async fn check(resp: Response, transition_requested: bool) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = extract_error_message(status, &body);
    debug!(%status, %message, "entity_platform_error_response");
    Err(classify_status(status, message, transition_requested))
}

#[async_trait]
impl EntityService for CyodaHttpClient {
    async fn create(&self, model: &ModelSpec, payload: Value) -> Result<RawEntity, ServiceError> {
        let resp = self.send(self.http.post(self.entity_url(model)).json(&payload)).await?;
        Self::decode(check(resp, false).await?).await
    }

    async fn get_by_id(&self, model: &ModelSpec, id: Uuid) -> Result<RawEntity, ServiceError> {
        let resp = self.send(self.http.get(self.entity_id_url(model, id))).await?;
        Self::decode(check(resp, false).await?).await
    }

    async fn find_by_business_id(&self, model: &ModelSpec, field: &str, value: &str) -> Result<Option<RawEntity>, ServiceError> {
        let hits = self.search(model, &SearchCondition::field_equals(field, value)).await?;
        Ok(hits.into_iter().next())
    }

    async fn update(&self, model: &ModelSpec, id: Uuid, payload: Value, transition: Option<&str>) -> Result<RawEntity, ServiceError> {
        let mut req = self.http.put(self.entity_id_url(model, id)).json(&payload);
        if let Some(t) = transition {
            req = req.query(&[("transition", t)]);
        }
        let resp = self.send(req).await?;
        Self::decode(check(resp, transition.is_some()).await?).await
    }

    async fn search(&self, model: &ModelSpec, condition: &SearchCondition) -> Result<Vec<RawEntity>, ServiceError> {
        let resp = self.send(self.http.post(self.search_url(model)).json(condition)).await?;
        Self::decode(check(resp, false).await?).await
    }

    async fn delete(&self, model: &ModelSpec, id: Uuid) -> Result<(), ServiceError> {
        let resp = self.send(self.http.delete(self.entity_id_url(model, id))).await?;
        check(resp, false).await?;
        Ok(())
    }
}
