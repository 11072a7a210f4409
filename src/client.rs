use crate::classifier::Query;
use crate::config::Config;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const FORECAST_PATH: &str = "/live-model-test";
pub const CONFIRM_PATH: &str = "/confirm-sell";
pub const HEALTH_PATH: &str = "/health";

/// Response body of the forecasting backend. Only `message` and
/// `follow_up` drive the conversation; the rest is carried along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

impl BackendPayload {
    /// Locally synthesized error reply, shaped like a backend answer
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Some("error".to_string()),
            sender: Some("bot".to_string()),
            message: Some(message.into()),
            follow_up: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.status.as_deref().unwrap_or("unknown");
        match &self.service {
            Some(service) => write!(f, "{} ({})", status, service),
            None => write!(f, "{}", status),
        }
    }
}

/// HTTP client for the forecasting backend
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base_url = config.backend_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(config.backend_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a query. Every parameter goes through the same
    /// percent-encoder, so spaces become `%20`.
    pub fn query_url(&self, query: &Query) -> String {
        match query {
            Query::Forecast { region, crop } => format!(
                "{}{}?crop={}&region={}",
                self.base_url,
                FORECAST_PATH,
                urlencoding::encode(crop),
                urlencoding::encode(region),
            ),
            Query::Confirm { token, region, crop } => format!(
                "{}{}?response={}&crop={}&region={}",
                self.base_url,
                CONFIRM_PATH,
                urlencoding::encode(token.as_str()),
                urlencoding::encode(crop),
                urlencoding::encode(region),
            ),
        }
    }

    /// POST the query with no body and decode the answer.
    ///
    /// A 2xx answer whose body is not the expected JSON yields an empty
    /// payload, which adds no bot turn.
    pub async fn send(&self, query: &Query) -> Result<BackendPayload, ClientError> {
        let url = self.query_url(query);
        debug!(%url, "sending backend query");

        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        match serde_json::from_slice::<BackendPayload>(&bytes) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                warn!(error = %e, "backend answered with an unexpected body");
                Ok(BackendPayload::default())
            }
        }
    }

    /// Probe `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response.json::<HealthStatus>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ConfirmToken;

    fn client() -> BackendClient {
        BackendClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_forecast_url_encodes_region_spaces() {
        let url = client().query_url(&Query::Forecast {
            region: "Central Luzon".into(),
            crop: "Tomato".into(),
        });
        assert_eq!(
            url,
            "http://localhost:8000/live-model-test?crop=Tomato&region=Central%20Luzon"
        );
    }

    #[test]
    fn test_confirm_url_encodes_every_parameter() {
        let url = client().query_url(&Query::Confirm {
            token: ConfirmToken::Oo,
            region: "Cagayan Valley (Region II)".into(),
            crop: "Sweet Potato".into(),
        });
        assert_eq!(
            url,
            "http://localhost:8000/confirm-sell?response=OO&crop=Sweet%20Potato&region=Cagayan%20Valley%20%28Region%20II%29"
        );
    }

    #[test]
    fn test_reserved_characters_cannot_inject_parameters() {
        let url = client().query_url(&Query::Forecast {
            region: "A&region=B".into(),
            crop: "Rice#1".into(),
        });
        assert!(url.ends_with("?crop=Rice%231&region=A%26region%3DB"));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = Config {
            backend_url: "http://localhost:8000/".into(),
            ..Config::default()
        };
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = Config {
            backend_url: "localhost:8000".into(),
            ..Config::default()
        };
        assert!(matches!(BackendClient::new(&config), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_payload_ignores_unknown_fields() {
        let payload: BackendPayload =
            serde_json::from_str(r#"{"message":"A","follow_up":"B","price":65.27}"#).unwrap();
        assert_eq!(payload.message.as_deref(), Some("A"));
        assert_eq!(payload.follow_up.as_deref(), Some("B"));
        assert_eq!(payload.status, None);
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = BackendPayload::error("nope");
        assert!(payload.is_error());
        assert_eq!(payload.sender.as_deref(), Some("bot"));
        assert_eq!(payload.message.as_deref(), Some("nope"));
    }
}
