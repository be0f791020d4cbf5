//! HTTP client for the relay server.
//!
//! Two endpoints:
//! - `POST /register` with `{bot_id, api_key}` — announce this client
//! - `GET /alerts/{bot_id}` with `X-API-Key` — pending alerts,
//!   `{"alerts": [{alert_type, message, priority}]}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use alertbot_core::config::RelayConfig;
use alertbot_core::{BotConfig, IncomingAlert};

use crate::error::RelayError;

/// Header carrying the bot's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    bot_id: &'a str,
    api_key: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AlertsResponse {
    #[serde(default)]
    alerts: Vec<IncomingAlert>,
}

// ─────────────────────────────────────────────
// AlertSource trait
// ─────────────────────────────────────────────

/// Anything the sync loop can poll for pending alerts.
///
/// The main implementation is [`RelayClient`].
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetch the alerts currently pending for `config.bot_id`.
    async fn fetch_alerts(&self, config: &BotConfig) -> Result<Vec<IncomingAlert>, RelayError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

// ─────────────────────────────────────────────
// RelayClient
// ─────────────────────────────────────────────

/// Client for the cloud relay server.
#[derive(Clone, Debug)]
pub struct RelayClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Relay base URL (e.g. `"https://curax-alerts.herokuapp.com"`).
    base: Url,
}

impl RelayClient {
    /// Create a client for `server_url` with a per-request `timeout`.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let base = Url::parse(server_url.trim())
            .map_err(|_| RelayError::InvalidUrl(server_url.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(RelayError::InvalidUrl(server_url.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(RelayClient { client, base })
    }

    /// Build a client from the `relay` settings section.
    pub fn from_config(relay: &RelayConfig) -> Result<Self, RelayError> {
        Self::new(&relay.server_url, relay.timeout())
    }

    /// The relay base URL.
    pub fn server_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RelayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn register_url(&self) -> Result<Url, RelayError> {
        self.endpoint(&["register"])
    }

    fn alerts_url(&self, bot_id: &str) -> Result<Url, RelayError> {
        self.endpoint(&["alerts", bot_id])
    }

    /// Register this bot with the relay server.
    pub async fn register(&self, config: &BotConfig) -> Result<(), RelayError> {
        let url = self.register_url()?;
        debug!(url = %url, bot_id = %config.bot_id, "registering bot");

        let response = self
            .client
            .post(url)
            .json(&RegisterRequest {
                bot_id: &config.bot_id,
                api_key: &config.api_key,
            })
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Register without propagating failures.
    ///
    /// Returns whether the relay accepted the registration.
    pub async fn register_fire_and_forget(&self, config: &BotConfig) -> bool {
        match self.register(config).await {
            Ok(()) => {
                info!(bot_id = %config.bot_id, "bot registered with relay server");
                true
            }
            Err(e) => {
                warn!(bot_id = %config.bot_id, error = %e, "relay registration failed");
                false
            }
        }
    }
}

#[async_trait]
impl AlertSource for RelayClient {
    async fn fetch_alerts(&self, config: &BotConfig) -> Result<Vec<IncomingAlert>, RelayError> {
        let url = self.alerts_url(&config.bot_id)?;

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &config.api_key)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: AlertsResponse = response.json().await?;

        debug!(count = body.alerts.len(), "fetched pending alerts");
        Ok(body.alerts)
    }

    fn display_name(&self) -> &str {
        "relay"
    }
}

/// Turn a non-2xx response into `RelayError::Status`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(RelayError::Status { status, body })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alertbot_core::Priority;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot() -> BotConfig {
        BotConfig::new("7C1D2E3F", "5d0b3a6e-0f41-4d8a-b8e7-2f1f5b7f9a10", "admin")
    }

    fn client(uri: &str) -> RelayClient {
        RelayClient::new(uri, Duration::from_secs(5)).unwrap()
    }

    // ── Unit tests ──

    #[test]
    fn test_alerts_url_trailing_slash() {
        let client = client("https://relay.example.org/");
        assert_eq!(
            client.alerts_url("7C1D2E3F").unwrap().as_str(),
            "https://relay.example.org/alerts/7C1D2E3F"
        );
    }

    #[test]
    fn test_register_url_with_base_path() {
        let client = client("https://relay.example.org/api");
        assert_eq!(
            client.register_url().unwrap().as_str(),
            "https://relay.example.org/api/register"
        );
    }

    #[test]
    fn test_bot_id_is_escaped() {
        let client = client("http://localhost:8000");
        assert_eq!(
            client.alerts_url("a/b c").unwrap().as_str(),
            "http://localhost:8000/alerts/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(matches!(
            RelayClient::new("not a url", Duration::from_secs(5)),
            Err(RelayError::InvalidUrl(_))
        ));
        assert!(matches!(
            RelayClient::new("ftp://relay.example.org", Duration::from_secs(5)),
            Err(RelayError::InvalidUrl(_))
        ));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_fetch_alerts_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alerts/7C1D2E3F"))
            .and(header("X-API-Key", "5d0b3a6e-0f41-4d8a-b8e7-2f1f5b7f9a10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "alerts": [
                    {"alert_type": "Missed Dose", "message": "Aspirin at 09:00", "priority": "HIGH"},
                    {"alert_type": "Low Stock", "message": "3 pills left", "priority": "LOW"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let alerts = client(&mock_server.uri()).fetch_alerts(&bot()).await.unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].alert_type, "Missed Dose");
        assert_eq!(alerts[0].priority, Priority::High);
        assert_eq!(alerts[1].message, "3 pills left");
    }

    #[tokio::test]
    async fn test_fetch_alerts_missing_key_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alerts/7C1D2E3F"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let alerts = client(&mock_server.uri()).fetch_alerts(&bot()).await.unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_alerts_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alerts/7C1D2E3F"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri()).fetch_alerts(&bot()).await.unwrap_err();
        match err {
            RelayError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_alerts_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alerts/7C1D2E3F"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri()).fetch_alerts(&bot()).await.unwrap_err();
        assert!(matches!(err, RelayError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_alerts_network_error() {
        // Point to a port that's not listening
        let err = client("http://127.0.0.1:1").fetch_alerts(&bot()).await.unwrap_err();
        assert!(matches!(err, RelayError::Http(_)));
    }

    #[tokio::test]
    async fn test_register_sends_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_json(serde_json::json!({
                "bot_id": "7C1D2E3F",
                "api_key": "5d0b3a6e-0f41-4d8a-b8e7-2f1f5b7f9a10"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        client.register(&bot()).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_fire_and_forget_swallows_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        assert!(!client(&mock_server.uri()).register_fire_and_forget(&bot()).await);
        assert!(!client("http://127.0.0.1:1").register_fire_and_forget(&bot()).await);
    }
}
