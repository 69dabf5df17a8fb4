//! Mailing-list subscription.
//!
//! Talks to a MailerLite-compatible subscriber endpoint. A subscriber that
//! already exists (HTTP 409) is treated as success.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{info, instrument, warn};
use url::Url;

use healthreport_shared::{HealthReportError, NewsletterConfig, Result, newsletter_api_key};

const USER_AGENT: &str = concat!("healthreport/", env!("CARGO_PKG_VERSION"));

/// Reject obviously unusable addresses before any network call.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(HealthReportError::validation("Invalid email address"));
    }
    Ok(())
}

/// How a successful subscription request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

#[derive(Serialize)]
struct SubscriberRequest<'a> {
    email: &'a str,
    status: &'a str,
    fields: SubscriberFields<'a>,
}

#[derive(Serialize)]
struct SubscriberFields<'a> {
    source: &'a str,
}

/// HTTP client for the subscriber endpoint.
pub struct NewsletterClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    source: String,
}

impl NewsletterClient {
    pub fn new(endpoint: &str, api_key: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            HealthReportError::config(format!("invalid newsletter endpoint {endpoint:?}: {e}"))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| HealthReportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            source: source.into(),
        })
    }

    /// Build a client from config, reading the API key from the environment.
    pub fn from_config(config: &NewsletterConfig) -> Result<Self> {
        let api_key = newsletter_api_key(config)?;
        Self::new(&config.endpoint, api_key, config.source.clone())
    }

    /// Subscribe `email` as an active subscriber.
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome> {
        validate_email(email)?;
        let email = email.trim();

        let body = SubscriberRequest {
            email,
            status: "active",
            fields: SubscriberFields {
                source: &self.source,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| HealthReportError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if status.is_success() {
            info!("subscriber added");
            return Ok(SubscribeOutcome::Subscribed);
        }
        if status == StatusCode::CONFLICT {
            info!("subscriber already exists");
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        let detail = response.text().await.unwrap_or_default();
        warn!(%status, detail = %detail, "subscription rejected");
        Err(HealthReportError::Subscription(format!("HTTP {status}")))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> NewsletterClient {
        NewsletterClient::new(
            &format!("{}/api/subscribers", server.uri()),
            "test-key",
            "website_popup",
        )
        .unwrap()
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("  ").is_err());
        assert!(validate_email("no-at-sign").is_err());

        let err = validate_email("").unwrap_err();
        assert!(matches!(err, HealthReportError::Validation { .. }));
    }

    #[tokio::test]
    async fn subscribe_posts_expected_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/subscribers"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(serde_json::json!({
                "email": "reader@example.com",
                "status": "active",
                "fields": { "source": "website_popup" }
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .subscribe(" reader@example.com ")
            .await
            .expect("subscribe");
        assert_eq!(outcome, SubscribeOutcome::Subscribed);
    }

    #[tokio::test]
    async fn conflict_means_already_subscribed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .subscribe("reader@example.com")
            .await
            .expect("subscribe");
        assert_eq!(outcome, SubscribeOutcome::AlreadySubscribed);
    }

    #[tokio::test]
    async fn provider_error_is_subscription_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(422).set_body_string(r#"{"message":"invalid"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .subscribe("reader@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, HealthReportError::Subscription(_)));
        assert!(err.to_string().contains("422"));
    }

    #[tokio::test]
    async fn invalid_email_never_hits_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).subscribe("nope").await.unwrap_err();
        assert!(matches!(err, HealthReportError::Validation { .. }));
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config = NewsletterConfig {
            api_key_env: "HEALTHREPORT_TEST_UNSET_KEY".into(),
            ..NewsletterConfig::default()
        };
        let err = NewsletterClient::from_config(&config).err().expect("error");
        assert!(matches!(err, HealthReportError::Config { .. }));
        assert!(err.to_string().contains("API key not found"));
    }
}
