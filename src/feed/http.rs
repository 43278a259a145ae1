//! HTTP result feed
//!
//! Polls a single endpoint that answers with a JSON object carrying the most
//! recent result, e.g. `{"result": "Player A", "match_id": 812}`.

use super::ResultFeed;
use crate::input::RESULT_FIELD;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a single attempt failed
#[derive(Debug)]
enum AttemptError {
    /// Worth another try (transport error, 408, 429, 5xx)
    Transient(String),
    /// Retrying cannot help (bad payload, 4xx)
    Permanent(String),
}

/// HTTP feed client with a bounded timeout and retry logic
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
    field: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFeed {
    /// Create a new feed for `url`; every request is capped at `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            field: RESULT_FIELD.to_string(),
            max_retries: 2,
            retry_delay: Duration::from_millis(1000),
        })
    }

    /// Set the JSON field holding the result
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Set maximum retry attempts
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set delay between retries
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One request, no retries
    async fn attempt(&self) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let msg = format!("endpoint answered {}", status);
            return Err(if is_retryable(status) {
                AttemptError::Transient(msg)
            } else {
                AttemptError::Permanent(msg)
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(format!("failed to read body: {}", e)))?;

        extract_field(&body, &self.field).map_err(AttemptError::Permanent)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

/// Pull `field` out of a JSON object body as a string
fn extract_field(body: &str, field: &str) -> std::result::Result<String, String> {
    let payload: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("malformed payload: {}", e))?;

    match payload.get(field) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Null) | None => Err(format!("payload has no '{}' field", field)),
        Some(other) => Err(format!("'{}' is not a string: {}", field, other)),
    }
}

#[async_trait]
impl ResultFeed for HttpFeed {
    async fn fetch_result(&self) -> Result<String> {
        let mut last_error = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let jitter_ms = self.retry_delay.as_millis() as u64 / 4;
                let jitter = if jitter_ms > 0 {
                    Duration::from_millis(rand::random::<u64>() % jitter_ms)
                } else {
                    Duration::ZERO
                };
                let delay = self.retry_delay + jitter;
                tracing::debug!("Retrying after {:?} (attempt {})", delay, attempt);
                sleep(delay).await;
            }

            match self.attempt().await {
                Ok(label) => {
                    tracing::debug!(url = %self.url, "Fetched result {:?}", label);
                    return Ok(label);
                }
                Err(AttemptError::Permanent(msg)) => {
                    tracing::warn!("Feed error (attempt {}): {}", attempt + 1, msg);
                    return Err(Error::FetchFailure(msg));
                }
                Err(AttemptError::Transient(msg)) => {
                    tracing::warn!("Feed error (attempt {}): {}", attempt + 1, msg);
                    last_error = msg;
                }
            }
        }

        Err(Error::FetchFailure(format!(
            "failed after {} attempts: {}",
            self.max_retries + 1,
            last_error
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_for(server: &MockServer) -> HttpFeed {
        HttpFeed::new(format!("{}/latest", server.uri()), Duration::from_secs(2))
            .unwrap()
            .with_retry_delay(Duration::ZERO)
    }

    #[test]
    fn test_extract_field() {
        assert_eq!(extract_field(r#"{"result": "A"}"#, "result").unwrap(), "A");
        assert!(extract_field("not json", "result").is_err());
        assert!(extract_field(r#"{"winner": "A"}"#, "result").is_err());
        assert!(extract_field(r#"{"result": null}"#, "result").is_err());
        assert!(extract_field(r#"{"result": 1}"#, "result").is_err());
    }

    #[tokio::test]
    async fn test_fetches_result_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": "Player B", "id": 7})),
            )
            .mount(&server)
            .await;

        let label = feed_for(&server).fetch_result().await.unwrap();
        assert_eq!(label, "Player B");
    }

    #[tokio::test]
    async fn test_custom_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"winner": "A"})),
            )
            .mount(&server)
            .await;

        let feed = feed_for(&server).with_field("winner");
        assert_eq!(feed.fetch_result().await.unwrap(), "A");
    }

    #[tokio::test]
    async fn test_missing_field_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let err = feed_for(&server).fetch_result().await.unwrap_err();
        assert!(matches!(err, Error::FetchFailure(ref m) if m.contains("no 'result' field")));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let err = feed_for(&server)
            .with_max_retries(2)
            .fetch_result()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FetchFailure(ref m) if m.contains("after 3 attempts")));
    }

    #[tokio::test]
    async fn test_not_found_fails_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = feed_for(&server).fetch_result().await.unwrap_err();
        assert!(matches!(err, Error::FetchFailure(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let feed = HttpFeed::new("http://127.0.0.1:9/latest", Duration::from_millis(500))
            .unwrap()
            .with_max_retries(0);
        let err = feed.fetch_result().await.unwrap_err();
        assert!(matches!(err, Error::FetchFailure(_)));
    }
}
