//! HTTP client for the Azure Text Analytics service.
//!
//! This module provides [`TextAnalyticsClient`], the pipeline used by the
//! service crates to call the Text Analytics REST API. The client handles
//! authentication, endpoint management, API versioning, and automatic retry
//! of transient errors.
//!
//! # Examples
//!
//! ## Using an API key
//! ```rust,no_run
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//! use azure_text_analytics_core::auth::TextAnalyticsCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TextAnalyticsClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(TextAnalyticsCredential::api_key("your-key"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## From the environment
//!
//! With `AZURE_TEXT_ANALYTICS_ENDPOINT` and `AZURE_TEXT_ANALYTICS_KEY` set:
//!
//! ```rust,no_run
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TextAnalyticsClient::builder().build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::TextAnalyticsCredential;
use crate::error::{TextAnalyticsError, TextAnalyticsResult};
use reqwest::Client as HttpClient;
use url::Url;

use std::time::Duration;

/// Default API version for the Text Analytics service.
pub const DEFAULT_API_VERSION: &str = "v3.1-preview.4";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Determines if an HTTP status code represents a retriable error.
///
/// Retriable errors are transient server-side issues that may succeed on retry:
/// - 429 Too Many Requests (rate limiting)
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (2^attempt * initial_backoff).
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// The base client for interacting with the Text Analytics API.
///
/// The client handles authentication, HTTP transport, and endpoint
/// management. Service crates (`azure_text_analytics_batch`) use it to make
/// API calls; the API version is a path segment under `/text/analytics/`.
///
/// The client is cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct TextAnalyticsClient {
    http: HttpClient,
    endpoint: Url,
    credential: TextAnalyticsCredential,
    api_version: String,
    retry_policy: RetryPolicy,
}

/// Builder for constructing a [`TextAnalyticsClient`].
///
/// Use [`TextAnalyticsClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct TextAnalyticsClientBuilder {
    endpoint: Option<String>,
    credential: Option<TextAnalyticsCredential>,
    api_version: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
}

impl TextAnalyticsClient {
    /// Create a new builder for configuring a `TextAnalyticsClient`.
    pub fn builder() -> TextAnalyticsClientBuilder {
        TextAnalyticsClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the API version being used.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the retry policy configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Build a full URL for a service path.
    ///
    /// The path is appended under `/text/analytics/{api-version}/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> TextAnalyticsResult<Url> {
        let relative = format!(
            "text/analytics/{}/{}",
            self.api_version,
            path.trim_start_matches('/')
        );
        self.endpoint.join(&relative).map_err(|e| {
            TextAnalyticsError::invalid_endpoint_with_source("failed to construct URL", e)
        })
    }

    /// Send a GET request to the API with automatic retry on transient errors.
    ///
    /// Automatically adds the authentication header. Retries on retriable
    /// HTTP errors (429, 500, 502, 503, 504) with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retries or the
    /// server returns a non-retriable error response.
    pub async fn get(&self, path: &str) -> TextAnalyticsResult<reqwest::Response> {
        let url = self.url(path)?;
        let (auth_header, auth_value) = self.credential.resolve();

        for attempt in 0..=self.retry_policy.max_retries {
            let response = self
                .http
                .get(url.clone())
                .header(auth_header, &auth_value)
                .send()
                .await?;

            let status = response.status().as_u16();

            if response.status().is_success() {
                return Ok(response);
            }

            if !is_retriable_status(status) || attempt == self.retry_policy.max_retries {
                return Self::check_response(response).await;
            }

            self.backoff(attempt).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Send a POST request with a JSON body, with automatic retry on
    /// transient errors.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the request fails after all
    /// retries, or the server returns a non-retriable error response.
    pub async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> TextAnalyticsResult<reqwest::Response> {
        let url = self.url(path)?;
        let (auth_header, auth_value) = self.credential.resolve();

        for attempt in 0..=self.retry_policy.max_retries {
            let response = self
                .http
                .post(url.clone())
                .header(auth_header, &auth_value)
                .json(body)
                .send()
                .await?;

            let status = response.status().as_u16();

            if response.status().is_success() {
                return Ok(response);
            }

            if !is_retriable_status(status) || attempt == self.retry_policy.max_retries {
                return Self::check_response(response).await;
            }

            self.backoff(attempt).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Sleep for the backoff of the given attempt.
    ///
    /// Backoff is exponential (2^attempt * initial) with a jitter factor
    /// in [0.75, 1.25].
    async fn backoff(&self, attempt: u32) {
        let base_backoff = self.retry_policy.initial_backoff * 2_u32.pow(attempt);
        let jitter = 0.75 + fastrand::f64() * 0.5;
        let backoff = base_backoff.mul_f64(jitter);
        tokio::time::sleep(backoff).await;
    }

    /// Maximum length for error messages carried in errors.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Truncate a message if it exceeds the maximum length.
    pub(crate) fn truncate_message(msg: &str) -> String {
        if msg.len() > Self::MAX_ERROR_MESSAGE_LEN {
            let mut end = Self::MAX_ERROR_MESSAGE_LEN;
            while !msg.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &msg[..end])
        } else {
            msg.to_string()
        }
    }

    /// Check the response status and translate error payloads.
    ///
    /// The service wraps errors as `{"error": {"code", "message",
    /// "innererror"}}` where `innererror`, when present, carries the more
    /// specific code and message. HTTP 401 maps to
    /// [`TextAnalyticsError::Auth`].
    async fn check_response(response: reqwest::Response) -> TextAnalyticsResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err_obj) = value.get("error") {
                // innererror carries the specific code (e.g. InvalidDocument)
                let detail = err_obj.get("innererror").unwrap_or(err_obj);
                let code = detail
                    .get("code")
                    .and_then(|c| c.as_str())
                    .unwrap_or("unknown")
                    .to_string();
                let message = Self::truncate_message(
                    detail
                        .get("message")
                        .and_then(|m| m.as_str())
                        .unwrap_or(&body),
                );

                if status == 401 {
                    return Err(TextAnalyticsError::Auth(format!("{code}: {message}")));
                }
                return Err(TextAnalyticsError::Api { code, message });
            }
        }

        if status == 401 {
            return Err(TextAnalyticsError::Auth(Self::truncate_message(&body)));
        }

        Err(TextAnalyticsError::Http {
            status,
            message: Self::truncate_message(&body),
        })
    }
}

impl TextAnalyticsClientBuilder {
    /// Set the Text Analytics endpoint URL.
    ///
    /// This should be in the format:
    /// `https://<resource-name>.cognitiveservices.azure.com`
    ///
    /// If not set, the builder will check the `AZURE_TEXT_ANALYTICS_ENDPOINT`
    /// environment variable.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder will use
    /// [`TextAnalyticsCredential::from_env()`], which reads
    /// `AZURE_TEXT_ANALYTICS_KEY`.
    pub fn credential(mut self, credential: TextAnalyticsCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the API version.
    ///
    /// Defaults to [`DEFAULT_API_VERSION`] (`v3.1-preview.4`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// Use this to configure proxies or other HTTP settings.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout
    /// configuration via [`connect_timeout`](Self::connect_timeout) or
    /// [`read_timeout`](Self::read_timeout) will be ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    ///
    /// **Note:** This setting is ignored if a custom HTTP client is provided
    /// via [`http_client`](Self::http_client).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    ///
    /// This covers the entire request/response cycle including reading the
    /// body.
    ///
    /// **Note:** This setting is ignored if a custom HTTP client is provided
    /// via [`http_client`](Self::http_client).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry policy for transient errors.
    ///
    /// Defaults to 3 retries with 500ms initial backoff.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Build the `TextAnalyticsClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No endpoint is provided and `AZURE_TEXT_ANALYTICS_ENDPOINT` is not set
    /// - The endpoint URL is invalid
    /// - No credential is provided and `AZURE_TEXT_ANALYTICS_KEY` is not set
    pub fn build(self) -> TextAnalyticsResult<TextAnalyticsClient> {
        let http = self.http_client.unwrap_or_else(|| {
            let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
            let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);

            reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .timeout(read_timeout)
                .build()
                .expect("failed to build HTTP client")
        });

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var("AZURE_TEXT_ANALYTICS_ENDPOINT").ok())
            .ok_or_else(|| {
                TextAnalyticsError::MissingConfig(
                    "endpoint is required. Set it via builder or \
                     AZURE_TEXT_ANALYTICS_ENDPOINT env var."
                        .into(),
                )
            })?;

        let mut endpoint = Url::parse(&endpoint_str).map_err(|e| {
            TextAnalyticsError::invalid_endpoint_with_source("invalid endpoint URL", e)
        })?;
        // Url::join treats a missing trailing slash as a file segment and
        // would drop it on join.
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }

        let credential = self
            .credential
            .map(Ok)
            .unwrap_or_else(TextAnalyticsCredential::from_env)?;

        Ok(TextAnalyticsClient {
            http,
            endpoint,
            credential,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(endpoint: &str) -> TextAnalyticsClient {
        TextAnalyticsClient::builder()
            .endpoint(endpoint)
            .credential(TextAnalyticsCredential::api_key("test-api-key"))
            .build()
            .expect("should build client")
    }

    #[test]
    #[serial]
    fn builder_requires_endpoint() {
        std::env::remove_var("AZURE_TEXT_ANALYTICS_ENDPOINT");

        let result = TextAnalyticsClient::builder()
            .credential(TextAnalyticsCredential::api_key("test"))
            .build();

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, TextAnalyticsError::MissingConfig(_)));
    }

    #[test]
    fn builder_accepts_endpoint() {
        let client = test_client("https://test.cognitiveservices.azure.com");
        assert_eq!(
            client.endpoint().as_str(),
            "https://test.cognitiveservices.azure.com/"
        );
    }

    #[test]
    fn builder_uses_default_api_version() {
        let client = test_client("https://test.cognitiveservices.azure.com");
        assert_eq!(client.api_version(), DEFAULT_API_VERSION);
    }

    #[test]
    fn builder_accepts_custom_api_version() {
        let client = TextAnalyticsClient::builder()
            .endpoint("https://test.cognitiveservices.azure.com")
            .credential(TextAnalyticsCredential::api_key("test"))
            .api_version("v3.0")
            .build()
            .expect("should build");

        assert_eq!(client.api_version(), "v3.0");
    }

    #[test]
    #[serial]
    fn builder_uses_endpoint_from_env() {
        let original = std::env::var("AZURE_TEXT_ANALYTICS_ENDPOINT").ok();

        std::env::set_var(
            "AZURE_TEXT_ANALYTICS_ENDPOINT",
            "https://env.cognitiveservices.azure.com",
        );

        let client = TextAnalyticsClient::builder()
            .credential(TextAnalyticsCredential::api_key("test"))
            .build()
            .expect("should build");

        assert_eq!(
            client.endpoint().as_str(),
            "https://env.cognitiveservices.azure.com/"
        );

        match original {
            Some(val) => std::env::set_var("AZURE_TEXT_ANALYTICS_ENDPOINT", val),
            None => std::env::remove_var("AZURE_TEXT_ANALYTICS_ENDPOINT"),
        }
    }

    #[test]
    fn builder_invalid_endpoint_url() {
        let result = TextAnalyticsClient::builder()
            .endpoint("not a valid url")
            .credential(TextAnalyticsCredential::api_key("test"))
            .build();

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            TextAnalyticsError::InvalidEndpoint(_)
        ));
    }

    #[test]
    fn url_includes_api_version_path_segment() {
        let client = test_client("https://test.cognitiveservices.azure.com");

        let url = client.url("/analyze").expect("should join");
        assert_eq!(
            url.as_str(),
            "https://test.cognitiveservices.azure.com/text/analytics/v3.1-preview.4/analyze"
        );
    }

    #[test]
    fn url_joins_path_without_leading_slash() {
        let client = test_client("https://test.cognitiveservices.azure.com");

        let url = client.url("analyze/jobs/abc123").expect("should join");
        assert_eq!(
            url.as_str(),
            "https://test.cognitiveservices.azure.com/text/analytics/v3.1-preview.4/analyze/jobs/abc123"
        );
    }

    #[test]
    fn client_is_cloneable() {
        let client = test_client("https://test.cognitiveservices.azure.com");
        let cloned = client.clone();
        assert_eq!(client.endpoint(), cloned.endpoint());
    }

    // --- Wiremock integration tests ---

    #[tokio::test]
    async fn get_request_sends_subscription_key_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/text/analytics/v3.1-preview.4/analyze/jobs/job-1"))
            .and(header("Ocp-Apim-Subscription-Key", "test-api-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "running"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .get("/analyze/jobs/job-1")
            .await
            .expect("should succeed");

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn get_request_401_maps_to_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/text/analytics/v3.1-preview.4/analyze/jobs/job-1"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {
                    "code": "401",
                    "message": "Access denied due to invalid subscription key."
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .get("/analyze/jobs/job-1")
            .await
            .expect_err("should fail");

        assert!(
            matches!(err, TextAnalyticsError::Auth(_)),
            "expected Auth error, got {err:?}"
        );
        assert!(err.to_string().contains("invalid subscription key"));
    }

    #[tokio::test]
    async fn error_response_unwraps_innererror() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {
                "code": "InvalidRequest",
                "message": "Invalid Request.",
                "innererror": {
                    "code": "ModelVersionIncorrect",
                    "message": "Invalid model version."
                }
            }
        });

        Mock::given(method("POST"))
            .and(path("/text/analytics/v3.1-preview.4/analyze"))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .post("/analyze", &serde_json::json!({}))
            .await
            .expect_err("should fail");

        match err {
            TextAnalyticsError::Api { code, message } => {
                assert_eq!(code, "ModelVersionIncorrect");
                assert_eq!(message, "Invalid model version.");
            }
            _ => panic!("Expected Api error, got {err:?}"),
        }
    }

    #[tokio::test]
    async fn error_response_without_innererror_uses_outer_code() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {
                "code": "InvalidRequest",
                "message": "Job ID not found."
            }
        });

        Mock::given(method("GET"))
            .and(path("/text/analytics/v3.1-preview.4/analyze/jobs/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .get("/analyze/jobs/missing")
            .await
            .expect_err("should fail");

        match err {
            TextAnalyticsError::Api { code, message } => {
                assert_eq!(code, "InvalidRequest");
                assert_eq!(message, "Job ID not found.");
            }
            _ => panic!("Expected Api error, got {err:?}"),
        }
    }

    #[tokio::test]
    async fn error_response_with_non_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/text/analytics/v3.1-preview.4/analyze/jobs/job-1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .get("/analyze/jobs/job-1")
            .await
            .expect_err("should fail");

        match err {
            TextAnalyticsError::Http { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            _ => panic!("Expected Http error, got {err:?}"),
        }
    }

    #[tokio::test]
    async fn get_retries_on_503_with_backoff() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let server = MockServer::start().await;
        let request_count = Arc::new(AtomicU32::new(0));
        let counter = request_count.clone();

        // Fails with 503 twice, then succeeds.
        Mock::given(method("GET"))
            .and(path("/text/analytics/v3.1-preview.4/analyze/jobs/retry"))
            .respond_with(move |_req: &wiremock::Request| {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    ResponseTemplate::new(503).set_body_string("Service Unavailable")
                } else {
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"status": "succeeded"}))
                }
            })
            .mount(&server)
            .await;

        let policy = RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(10),
        };

        let client = TextAnalyticsClient::builder()
            .endpoint(server.uri())
            .credential(TextAnalyticsCredential::api_key("test"))
            .retry_policy(policy)
            .build()
            .expect("should build");

        let result = client.get("/analyze/jobs/retry").await;

        assert!(result.is_ok(), "expected success after retries: {result:?}");
        assert_eq!(
            request_count.load(Ordering::SeqCst),
            3,
            "expected 3 requests (initial + 2 retries)"
        );
    }

    #[tokio::test]
    async fn post_does_not_retry_on_400() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let server = MockServer::start().await;
        let request_count = Arc::new(AtomicU32::new(0));
        let counter = request_count.clone();

        Mock::given(method("POST"))
            .and(path("/text/analytics/v3.1-preview.4/analyze"))
            .respond_with(move |_req: &wiremock::Request| {
                counter.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "error": {"code": "InvalidRequest", "message": "Bad body."}
                }))
            })
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.post("/analyze", &serde_json::json!({})).await;

        assert!(result.is_err());
        assert_eq!(
            request_count.load(Ordering::SeqCst),
            1,
            "400 must not be retried"
        );
    }

    #[test]
    fn default_retry_policy() {
        let client = test_client("https://test.cognitiveservices.azure.com");
        assert_eq!(client.retry_policy().max_retries, 3);
        assert_eq!(
            client.retry_policy().initial_backoff,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn truncates_long_error_messages() {
        let long = "x".repeat(5000);
        let truncated = TextAnalyticsClient::truncate_message(&long);
        assert!(truncated.len() < 1100);
        assert!(truncated.ends_with("... (truncated)"));
    }

    #[test]
    fn short_messages_are_unchanged() {
        let msg = "Invalid model version.";
        assert_eq!(TextAnalyticsClient::truncate_message(msg), msg);
    }
}
