use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use std::env;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{ASK_REQUEST_DURATION, ASK_REQUEST_ERRORS, ASK_REQUESTS};
use crate::types::{AnswerResponse, AskRequest, RequestField};

/// Base URL used when neither configuration nor `PAKAR_CHAT_URL` names one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable consulted for the base URL.
pub const BASE_URL_ENV: &str = "PAKAR_CHAT_URL";

/// A remote service that answers a line of user text.
#[async_trait::async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask the service about `text`.
    ///
    /// An `Ok` value means the service produced a JSON reply, which may itself
    /// carry an application error.  An `Err` means no usable reply arrived.
    async fn ask(&self, text: &str) -> Result<AnswerResponse>;
}

/// Client for the `/ask` endpoint of the answer service.
#[derive(Debug, Clone)]
pub struct AskClient {
    client: ReqwestClient,
    endpoint: Url,
    request_field: RequestField,
    timeout: Option<Duration>,
}

impl AskClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the PAKAR_CHAT_URL
    /// environment variable, falling back to [`DEFAULT_BASE_URL`].
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, RequestField::default(), None)
    }

    /// Create a new client with custom settings.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn with_options(
        base_url: Option<String>,
        request_field: RequestField,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = ask_endpoint(&base_url)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            endpoint,
            request_field,
            timeout,
        })
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The JSON field that carries the user's text.
    pub fn request_field(&self) -> RequestField {
        self.request_field
    }

    /// Create and return default headers for requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn post(&self, text: &str) -> Result<AnswerResponse> {
        let body = AskRequest::new(self.request_field, text);
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        self.timeout.map(|t| t.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        // The service reports its own failures as JSON with a 4xx/5xx status, so
        // the body is decoded whatever the status says.
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response body: {}", e),
                Some(Box::new(e)),
            )
        })?;
        decode_answer(&body).map_err(|err| match err {
            Error::Serialization { message, source } => Error::Serialization {
                message: format!("{message} (status {status})"),
                source,
            },
            err => err,
        })
    }
}

/// Decode an `/ask` response body.
///
/// Only a JSON object is a reply; serde would otherwise accept an array as a
/// positional struct.
pub fn decode_answer(body: &str) -> Result<AnswerResponse> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        Error::serialization(format!("Failed to parse response: {}", e), Some(Box::new(e)))
    })?;
    if !value.is_object() {
        return Err(Error::serialization(
            "Failed to parse response: expected a JSON object",
            None,
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        Error::serialization(format!("Failed to parse response: {}", e), Some(Box::new(e)))
    })
}

#[async_trait::async_trait]
impl AnswerService for AskClient {
    async fn ask(&self, text: &str) -> Result<AnswerResponse> {
        ASK_REQUESTS.click();
        tracing::debug!(endpoint = %self.endpoint, field = %self.request_field, "asking");
        let start = Instant::now();
        let result = self.post(text).await;
        ASK_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            ASK_REQUEST_ERRORS.click();
            tracing::debug!(error = %err, "ask failed");
        }
        result
    }
}

/// Resolve the `/ask` endpoint below `base_url`.
///
/// `ask` is appended as a path segment, so `http://host:5000` and
/// `http://host:5000/` both resolve to `http://host:5000/ask`, and
/// `http://host/api` resolves to `http://host/api/ask`.
pub fn ask_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("ask")?)
}
