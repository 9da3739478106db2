use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use futures::stream::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::{GenerateContentRequest, GenerateContentResponse, GoogleErrorResponse, Model};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the GEMINI_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::credential(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };
        if api_key.trim().is_empty() {
            return Err(Error::credential(format!("{API_KEY_ENV} is empty")));
        }

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}"), e))?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request and streamed chunk.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The URL streamed generation requests for `model` are posted to.
    pub fn stream_url(&self, model: &Model) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("models/{model}:streamGenerateContent"))?;
        url.set_query(Some("alt=sse"));
        Ok(url)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/event-stream"));
        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::credential("API key contains invalid header characters"))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::transport(format!("failed to read error response: {e}"), e);
            }
        };

        let err = match serde_json::from_str::<GoogleErrorResponse>(&error_body) {
            Ok(GoogleErrorResponse { error }) => {
                Error::api(status_code, error.status, error.message, retry_after)
            }
            Err(_) => Error::api(status_code, None, error_body.trim(), retry_after),
        };
        tracing::debug!(status_code, kind = ?err.api_kind(), "request rejected");
        err
    }

    /// Start a streaming generation and return the parsed chunks.
    ///
    /// The returned stream is lazy, finite, and cannot be restarted.  Errors
    /// that happen before the first byte arrives are returned directly; errors
    /// after that appear as `Err` items in the stream.
    pub async fn stream_generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<impl Stream<Item = Result<GenerateContentResponse>> + Send + 'static> {
        let url = self.stream_url(model)?;
        if let Some(logger) = &self.logger {
            logger.log_request(model, request);
        }
        tracing::debug!(%model, turns = request.contents.len(), "streamGenerateContent");

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                if e.is_timeout() {
                    Error::timed_out(format!(
                        "request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    Error::transport(format!("could not connect: {e}"), e)
                } else {
                    Error::transport(format!("request failed: {e}"), e)
                }
            })?;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        let logger = self.logger.clone();
        let chunks = process_sse(response.bytes_stream()).inspect(move |item| {
            if let (Some(logger), Ok(chunk)) = (&logger, item) {
                logger.log_stream_chunk(chunk);
            }
        });
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CHAT_MODEL, KnownModel};

    #[test]
    fn client_creation() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);

        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("https://proxy.example.com/gemini".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url.as_str(), "https://proxy.example.com/gemini/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = Gemini::new(Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, Error::Credential { .. }));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = Gemini::with_options(Some("k".to_string()), Some("not a url".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn stream_url_targets_model() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        let url = client.stream_url(&CHAT_MODEL).unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );

        let url = client
            .stream_url(&Model::Known(KnownModel::Gemini25Pro))
            .unwrap();
        assert!(url.path().ends_with("/models/gemini-2.5-pro:streamGenerateContent"));
    }

    #[test]
    fn debug_redacts_key() {
        let client = Gemini::new(Some("super-secret".to_string())).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
