use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{decode_body, decode_value};
use crate::core::kernel::headers::build_headers;
use crate::core::kernel::signer::Signer;
use crate::core::kernel::transport::{
    HttpTransport, ReqwestTransport, TransportRequest, TransportResponse,
};
use crate::core::types::{ApiRequest, Verb};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, instrument};

/// REST client trait for making HTTP requests
///
/// `execute` is the only required method; the typed helpers serialize the body
/// once, run the call and decode the success body through the codec layer.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Run one logical API call, including signing and bounded retry.
    async fn execute(&self, request: ApiRequest, authenticated: bool)
        -> Result<Value, ExchangeError>;

    /// Untyped call with an optional JSON body
    ///
    /// # Arguments
    /// * `verb` - HTTP verb
    /// * `path` - Path below the base endpoint, including the API prefix
    /// * `query` - Ordered query parameters
    /// * `body` - Optional JSON body
    /// * `authenticated` - Whether to sign the request
    async fn call(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let request = ApiRequest::new(verb, path)
            .with_query(query)
            .with_optional_body(body)?;
        self.execute(request, authenticated).await
    }

    /// GET with strongly-typed response
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let request = ApiRequest::new(Verb::Get, path).with_query(query);
        decode_value(self.execute(request, authenticated).await?)
    }

    /// POST with strongly-typed response
    async fn post_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let request = ApiRequest::new(Verb::Post, path).with_json_body(body)?;
        decode_value(self.execute(request, authenticated).await?)
    }

    /// PUT with strongly-typed response
    async fn put_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let request = ApiRequest::new(Verb::Put, path).with_json_body(body)?;
        decode_value(self.execute(request, authenticated).await?)
    }

    /// DELETE with strongly-typed response
    async fn delete_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let request = ApiRequest::new(Verb::Delete, path).with_json_body(body)?;
        decode_value(self.execute(request, authenticated).await?)
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Total dispatches allowed for one call when the server keeps answering 5xx
    pub max_attempts: u32,
    /// Pause between consecutive dispatches of the same call
    pub retry_delay: Duration,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
            user_agent: format!("bitmex-rest/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the maximum number of dispatches per call
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay between retried dispatches
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client on top of reqwest
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(self.config.timeout_seconds),
            &self.config.user_agent,
        )?;
        Ok(self.build_with_transport(transport))
    }

    /// Build the REST client on top of a caller-supplied transport
    pub fn build_with_transport<T: HttpTransport>(self, transport: T) -> RestExecutor<T> {
        RestExecutor {
            transport,
            config: self.config,
            signer: self.signer,
        }
    }
}

/// Structured error body returned with 4xx responses: `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub name: String,
    pub message: String,
}

/// Map one response to the call outcome. A 5xx becomes `Server` carrying the
/// attempt it happened on; the executor decides whether to dispatch again.
fn classify(response: TransportResponse, attempt: u32) -> Result<Value, ExchangeError> {
    match response.status {
        200..=299 if response.body.trim().is_empty() => Ok(Value::Null),
        200..=299 => decode_body(&response.body),
        400..=499 => match decode_body::<ApiErrorResponse>(&response.body) {
            Ok(ApiErrorResponse { error }) => Err(ExchangeError::Client {
                status: response.status,
                name: error.name,
                message: error.message,
            }),
            Err(e) => Err(ExchangeError::Decode(format!(
                "HTTP {} with unreadable error body '{}': {}",
                response.status, response.body, e
            ))),
        },
        500..=599 => Err(ExchangeError::Server {
            status: response.status,
            attempts: attempt,
        }),
        status => Err(ExchangeError::UnexpectedStatus {
            status,
            body: response.body,
        }),
    }
}

/// Call executor: signs, dispatches, classifies and retries
///
/// Retries happen only for 5xx responses, up to `max_attempts` dispatches with
/// `retry_delay` between them. Each retry is re-signed with a fresh expiry but
/// carries the identical body. A write the server applied before failing to
/// answer will be applied again by the retry.
#[derive(Clone)]
pub struct RestExecutor<T = ReqwestTransport> {
    transport: T,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

/// Executor over the production reqwest transport
pub type ReqwestRest = RestExecutor<ReqwestTransport>;

impl<T> std::fmt::Debug for RestExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestExecutor")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Create a reqwest-backed executor with default retry settings
    pub fn new(
        base_url: String,
        exchange_name: String,
        signer: Option<Arc<dyn Signer>>,
    ) -> Result<Self, ExchangeError> {
        let mut builder = RestClientBuilder::new(RestClientConfig::new(base_url, exchange_name));
        if let Some(signer) = signer {
            builder = builder.with_signer(signer);
        }
        builder.build()
    }
}

impl<T: HttpTransport> RestExecutor<T> {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    fn build_url(&self, path_with_query: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path_with_query)
    }

    /// Build the transport request for one attempt, signing with a fresh expiry.
    fn prepare(
        &self,
        request: &ApiRequest,
        path_with_query: &str,
        authenticated: bool,
    ) -> Result<TransportRequest, ExchangeError> {
        let auth = if authenticated {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(
                    "Authentication required but no signer provided".to_string(),
                )
            })?;
            let expires = signer.expires_at()?;
            Some(signer.sign_request(request.verb, path_with_query, request.body_str(), expires)?)
        } else {
            None
        };

        Ok(TransportRequest {
            verb: request.verb,
            url: self.build_url(path_with_query),
            headers: build_headers(auth.as_ref()),
            body: request.body.clone(),
        })
    }
}

#[async_trait]
impl<T: HttpTransport> RestClient for RestExecutor<T> {
    #[instrument(
        skip(self, request),
        fields(exchange = %self.config.exchange_name, verb = %request.verb, path = %request.path)
    )]
    async fn execute(
        &self,
        request: ApiRequest,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let path_with_query = request.path_with_query()?;
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let prepared = self.prepare(&request, &path_with_query, authenticated)?;

            debug!(
                attempt,
                verb = %request.verb,
                path = %path_with_query,
                body = request.body_str(),
                "Dispatching request"
            );

            let response = self.transport.send(prepared).await?;

            match classify(response, attempt) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    error!(
                        attempt,
                        max_attempts,
                        status = e.status(),
                        verb = %request.verb,
                        path = %path_with_query,
                        "Server error response"
                    );

                    if attempt >= max_attempts {
                        return Err(e);
                    }

                    sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
