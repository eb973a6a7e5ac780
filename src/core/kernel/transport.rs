use crate::core::errors::ExchangeError;
use crate::core::types::Verb;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::{instrument, trace};

/// A fully prepared HTTP request: absolute URL, headers and exact body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub verb: Verb,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// HTTP transport seam
///
/// Sends one request and reports status, headers and body. Connection and TLS
/// failures surface as `ExchangeError::Transport`; status codes are never
/// interpreted here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ExchangeError>;
}

/// `HttpTransport` backed by a pooled reqwest client
///
/// Redirects are never followed: a 3xx reaches the executor as-is instead of
/// re-sending a signed request to another location.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()
            .map_err(|e| ExchangeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.verb, url = %request.url))]
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ExchangeError> {
        let mut builder = self.client.request(request.verb.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(format!("Failed to read response body: {}", e)))?;

        trace!("Response body: {}", body);

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
