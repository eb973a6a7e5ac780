use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    HmacSigner, HttpTransport, ReqwestRest, RestClientBuilder, RestClientConfig, RestExecutor,
};
use crate::exchanges::bitmex::rest::BitmexRestClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const MAINNET_URL: &str = "https://www.bitmex.com";
pub const TESTNET_URL: &str = "https://testnet.bitmex.com";
pub const EXCHANGE_NAME: &str = "bitmex";

/// Assembles a `BitmexRestClient` from an `ExchangeConfig` plus call tuning
#[derive(Debug, Clone)]
pub struct BitmexBuilder {
    config: ExchangeConfig,
    timeout_seconds: u64,
    max_attempts: u32,
    retry_delay: Duration,
    expires_after_secs: Option<i64>,
}

impl BitmexBuilder {
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            timeout_seconds: 30,
            max_attempts: RestClientConfig::DEFAULT_MAX_ATTEMPTS,
            retry_delay: RestClientConfig::DEFAULT_RETRY_DELAY,
            expires_after_secs: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Lifetime of each signature in seconds
    #[must_use]
    pub fn with_expires_after(mut self, expires_after_secs: i64) -> Self {
        self.expires_after_secs = Some(expires_after_secs);
        self
    }

    /// Explicit `base_url` wins, then the testnet flag, then production.
    pub fn resolve_base_url(&self) -> String {
        self.config.base_url.clone().unwrap_or_else(|| {
            if self.config.testnet {
                TESTNET_URL.to_string()
            } else {
                MAINNET_URL.to_string()
            }
        })
    }

    fn rest_builder(&self) -> RestClientBuilder {
        let rest_config = RestClientConfig::new(self.resolve_base_url(), EXCHANGE_NAME.to_string())
            .with_timeout(self.timeout_seconds)
            .with_max_attempts(self.max_attempts)
            .with_retry_delay(self.retry_delay);

        let mut rest_builder = RestClientBuilder::new(rest_config);

        if self.config.has_credentials() {
            let mut signer = HmacSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            );
            if let Some(expires_after) = self.expires_after_secs {
                signer = signer.with_expires_after(expires_after);
            }
            rest_builder = rest_builder.with_signer(Arc::new(signer));
        }

        info!(
            base_url = %self.resolve_base_url(),
            authenticated = self.config.has_credentials(),
            "Building BitMEX REST client"
        );

        rest_builder
    }

    pub fn build(self) -> Result<BitmexRestClient<ReqwestRest>, ExchangeError> {
        let rest = self.rest_builder().build()?;
        Ok(BitmexRestClient::new(rest))
    }

    /// Same as `build` over a caller-supplied transport
    pub fn build_with_transport<T: HttpTransport>(
        self,
        transport: T,
    ) -> BitmexRestClient<RestExecutor<T>> {
        BitmexRestClient::new(self.rest_builder().build_with_transport(transport))
    }
}

/// Create a BitMEX REST client with default call tuning
pub fn build_rest_client(
    config: ExchangeConfig,
) -> Result<BitmexRestClient<ReqwestRest>, ExchangeError> {
    BitmexBuilder::new(config).build()
}
