/// Kernel - the authenticated call pipeline
///
/// Exchange-agnostic transport, signing and codec plumbing. Exchange modules
/// build typed operations on top of the `RestClient` trait.
///
/// # Architecture
///
/// ## Authentication
/// - `Signer`: Pluggable authentication interface
/// - `HmacSigner`: HMAC-SHA256 over `verb + path + expires + body`
///
/// ## Headers
/// - `build_headers`: content type merged with the auth header values
///
/// ## Call execution
/// - `RestClient`: the call seam exchange modules are generic over
/// - `RestExecutor`: signs, dispatches, classifies by status and retries 5xx
/// - `HttpTransport` / `ReqwestTransport`: the HTTP black box
///
/// ## Codec
/// - `JsonCodec`: typed entity <-> `serde_json::Value`
/// - `codec::timestamp`: the exchange's single timestamp format
///
/// # Example
/// ```rust,no_run
/// use bitmex_rest::core::kernel::*;
/// use bitmex_rest::core::types::Verb;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RestClientConfig::new("https://testnet.bitmex.com".to_string(), "bitmex".to_string())
///     .with_retry_delay(Duration::from_millis(500))
///     .with_max_attempts(2);
/// let signer = Arc::new(HmacSigner::new("api_key".to_string(), "secret".to_string()));
/// let rest = RestClientBuilder::new(config).with_signer(signer).build()?;
///
/// let positions = rest.call(Verb::Get, "/api/v1/position", &[], None, true).await?;
/// println!("{positions}");
/// # Ok(())
/// # }
/// ```
pub mod codec;
pub mod headers;
pub mod rest;
pub mod signer;
pub mod transport;

// Re-export key types for convenience
pub use codec::JsonCodec;
pub use headers::build_headers;
pub use rest::{
    ApiError, ApiErrorResponse, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig,
    RestExecutor,
};
pub use signer::{mk_auth_headers, sign, AuthHeaders, HmacSigner, SignatureResult, Signer};
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};
