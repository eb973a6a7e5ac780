use crate::core::errors::ExchangeError;
use crate::core::types::Verb;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

pub const API_KEY_HEADER: &str = "api-key";
pub const API_EXPIRES_HEADER: &str = "api-expires";
pub const API_SIGNATURE_HEADER: &str = "api-signature";

/// Seconds a signature stays valid after it is produced.
pub const DEFAULT_EXPIRES_AFTER_SECS: i64 = 60;

/// Authentication values for one dispatch: key id, absolute expiry and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub api_key: String,
    pub expires: i64,
    pub signature: String,
}

impl AuthHeaders {
    /// Header name/value pairs in the order they are attached to the request.
    pub fn to_pairs(&self) -> [(&'static str, String); 3] {
        [
            (API_EXPIRES_HEADER, self.expires.to_string()),
            (API_KEY_HEADER, self.api_key.clone()),
            (API_SIGNATURE_HEADER, self.signature.clone()),
        ]
    }
}

pub type SignatureResult = Result<AuthHeaders, ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations must be pure with respect to their inputs: the same request
/// and expiry always produce the same signature.
pub trait Signer: Send + Sync {
    /// Sign a request
    ///
    /// # Arguments
    /// * `verb` - HTTP verb
    /// * `path_with_query` - Request path including the encoded query string
    /// * `body` - Serialized request body, empty if none
    /// * `expires` - Absolute expiry as UNIX seconds
    fn sign_request(
        &self,
        verb: Verb,
        path_with_query: &str,
        body: &str,
        expires: i64,
    ) -> SignatureResult;

    /// Expiry for a signature produced now.
    fn expires_at(&self) -> Result<i64, ExchangeError> {
        Ok(unix_seconds()? + DEFAULT_EXPIRES_AFTER_SECS)
    }
}

/// Current wall-clock time in whole UNIX seconds.
pub fn unix_seconds() -> Result<i64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|e| ExchangeError::AuthError(format!("Failed to get timestamp: {}", e)))
}

/// Message covered by the signature: `VERB + path?query + expires + body`.
pub fn signing_message(verb: Verb, path_with_query: &str, expires: i64, body: &str) -> String {
    format!("{}{}{}{}", verb.as_str(), path_with_query, expires, body)
}

/// HMAC-SHA256 of the signing message keyed by `secret`, as lowercase hex.
pub fn sign(
    secret: &[u8],
    verb: Verb,
    path_with_query: &str,
    expires: i64,
    body: &str,
) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;

    mac.update(signing_message(verb, path_with_query, expires, body).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Package an expiry and its signature with the key id into the auth header values.
pub fn mk_auth_headers(api_key: &str, expires: i64, signature: String) -> AuthHeaders {
    AuthHeaders {
        api_key: api_key.to_string(),
        expires,
        signature,
    }
}

/// HMAC-SHA256 signer using BitMEX's `api-expires` scheme
pub struct HmacSigner {
    api_key: String,
    secret_key: Secret<String>,
    expires_after_secs: i64,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("api_key", &self.api_key)
            .field("expires_after_secs", &self.expires_after_secs)
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// # Arguments
    /// * `api_key` - API key id from the exchange
    /// * `secret_key` - Secret used as the HMAC key
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
            expires_after_secs: DEFAULT_EXPIRES_AFTER_SECS,
        }
    }

    #[must_use]
    pub fn with_expires_after(mut self, seconds: i64) -> Self {
        self.expires_after_secs = seconds;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Signer for HmacSigner {
    fn sign_request(
        &self,
        verb: Verb,
        path_with_query: &str,
        body: &str,
        expires: i64,
    ) -> SignatureResult {
        let signature = sign(
            self.secret_key.expose_secret().as_bytes(),
            verb,
            path_with_query,
            expires,
            body,
        )?;

        Ok(mk_auth_headers(&self.api_key, expires, signature))
    }

    fn expires_at(&self) -> Result<i64, ExchangeError> {
        Ok(unix_seconds()? + self.expires_after_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference credentials published in the exchange's API key documentation
    const API_KEY: &str = "LAqUlngMIQkIUjXMUreyu3qn";
    const API_SECRET: &str = "chNOOS4KvNXR_Xq4k4c9qsfoKWvnDecLATCRlcBwyKDYnWgO";

    #[test]
    fn test_simple_get_signature() {
        let signature = sign(
            API_SECRET.as_bytes(),
            Verb::Get,
            "/api/v1/instrument",
            1_518_064_236,
            "",
        )
        .unwrap();

        assert_eq!(
            signature,
            "c7682d435d0cfe87c16098df34ef2eb5a549d4c5a3c2b1f0f77b8af73423bf00"
        );
    }

    #[test]
    fn test_post_signature_covers_body() {
        let body = r#"{"symbol":"XBTM15","price":219.0,"clOrdID":"mm_bitmex_1a/oemUeQ4CAJZgP3fjHsA","orderQty":98}"#;
        let signature = sign(
            API_SECRET.as_bytes(),
            Verb::Post,
            "/api/v1/order",
            1_518_064_238,
            body,
        )
        .unwrap();

        assert_eq!(
            signature,
            "1749cd2ccae4aa49048ae09f0b95110cee706e0944e6a14ad0b3a8cb45bd336b"
        );
    }

    #[test]
    fn test_signing_message_layout() {
        assert_eq!(
            signing_message(Verb::Put, "/api/v1/order/bulk?x=1", 42, "{}"),
            "PUT/api/v1/order/bulk?x=142{}"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = HmacSigner::new(API_KEY.to_string(), API_SECRET.to_string());

        let first = signer
            .sign_request(Verb::Delete, "/api/v1/order", r#"{"orderID":["a"]}"#, 1_700_000_000)
            .unwrap();
        let second = signer
            .sign_request(Verb::Delete, "/api/v1/order", r#"{"orderID":["a"]}"#, 1_700_000_000)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.api_key, API_KEY);
        assert_eq!(first.signature.len(), 64);
        assert!(first
            .signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_any_input_change_changes_signature() {
        let base = sign(API_SECRET.as_bytes(), Verb::Get, "/api/v1/position", 100, "").unwrap();

        let other_verb = sign(API_SECRET.as_bytes(), Verb::Delete, "/api/v1/position", 100, "");
        let other_path = sign(API_SECRET.as_bytes(), Verb::Get, "/api/v1/order", 100, "");
        let other_expiry = sign(API_SECRET.as_bytes(), Verb::Get, "/api/v1/position", 101, "");
        let other_body = sign(API_SECRET.as_bytes(), Verb::Get, "/api/v1/position", 100, "{}");
        let other_secret = sign(b"another-secret", Verb::Get, "/api/v1/position", 100, "");

        for other in [other_verb, other_path, other_expiry, other_body, other_secret] {
            assert_ne!(base, other.unwrap());
        }
    }

    #[test]
    fn test_expiry_is_in_the_future() {
        let signer = HmacSigner::new(API_KEY.to_string(), API_SECRET.to_string())
            .with_expires_after(5);
        let now = unix_seconds().unwrap();
        let expires = signer.expires_at().unwrap();

        assert!(expires >= now + 5);
        assert!(expires <= now + 6);
    }

    #[test]
    fn test_auth_header_pairs() {
        let headers = mk_auth_headers("key", 10, "abc".to_string());
        assert_eq!(
            headers.to_pairs(),
            [
                (API_EXPIRES_HEADER, "10".to_string()),
                (API_KEY_HEADER, "key".to_string()),
                (API_SIGNATURE_HEADER, "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = HmacSigner::new(API_KEY.to_string(), API_SECRET.to_string());
        assert!(!format!("{:?}", signer).contains(API_SECRET));
    }
}
