use crate::core::errors::ExchangeError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP verb of a REST call. Its uppercase name is part of the signed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for reqwest::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Self::GET,
            Verb::Post => Self::POST,
            Verb::Put => Self::PUT,
            Verb::Delete => Self::DELETE,
        }
    }
}

/// One logical API call before signing.
///
/// The body is kept as the serialized JSON string: the signature is computed over
/// these exact bytes and the transport sends them unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub verb: Verb,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query = query
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self
    }

    /// Serialize `body` once; the resulting string is what gets signed and sent.
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ExchangeError> {
        let encoded = serde_json::to_string(body).map_err(|e| {
            ExchangeError::Serialization(format!("Failed to serialize request body: {}", e))
        })?;
        self.body = Some(encoded);
        Ok(self)
    }

    /// Optional-body variant used by the executor's untyped `call`.
    pub fn with_optional_body(self, body: Option<&Value>) -> Result<Self, ExchangeError> {
        match body {
            Some(value) => self.with_json_body(value),
            None => Ok(self),
        }
    }

    /// Path plus url-encoded query string, exactly as it appears on the wire.
    pub fn path_with_query(&self) -> Result<String, ExchangeError> {
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }

        let query_string = serde_urlencoded::to_string(&self.query).map_err(|e| {
            ExchangeError::Serialization(format!("Failed to encode query string: {}", e))
        })?;
        Ok(format!("{}?{}", self.path, query_string))
    }

    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}
