//! HTTP client seam.
//!
//! The interceptor never talks to the network itself. It hands a
//! [`RequestConfig`] to a named [`HttpClient`] from the [`ClientRegistry`] and
//! routes whatever comes back.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Raw per-call HTTP options (`url`, `method`, `headers`, `params`, `data`, ...).
///
/// Keys other than `url` and `method` are opaque to the interceptor and passed
/// to the client untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestConfig(Map<String, Value>);

impl RequestConfig {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Set the `url` option.
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.with("url", Value::String(url.into()))
    }

    /// Set the `method` option.
    #[must_use]
    pub fn with_method(self, method: impl Into<String>) -> Self {
        self.with("method", Value::String(method.into()))
    }

    /// Look up an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `url` option as a string.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(Value::as_str)
    }

    /// The `method` option as a string.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.get("method").and_then(Value::as_str)
    }

    /// All options.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RequestConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Successful response of an [`HttpClient`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Decoded response body
    pub data: Value,
}

impl HttpResponse {
    /// A `200` response with the given body and no headers.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            data,
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Failure of an [`HttpClient`] call.
///
/// Serialized into failure payloads as `{"kind": "...", ...}`.
#[derive(Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HttpError {
    /// Server answered with a non-success status
    #[error("Request failed with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Decoded response body
        data: Value,
    },

    /// Connection or protocol failure
    #[error("Transport error: {message}")]
    Transport {
        /// Error description
        message: String,
    },

    /// The request options could not be turned into a request
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error description
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Error description
        message: String,
    },
}

/// Result of an [`HttpClient`] call.
pub type HttpResult = Result<HttpResponse, HttpError>;

/// A named HTTP client instance.
///
/// Implemented for any `Fn(RequestConfig) -> impl Future<Output = HttpResult>`,
/// so tests and small adapters can register closures:
///
/// ```
/// use http_lifecycle_core::{ClientRegistry, HttpError, HttpResponse, RequestConfig};
/// use serde_json::json;
///
/// let registry = ClientRegistry::new().with_client("api", |_config: RequestConfig| async {
///     Ok::<_, HttpError>(HttpResponse::ok(json!({"id": 1})))
/// });
/// assert!(registry.contains("api"));
/// ```
pub trait HttpClient: Send + Sync {
    /// Perform one request.
    fn request(&self, config: RequestConfig) -> BoxFuture<'static, HttpResult>;
}

impl<F, Fut> HttpClient for F
where
    F: Fn(RequestConfig) -> Fut + Send + Sync,
    Fut: Future<Output = HttpResult> + Send + 'static,
{
    fn request(&self, config: RequestConfig) -> BoxFuture<'static, HttpResult> {
        Box::pin(self(config))
    }
}

/// Client name to client mapping, fixed once handed to the interceptor.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Arc<dyn HttpClient>>,
}

impl ClientRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under `name`, replacing any previous one.
    #[must_use]
    pub fn with_client(mut self, name: impl Into<String>, client: impl HttpClient + 'static) -> Self {
        self.register(name, Arc::new(client));
        self
    }

    /// Register a shared client under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, client: Arc<dyn HttpClient>) {
        self.clients.insert(name.into(), client);
    }

    /// Look up a client.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn HttpClient>> {
        self.clients.get(name)
    }

    /// Whether a client is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no client is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.clients.keys().collect();
        names.sort();
        f.debug_struct("ClientRegistry").field("clients", &names).finish()
    }
}
