//! reqwest implementation of [`HttpClient`]

use futures::future::BoxFuture;
use http_lifecycle_core::{HttpClient, HttpError, HttpResponse, HttpResult, RequestConfig};
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::BTreeMap;

/// HTTP client bound to a base URL
///
/// Understands these request options:
///
/// | Key       | Meaning                                        |
/// |-----------|------------------------------------------------|
/// | `url`     | path joined to the base URL, or absolute URL   |
/// | `method`  | HTTP method, case-insensitive                  |
/// | `headers` | object of header values                        |
/// | `params`  | object of query parameters                     |
/// | `data`    | request body; strings sent as-is, else JSON    |
///
/// Any other option is ignored.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: Client,
    base_url: String,
    default_headers: BTreeMap<String, String>,
}

impl ReqwestClient {
    /// Create a new client for `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing reqwest client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            default_headers: BTreeMap::new(),
        }
    }

    /// Send `value` as header `name` on every request
    ///
    /// Per-request `headers` take precedence.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request path
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || self.base_url.is_empty() {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    /// Perform one request described by `config`
    ///
    /// # Errors
    ///
    /// - [`HttpError::InvalidRequest`] for an unknown method
    /// - [`HttpError::Transport`] when the server cannot be reached
    /// - [`HttpError::Decode`] when the body cannot be read
    /// - [`HttpError::Status`] for non-2xx answers
    pub async fn send(&self, config: RequestConfig) -> HttpResult {
        let method_name = config.method().unwrap_or("get").to_uppercase();
        let method = Method::from_bytes(method_name.as_bytes()).map_err(|e| {
            HttpError::InvalidRequest {
                message: format!("Unsupported method {method_name}: {e}"),
            }
        })?;
        let url = self.resolve_url(config.url().unwrap_or("/"));

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");
        let mut request = self.client.request(method, &url);

        let mut headers = self.default_headers.clone();
        headers.extend(string_pairs(config.get("headers")));
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let query: Vec<(String, String)> = string_pairs(config.get("params")).collect();
        if !query.is_empty() {
            request = request.query(&query);
        }

        request = match config.get("data") {
            None | Some(Value::Null) => request,
            Some(Value::String(body)) => request.body(body.clone()),
            Some(data) => request.json(data),
        };

        let response = request.send().await.map_err(|e| HttpError::Transport {
            message: e.to_string(),
        })?;

        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or("<invalid>").to_string(),
                )
            })
            .collect();

        let bytes = response.bytes().await.map_err(|e| HttpError::Decode {
            message: e.to_string(),
        })?;
        let data = decode_body(&bytes);

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %url, "HTTP request returned error status");
            return Err(HttpError::Status {
                status: status.as_u16(),
                data,
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            data,
        })
    }
}

impl HttpClient for ReqwestClient {
    fn request(&self, config: RequestConfig) -> BoxFuture<'static, HttpResult> {
        let client = self.clone();
        Box::pin(async move { client.send(config).await })
    }
}

/// Flatten a JSON object into string pairs; non-object values yield nothing
fn string_pairs(value: Option<&Value>) -> impl Iterator<Item = (String, String)> + '_ {
    value
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
}

/// JSON if possible, otherwise the body as text; empty bodies become `null`
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
