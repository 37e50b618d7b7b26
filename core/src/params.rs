//! Layered request parameters and their resolution.
//!
//! Four layers feed every field of a [`ResolvedConfig`], each field resolved
//! independently:
//!
//! 1. the call itself ([`HttpIntent::params`](crate::HttpIntent))
//! 2. the per-client defaults in [`GlobalParams::clients`]
//! 3. the top-level [`GlobalParams::defaults`]
//! 4. the hardcoded defaults below
//!
//! An empty string counts as unset and falls through to the next layer.

use crate::client::RequestConfig;
use crate::error::ConfigError;
use crate::intent::HttpIntent;
use crate::lifecycle::{LifecycleTypes, Phase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Fallback entity name.
pub const DEFAULT_ENTITY: &str = "entity";

/// Fallback request URL.
pub const DEFAULT_URL: &str = "/";

/// Fallback HTTP method.
pub const DEFAULT_METHOD: &str = "get";

/// Fallback suffixes. The success token carries a leading space and is kept
/// as-is for compatibility with existing action types (`ENTITY_ SUCCESS`).
pub const DEFAULT_SUFFIXES: [&str; 3] = ["REQUEST", " SUCCESS", "FAILURE"];

/// Environment variable naming a JSON file with [`GlobalParams`].
pub const CONFIG_ENV_VAR: &str = "HTTP_LIFECYCLE_CONFIG";

/// Shape of the emitted lifecycle payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStyle {
    /// `{status: "<token>"}`
    #[default]
    Plain,
    /// `{<request>: bool, <success>: bool, <failure>: bool}`
    Complex,
}

/// Request/success/failure suffix triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suffixes([String; 3]);

impl Suffixes {
    /// Create a suffix triple in request/success/failure order.
    #[must_use]
    pub fn new(
        request: impl Into<String>,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        Self([request.into(), success.into(), failure.into()])
    }

    /// Suffix of the given phase.
    #[must_use]
    pub fn get(&self, phase: Phase) -> &str {
        &self.0[phase.index()]
    }
}

impl Default for Suffixes {
    fn default() -> Self {
        let [request, success, failure] = DEFAULT_SUFFIXES;
        Self::new(request, success, failure)
    }
}

/// One layer of optional request parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamLayer {
    entity: Option<String>,
    url: Option<String>,
    method: Option<String>,
    payload_style: Option<PayloadStyle>,
    suffixes: Option<Suffixes>,
}

impl ParamLayer {
    /// An empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity name.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the payload style.
    #[must_use]
    pub const fn with_payload_style(mut self, style: PayloadStyle) -> Self {
        self.payload_style = Some(style);
        self
    }

    /// Set the suffix triple.
    #[must_use]
    pub fn with_suffixes(mut self, suffixes: Suffixes) -> Self {
        self.suffixes = Some(suffixes);
        self
    }

    /// Entity name, if set and non-empty.
    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        non_empty(self.entity.as_deref())
    }

    /// URL, if set and non-empty.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }

    /// HTTP method, if set and non-empty.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        non_empty(self.method.as_deref())
    }

    /// Payload style, if set.
    #[must_use]
    pub const fn payload_style(&self) -> Option<&PayloadStyle> {
        self.payload_style.as_ref()
    }

    /// Suffixes, if set.
    #[must_use]
    pub const fn suffixes(&self) -> Option<&Suffixes> {
        self.suffixes.as_ref()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// The layers consulted for one call, most specific first.
#[derive(Clone, Copy, Debug)]
pub struct Layers<'a> {
    call: &'a ParamLayer,
    client: Option<&'a ParamLayer>,
    global: &'a ParamLayer,
}

impl<'a> Layers<'a> {
    /// Stack the call, per-client and top-level layers.
    #[must_use]
    pub const fn new(
        call: &'a ParamLayer,
        client: Option<&'a ParamLayer>,
        global: &'a ParamLayer,
    ) -> Self {
        Self {
            call,
            client,
            global,
        }
    }

    /// First layer that sets the field selected by `pick`, else `default`.
    ///
    /// # Example
    ///
    /// ```
    /// use http_lifecycle_core::{Layers, ParamLayer};
    ///
    /// let call = ParamLayer::new();
    /// let client = ParamLayer::new().with_url("/users");
    /// let global = ParamLayer::new().with_url("/");
    ///
    /// let layers = Layers::new(&call, Some(&client), &global);
    /// assert_eq!(layers.resolve(ParamLayer::url, "/fallback"), "/users");
    /// ```
    pub fn resolve<T, F>(&self, pick: F, default: &'a T) -> &'a T
    where
        T: ?Sized,
        F: Fn(&'a ParamLayer) -> Option<&'a T>,
    {
        [Some(self.call), self.client, Some(self.global)]
            .into_iter()
            .flatten()
            .find_map(pick)
            .unwrap_or(default)
    }
}

/// Process-wide defaults: a top-level layer plus one layer per client.
///
/// Loaded once and shared read-only by the interceptor.
///
/// ```json
/// {
///   "defaults": { "payloadStyle": "complex" },
///   "clients": { "api": { "entity": "user", "url": "/users" } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalParams {
    /// Top-level fallback layer
    pub defaults: ParamLayer,
    /// Per-client layers keyed by client name
    pub clients: HashMap<String, ParamLayer>,
}

impl GlobalParams {
    /// Empty global parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top-level layer.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ParamLayer) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the layer of one client.
    #[must_use]
    pub fn with_client(mut self, name: impl Into<String>, layer: ParamLayer) -> Self {
        self.clients.insert(name.into(), layer);
        self
    }

    /// Layer of the named client.
    #[must_use]
    pub fn client(&self, name: &str) -> Option<&ParamLayer> {
        self.clients.get(name)
    }

    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, including suffix
    /// lists that do not have exactly three entries.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Load from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let params = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            clients = params.clients.len(),
            "Loaded global request parameters"
        );
        Ok(params)
    }

    /// Load from the file named by `HTTP_LIFECYCLE_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvVarNotSet`] if the variable is missing,
    /// otherwise the errors of [`GlobalParams::from_file`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map_err(|_| ConfigError::EnvVarNotSet(CONFIG_ENV_VAR.to_string()))?;
        Self::from_file(path)
    }

    /// Resolve the effective configuration of a call against client `base`.
    #[must_use]
    pub fn resolve(&self, base: &str, intent: &HttpIntent) -> ResolvedConfig {
        let default_suffixes = Suffixes::default();
        let default_style = PayloadStyle::default();
        let layers = Layers::new(&intent.params, self.client(base), &self.defaults);

        let url = layers.resolve(ParamLayer::url, DEFAULT_URL).to_string();
        let method = layers.resolve(ParamLayer::method, DEFAULT_METHOD).to_string();
        let request_config = intent
            .config
            .clone()
            .unwrap_or_default()
            .with_url(url.clone())
            .with_method(method.clone());

        ResolvedConfig {
            entity: layers.resolve(ParamLayer::entity, DEFAULT_ENTITY).to_string(),
            url,
            method,
            payload_style: *layers.resolve(ParamLayer::payload_style, &default_style),
            suffixes: layers.resolve(ParamLayer::suffixes, &default_suffixes).clone(),
            request_config,
        }
    }
}

/// Effective description of one request.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    /// Entity namespacing the action types
    pub entity: String,
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: String,
    /// Payload style of emitted notifications
    pub payload_style: PayloadStyle,
    /// Lifecycle suffixes
    pub suffixes: Suffixes,
    /// Options handed to the HTTP client; `url`/`method` always match the
    /// resolved values
    pub request_config: RequestConfig,
}

impl ResolvedConfig {
    /// Action types and status tokens for this call.
    #[must_use]
    pub fn lifecycle_types(&self) -> LifecycleTypes {
        LifecycleTypes::new(&self.entity, &self.suffixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn intent(params: ParamLayer) -> HttpIntent {
        HttpIntent::new("api").with_params(params)
    }

    #[test]
    fn test_hardcoded_defaults() {
        let resolved = GlobalParams::new().resolve("api", &HttpIntent::new("api"));

        assert_eq!(resolved.entity, "entity");
        assert_eq!(resolved.url, "/");
        assert_eq!(resolved.method, "get");
        assert_eq!(resolved.payload_style, PayloadStyle::Plain);
        assert_eq!(resolved.suffixes, Suffixes::new("REQUEST", " SUCCESS", "FAILURE"));
    }

    #[test]
    fn test_fields_resolve_independently() {
        let params = GlobalParams::new()
            .with_defaults(
                ParamLayer::new()
                    .with_entity("global")
                    .with_method("put")
                    .with_payload_style(PayloadStyle::Complex),
            )
            .with_client("api", ParamLayer::new().with_entity("client").with_url("/client"));

        let resolved = params.resolve("api", &intent(ParamLayer::new().with_url("/call")));

        assert_eq!(resolved.entity, "client");
        assert_eq!(resolved.url, "/call");
        assert_eq!(resolved.method, "put");
        assert_eq!(resolved.payload_style, PayloadStyle::Complex);
    }

    #[test]
    fn test_other_client_layer_is_ignored() {
        let params =
            GlobalParams::new().with_client("other", ParamLayer::new().with_entity("other"));

        let resolved = params.resolve("api", &HttpIntent::new("api"));
        assert_eq!(resolved.entity, "entity");
    }

    #[test]
    fn test_empty_string_falls_through() {
        let params = GlobalParams::new().with_defaults(ParamLayer::new().with_url("/global"));

        let resolved = params.resolve("api", &intent(ParamLayer::new().with_url("")));
        assert_eq!(resolved.url, "/global");
    }

    #[test]
    fn test_url_and_method_override_custom_config() {
        let config = RequestConfig::new()
            .with_url("/from-config")
            .with_method("delete")
            .with("headers", json!({"x-trace": "abc"}))
            .with("timeout", json!(500));

        let call = intent(ParamLayer::new().with_url("/users").with_method("post"))
            .with_config(config);
        let resolved = GlobalParams::new().resolve("api", &call);

        assert_eq!(resolved.request_config.url(), Some("/users"));
        assert_eq!(resolved.request_config.method(), Some("post"));
        assert_eq!(resolved.request_config.get("headers"), Some(&json!({"x-trace": "abc"})));
        assert_eq!(resolved.request_config.get("timeout"), Some(&json!(500)));
    }

    #[test]
    fn test_defaults_override_custom_config_too() {
        let config = RequestConfig::new().with_url("/sneaky").with_method("patch");
        let resolved = GlobalParams::new().resolve("api", &HttpIntent::new("api").with_config(config));

        assert_eq!(resolved.request_config.url(), Some("/"));
        assert_eq!(resolved.request_config.method(), Some("get"));
    }

    #[test]
    fn test_from_json_str() {
        let params = GlobalParams::from_json_str(
            r#"{
                "defaults": { "payloadStyle": "complex", "suffixes": ["START", "DONE", "FAIL"] },
                "clients": { "api": { "entity": "user", "url": "/users" } }
            }"#,
        )
        .unwrap();

        let resolved = params.resolve("api", &HttpIntent::new("api"));
        assert_eq!(resolved.entity, "user");
        assert_eq!(resolved.url, "/users");
        assert_eq!(resolved.payload_style, PayloadStyle::Complex);
        assert_eq!(resolved.suffixes, Suffixes::new("START", "DONE", "FAIL"));
    }

    #[test]
    fn test_suffixes_must_have_three_entries() {
        let result = GlobalParams::from_json_str(r#"{ "defaults": { "suffixes": ["A", "B"] } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = GlobalParams::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    fn layer_strategy() -> impl Strategy<Value = ParamLayer> {
        (
            proptest::option::of("[a-z]{0,6}"),
            proptest::option::of("/[a-z]{0,6}"),
            proptest::option::of(prop_oneof![Just(PayloadStyle::Plain), Just(PayloadStyle::Complex)]),
        )
            .prop_map(|(entity, url, style)| ParamLayer {
                entity,
                url,
                method: None,
                payload_style: style,
                suffixes: None,
            })
    }

    fn expected<'a>(
        layers: [Option<&'a ParamLayer>; 3],
        pick: impl Fn(&'a ParamLayer) -> Option<&'a str>,
        default: &'a str,
    ) -> &'a str {
        for layer in layers.into_iter().flatten() {
            if let Some(value) = pick(layer) {
                return value;
            }
        }
        default
    }

    proptest! {
        #[test]
        fn prop_precedence_per_field(
            call in layer_strategy(),
            client in proptest::option::of(layer_strategy()),
            global in layer_strategy(),
        ) {
            let mut params = GlobalParams::new().with_defaults(global.clone());
            if let Some(client) = &client {
                params = params.with_client("api", client.clone());
            }
            let resolved = params.resolve("api", &intent(call.clone()));
            let stack = [Some(&call), client.as_ref(), Some(&global)];

            prop_assert_eq!(&resolved.entity, expected(stack, ParamLayer::entity, DEFAULT_ENTITY));
            prop_assert_eq!(&resolved.url, expected(stack, ParamLayer::url, DEFAULT_URL));

            let style = stack
                .into_iter()
                .flatten()
                .find_map(|layer| layer.payload_style.as_ref())
                .copied()
                .unwrap_or_default();
            prop_assert_eq!(resolved.payload_style, style);
            prop_assert_eq!(resolved.request_config.url(), Some(resolved.url.as_str()));
        }
    }
}
