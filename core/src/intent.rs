//! HTTP intent carried by inbound actions.
//!
//! An [`HttpIntent`] names the client to call (`base`), optional call-level
//! parameters, and how results should be routed back into the pipeline.
//!
//! # Routing strategies
//!
//! | Phase   | Checked in order                                                  |
//! |---------|-------------------------------------------------------------------|
//! | request | override `type`/`payload`, `request_action`, payload style         |
//! | success | `on_response`, `on_success`, `success_action`, payload style       |
//! | failure | `on_failure`, `failure_action`, payload style                      |

use crate::action::Action;
use crate::client::{HttpError, HttpResponse, RequestConfig};
use crate::params::{ParamLayer, PayloadStyle, Suffixes};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Maps the full response to the action to dispatch.
pub type ResponseCallback = Arc<dyn Fn(&HttpResponse) -> Action + Send + Sync>;

/// Maps the response body to the action to dispatch.
pub type DataCallback = Arc<dyn Fn(&Value) -> Action + Send + Sync>;

/// Maps a failure to the action to dispatch.
pub type FailureCallback = Arc<dyn Fn(&HttpError) -> Action + Send + Sync>;

/// Description of one HTTP call and its result routing.
///
/// Everything except the callbacks can be deserialized:
///
/// ```
/// use http_lifecycle_core::HttpIntent;
///
/// let intent: HttpIntent = serde_json::from_str(r#"{
///     "base": "api",
///     "entity": "user",
///     "url": "/users/1",
///     "successAction": { "type": "USER_LOADED", "payload": {} }
/// }"#).unwrap();
///
/// assert_eq!(intent.base.as_deref(), Some("api"));
/// assert_eq!(intent.params.entity(), Some("user"));
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpIntent {
    /// Name of the registered client; without it the action is not handled
    pub base: Option<String>,

    /// Call-level parameters, the most specific layer
    #[serde(flatten)]
    pub params: ParamLayer,

    /// Raw HTTP options handed to the client
    pub config: Option<RequestConfig>,

    /// Override of the request-phase notification type
    #[serde(rename = "type")]
    pub action_type: Option<String>,

    /// Override of the request-phase notification payload
    pub payload: Option<Value>,

    /// Action dispatched instead of the default request notification
    pub request_action: Option<Action>,

    /// Template completed with `data` on success
    pub success_action: Option<Action>,

    /// Template completed with `error` on failure
    pub failure_action: Option<Action>,

    /// Success callback receiving the full response
    #[serde(skip)]
    pub on_response: Option<ResponseCallback>,

    /// Success callback receiving the response body
    #[serde(skip)]
    pub on_success: Option<DataCallback>,

    /// Failure callback
    #[serde(skip)]
    pub on_failure: Option<FailureCallback>,
}

impl HttpIntent {
    /// Intent targeting the client registered as `base`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::default()
        }
    }

    /// Client name, if set and non-empty.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref().filter(|b| !b.is_empty())
    }

    /// Replace the call-level parameters.
    #[must_use]
    pub fn with_params(mut self, params: ParamLayer) -> Self {
        self.params = params;
        self
    }

    /// Set the entity name.
    #[must_use]
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.params = self.params.with_entity(entity);
        self
    }

    /// Set the URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.params = self.params.with_url(url);
        self
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.params = self.params.with_method(method);
        self
    }

    /// Set the payload style.
    #[must_use]
    pub fn payload_style(mut self, style: PayloadStyle) -> Self {
        self.params = self.params.with_payload_style(style);
        self
    }

    /// Set the lifecycle suffixes.
    #[must_use]
    pub fn suffixes(mut self, suffixes: Suffixes) -> Self {
        self.params = self.params.with_suffixes(suffixes);
        self
    }

    /// Set the raw HTTP options.
    #[must_use]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the request-phase notification with `{type, payload}`.
    #[must_use]
    pub fn with_override(mut self, action_type: impl Into<String>, payload: Value) -> Self {
        self.action_type = Some(action_type.into());
        self.payload = Some(payload);
        self
    }

    /// Dispatch `action` instead of the default request notification.
    #[must_use]
    pub fn with_request_action(mut self, action: Action) -> Self {
        self.request_action = Some(action);
        self
    }

    /// Dispatch `action` with `data` merged into its payload on success.
    #[must_use]
    pub fn with_success_action(mut self, action: Action) -> Self {
        self.success_action = Some(action);
        self
    }

    /// Dispatch `action` with `error` merged into its payload on failure.
    #[must_use]
    pub fn with_failure_action(mut self, action: Action) -> Self {
        self.failure_action = Some(action);
        self
    }

    /// Map the full response to the success action.
    #[must_use]
    pub fn on_response<F>(mut self, callback: F) -> Self
    where
        F: Fn(&HttpResponse) -> Action + Send + Sync + 'static,
    {
        self.on_response = Some(Arc::new(callback));
        self
    }

    /// Map the response body to the success action.
    #[must_use]
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) -> Action + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Map a failure to the failure action.
    #[must_use]
    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&HttpError) -> Action + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(callback));
        self
    }

    /// The `{type, payload}` override, when both parts are present.
    ///
    /// An empty type or falsy payload disables the override.
    #[must_use]
    pub fn override_action(&self) -> Option<Action> {
        let action_type = self.action_type.as_deref()?;
        let payload = self.payload.as_ref()?;
        let action = Action::custom(action_type, payload.clone());
        action.is_well_formed().then_some(action)
    }

    /// Whether a callback takes over success routing.
    #[must_use]
    pub const fn has_success_callback(&self) -> bool {
        self.on_response.is_some() || self.on_success.is_some()
    }
}

impl fmt::Debug for HttpIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIntent")
            .field("base", &self.base)
            .field("params", &self.params)
            .field("config", &self.config)
            .field("action_type", &self.action_type)
            .field("payload", &self.payload)
            .field("request_action", &self.request_action)
            .field("success_action", &self.success_action)
            .field("failure_action", &self.failure_action)
            .field("on_response", &self.on_response.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Anything that may carry an [`HttpIntent`].
///
/// Implement this for an application's own action type to let the
/// interceptor inspect it.
pub trait HttpIntentCarrier {
    /// The intent, if the action declares one.
    fn http_intent(&self) -> Option<&HttpIntent>;
}

impl HttpIntentCarrier for HttpIntent {
    fn http_intent(&self) -> Option<&HttpIntent> {
        Some(self)
    }
}

impl<A: HttpIntentCarrier> HttpIntentCarrier for Option<A> {
    fn http_intent(&self) -> Option<&HttpIntent> {
        self.as_ref().and_then(HttpIntentCarrier::http_intent)
    }
}

/// Generic inbound action: type, payload and an optional HTTP intent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InboundAction {
    /// Action type
    #[serde(rename = "type", default)]
    pub action_type: String,

    /// Action payload
    #[serde(default)]
    pub payload: Value,

    /// HTTP intent, read from `http` or `axios`
    #[serde(default, alias = "axios")]
    pub http: Option<HttpIntent>,
}

impl InboundAction {
    /// Action without an HTTP intent.
    #[must_use]
    pub fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
            http: None,
        }
    }

    /// Action that only carries an HTTP intent.
    #[must_use]
    pub fn http(intent: HttpIntent) -> Self {
        Self {
            http: Some(intent),
            ..Self::default()
        }
    }
}

impl HttpIntentCarrier for InboundAction {
    fn http_intent(&self) -> Option<&HttpIntent> {
        self.http.as_ref()
    }
}
