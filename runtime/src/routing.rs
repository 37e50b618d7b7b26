//! Strategy selection for the three lifecycle notifications.
//!
//! These are pure functions: they decide *which* action represents a phase
//! and leave dispatching to the caller. `None` means nothing is dispatched
//! for that phase.

use http_lifecycle_core::{
    Action, ComplexPayload, HttpError, HttpIntent, HttpResponse, LifecycleTypes, Outcome, Payload,
    PayloadStyle, Phase, PhaseFlags, PlainPayload,
};
use serde_json::Value;

/// Default notification of `phase` in the given payload style.
#[must_use]
pub fn lifecycle_action(
    types: &LifecycleTypes,
    style: PayloadStyle,
    phase: Phase,
    outcome: Option<Outcome>,
) -> Action {
    let payload = match style {
        PayloadStyle::Plain => Payload::Plain(PlainPayload {
            status: types.statuses.get(phase).to_string(),
            outcome,
        }),
        PayloadStyle::Complex => Payload::Complex(ComplexPayload {
            tokens: types.statuses.clone(),
            flags: PhaseFlags::for_phase(phase),
            outcome,
        }),
    };

    Action {
        action_type: types.type_for(phase).to_string(),
        payload,
    }
}

/// Notification dispatched before the HTTP call is issued.
///
/// First match wins: the intent's own `type`/`payload` override, a
/// well-formed `request_action`, then the default for the payload style.
#[must_use]
pub fn request_action(intent: &HttpIntent, types: &LifecycleTypes, style: PayloadStyle) -> Action {
    if let Some(action) = intent.override_action() {
        return action;
    }

    if let Some(action) = intent.request_action.as_ref().filter(|a| a.is_well_formed()) {
        return action.clone();
    }

    lifecycle_action(types, style, Phase::Request, None)
}

/// Notification dispatched after a successful call.
///
/// Callbacks take priority over the `success_action` template, which takes
/// priority over the payload-style default. Returns `None` only when the
/// template's payload is not an object.
#[must_use]
pub fn success_action(
    intent: &HttpIntent,
    types: &LifecycleTypes,
    style: PayloadStyle,
    response: &HttpResponse,
) -> Option<Action> {
    if let Some(callback) = &intent.on_response {
        return Some(callback(response));
    }

    if let Some(callback) = &intent.on_success {
        return Some(callback(&response.data));
    }

    if let Some(template) = intent.success_action.as_ref().filter(|a| a.is_well_formed()) {
        return complete_template(template, "data", response.data.clone());
    }

    Some(lifecycle_action(
        types,
        style,
        Phase::Success,
        Some(Outcome::Data(response.data.clone())),
    ))
}

/// Notification dispatched after a failed call.
///
/// Mirrors [`success_action`] with `on_failure` and `failure_action`.
#[must_use]
pub fn failure_action(
    intent: &HttpIntent,
    types: &LifecycleTypes,
    style: PayloadStyle,
    error: &HttpError,
) -> Option<Action> {
    if let Some(callback) = &intent.on_failure {
        return Some(callback(error));
    }

    if let Some(template) = intent.failure_action.as_ref().filter(|a| a.is_well_formed()) {
        let error = match serde_json::to_value(error) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize HTTP error");
                Value::String(error.to_string())
            }
        };
        return complete_template(template, "error", error);
    }

    Some(lifecycle_action(
        types,
        style,
        Phase::Failure,
        Some(Outcome::Error(error.clone())),
    ))
}

/// Copy of `template` with `key` merged into its object payload.
fn complete_template(template: &Action, key: &str, value: Value) -> Option<Action> {
    let Some(Value::Object(payload)) = template.payload.as_custom() else {
        tracing::warn!(
            action_type = %template.action_type,
            field = key,
            "Custom action payload must be an object, skipping dispatch"
        );
        return None;
    };

    let mut payload = payload.clone();
    payload.insert(key.to_string(), value);
    Some(Action::custom(template.action_type.clone(), Value::Object(payload)))
}
