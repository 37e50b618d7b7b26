//! Actions handed to the dispatch sink.
//!
//! Every notification the interceptor emits is an [`Action`]: a type string
//! plus a [`Payload`]. Payloads are a discriminated variant rather than loose
//! JSON so the three lifecycle shapes stay explicit:
//!
//! - [`Payload::Plain`]: a single `status` token (`{status, data?|error?}`)
//! - [`Payload::Complex`]: three boolean phase flags keyed by status token
//! - [`Payload::Custom`]: anything a caller supplied (templates, callbacks)
//!
//! Serialization reproduces the wire shapes the dispatch pipeline expects:
//!
//! ```json
//! { "type": "USER_SUCCESS", "payload": { "status": "success", "data": { "id": 1 } } }
//! ```

use crate::client::HttpError;
use crate::lifecycle::{Phase, StatusTokens};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A unit of intent or notification flowing through the dispatch pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAction")]
pub struct Action {
    /// Action type string (e.g. `USER_REQUEST`)
    #[serde(rename = "type")]
    pub action_type: String,

    /// Action payload
    pub payload: Payload,
}

#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default)]
    payload: Value,
}

impl From<RawAction> for Action {
    fn from(raw: RawAction) -> Self {
        Self::custom(raw.action_type, raw.payload)
    }
}

impl Action {
    /// Create an action with an arbitrary JSON payload.
    #[must_use]
    pub fn custom(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Payload::Custom(payload),
        }
    }

    /// Whether this action can stand in for a lifecycle notification.
    ///
    /// Requires a non-empty type and a truthy payload.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.action_type.is_empty() && self.payload.is_truthy()
    }

    /// Render this action as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom payload cannot be represented as JSON.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// What a finished request produced, attached to success/failure payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Response body of a successful call
    Data(Value),
    /// Failure of the call
    Error(HttpError),
}

impl Outcome {
    fn write_entry<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            Self::Data(data) => map.serialize_entry("data", data),
            Self::Error(error) => map.serialize_entry("error", error),
        }
    }
}

/// `{status, data?|error?}` payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PlainPayload {
    /// Lowercase status token of the phase
    pub status: String,
    /// Result of the call, absent during the request phase
    pub outcome: Option<Outcome>,
}

/// Which of the three phases is active in a complex payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseFlags {
    /// Request in flight
    pub request: bool,
    /// Request succeeded
    pub success: bool,
    /// Request failed
    pub failure: bool,
}

impl PhaseFlags {
    /// Flags with only the given phase set.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Self {
        Self {
            request: matches!(phase, Phase::Request),
            success: matches!(phase, Phase::Success),
            failure: matches!(phase, Phase::Failure),
        }
    }

    /// Value of the flag belonging to `phase`.
    #[must_use]
    pub const fn get(self, phase: Phase) -> bool {
        match phase {
            Phase::Request => self.request,
            Phase::Success => self.success,
            Phase::Failure => self.failure,
        }
    }
}

/// Payload carrying three boolean phase flags.
///
/// The flags serialize under the status tokens, so with the suffixes
/// `REQUEST`/`SUCCESS`/`FAILURE` a success payload becomes
/// `{"request": false, "success": true, "failure": false, "data": ...}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexPayload {
    /// Token naming each flag
    pub tokens: StatusTokens,
    /// Flag values
    pub flags: PhaseFlags,
    /// Result of the call, absent during the request phase
    pub outcome: Option<Outcome>,
}

/// Payload of an [`Action`].
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Single status token
    Plain(PlainPayload),
    /// Three boolean phase flags
    Complex(ComplexPayload),
    /// Caller supplied JSON
    Custom(Value),
}

impl Payload {
    /// Truthiness in the dynamic-language sense.
    ///
    /// Lifecycle payloads are always truthy; custom payloads follow
    /// [`is_truthy`].
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Plain(_) | Self::Complex(_) => true,
            Self::Custom(value) => is_truthy(value),
        }
    }

    /// The custom JSON value, if this is a custom payload.
    #[must_use]
    pub const fn as_custom(&self) -> Option<&Value> {
        match self {
            Self::Custom(value) => Some(value),
            _ => None,
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(plain) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("status", &plain.status)?;
                if let Some(outcome) = &plain.outcome {
                    outcome.write_entry(&mut map)?;
                }
                map.end()
            }
            Self::Complex(complex) => {
                let mut map = serializer.serialize_map(None)?;
                for phase in Phase::ALL {
                    map.serialize_entry(complex.tokens.get(phase), &complex.flags.get(phase))?;
                }
                if let Some(outcome) = &complex.outcome {
                    outcome.write_entry(&mut map)?;
                }
                map.end()
            }
            Self::Custom(value) => value.serialize(serializer),
        }
    }
}

/// `null`, `false`, `0` and `""` are falsy, everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
