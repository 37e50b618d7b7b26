//! # HTTP Lifecycle Core
//!
//! Core types for the HTTP lifecycle interceptor.
//!
//! The interceptor sits between an action-dispatch pipeline and a set of
//! named HTTP clients. An inbound action that carries an [`HttpIntent`] is
//! turned into an HTTP call, and the call's lifecycle is reported back to the
//! pipeline as request/success/failure [`Action`]s.
//!
//! This crate holds everything that does not need an async runtime:
//!
//! - **Actions**: [`Action`] and its discriminated [`Payload`]
//! - **Intents**: [`HttpIntent`], the per-call request and routing description
//! - **Parameters**: [`ParamLayer`], [`GlobalParams`] and the layered resolver
//! - **Lifecycle types**: [`LifecycleTypes`] derived from entity and suffixes
//! - **Seams**: the [`HttpClient`] and [`Dispatch`] traits
//!
//! ## Example
//!
//! ```
//! use http_lifecycle_core::{GlobalParams, HttpIntent, ParamLayer, PayloadStyle};
//!
//! let params = GlobalParams::new()
//!     .with_defaults(ParamLayer::new().with_payload_style(PayloadStyle::Complex))
//!     .with_client("api", ParamLayer::new().with_entity("user"));
//!
//! let resolved = params.resolve("api", &HttpIntent::new("api").url("/users/1"));
//! let types = resolved.lifecycle_types();
//!
//! assert_eq!(resolved.request_config.url(), Some("/users/1"));
//! assert_eq!(types.request, "USER_REQUEST");
//! ```

/// Actions and payloads handed to the dispatch sink
pub mod action;

/// HTTP client trait, registry and request/response types
pub mod client;

/// Dispatch sink trait
pub mod dispatch;

/// Configuration errors
pub mod error;

/// HTTP intent carried by inbound actions
pub mod intent;

/// Lifecycle action types
pub mod lifecycle;

/// Layered request parameters
pub mod params;

pub use action::{Action, ComplexPayload, Outcome, Payload, PhaseFlags, PlainPayload, is_truthy};
pub use client::{ClientRegistry, HttpClient, HttpError, HttpResponse, HttpResult, RequestConfig};
pub use dispatch::Dispatch;
pub use error::ConfigError;
pub use intent::{
    DataCallback, FailureCallback, HttpIntent, HttpIntentCarrier, InboundAction, ResponseCallback,
};
pub use lifecycle::{LifecycleTypes, Phase, StatusTokens};
pub use params::{
    DEFAULT_ENTITY, DEFAULT_METHOD, DEFAULT_SUFFIXES, DEFAULT_URL, GlobalParams, Layers,
    ParamLayer, PayloadStyle, ResolvedConfig, Suffixes,
};
