//! # HTTP Lifecycle Testing
//!
//! Testing utilities and helpers for the HTTP lifecycle interceptor.
//!
//! This crate provides:
//! - [`MockHttpClient`]: scripted responses, records received requests
//! - [`RecordingDispatcher`]: collects dispatched actions
//! - [`InterceptorTest`]: Given-When-Then harness around the interceptor
//! - proptest strategies for parameter layers
//!
//! ## Example
//!
//! ```ignore
//! use http_lifecycle_testing::{MockHttpClient, RecordingDispatcher};
//! use http_lifecycle_runtime::Interceptor;
//!
//! #[tokio::test]
//! async fn test_user_fetch() {
//!     let client = MockHttpClient::new().respond_with(json!({"id": 1}));
//!     let interceptor = Interceptor::builder().client("api", client.clone()).build();
//!     let recorder = RecordingDispatcher::new();
//!
//!     let handled = interceptor.intercept(action, &recorder.sink(), |_| ());
//!     handled.into_handle().unwrap().wait().await.unwrap();
//!
//!     assert_eq!(recorder.len(), 2);
//!     assert_eq!(client.request_count(), 1);
//! }
//! ```


/// Mock collaborators
pub mod mocks;

/// Property-based testing utilities
///
/// Strategies for parameter layers, so resolution properties can be checked
/// against arbitrary layer stacks.
pub mod properties {
    use http_lifecycle_core::{ParamLayer, PayloadStyle, Suffixes};
    use proptest::prelude::*;

    /// Either payload style.
    pub fn payload_style() -> impl Strategy<Value = PayloadStyle> {
        prop_oneof![Just(PayloadStyle::Plain), Just(PayloadStyle::Complex)]
    }

    /// Uppercase suffix triples.
    pub fn suffixes() -> impl Strategy<Value = Suffixes> {
        ("[A-Z]{1,8}", "[A-Z]{1,8}", "[A-Z]{1,8}")
            .prop_map(|(request, success, failure)| Suffixes::new(request, success, failure))
    }

    /// Layers with any subset of fields set.
    pub fn param_layer() -> impl Strategy<Value = ParamLayer> {
        (
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of("/[a-z]{0,8}"),
            proptest::option::of(prop_oneof![Just("get"), Just("post"), Just("put")]),
            proptest::option::of(payload_style()),
            proptest::option::of(suffixes()),
        )
            .prop_map(|(entity, url, method, style, suffixes)| {
                let mut layer = ParamLayer::new();
                if let Some(entity) = entity {
                    layer = layer.with_entity(entity);
                }
                if let Some(url) = url {
                    layer = layer.with_url(url);
                }
                if let Some(method) = method {
                    layer = layer.with_method(method);
                }
                if let Some(style) = style {
                    layer = layer.with_payload_style(style);
                }
                if let Some(suffixes) = suffixes {
                    layer = layer.with_suffixes(suffixes);
                }
                layer
            })
    }
}

// Re-export commonly used items
pub use interceptor_test::{InterceptorTest, assertions};
pub use mocks::{MockHttpClient, RecordingDispatcher};
