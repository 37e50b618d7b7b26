//! # reqwest HTTP client
//!
//! A [`HttpClient`](http_lifecycle_core::HttpClient) backed by reqwest, for
//! registering real HTTP endpoints with the interceptor.
//!
//! ## Example
//!
//! ```no_run
//! use http_lifecycle_core::{HttpIntent, InboundAction};
//! use http_lifecycle_reqwest::ReqwestClient;
//! use http_lifecycle_runtime::Interceptor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let interceptor = Interceptor::builder()
//!         .client(
//!             "api",
//!             ReqwestClient::new("https://api.example.com").with_header("accept", "application/json"),
//!         )
//!         .build();
//!
//!     let dispatch: Arc<dyn http_lifecycle_core::Dispatch> =
//!         Arc::new(|action: http_lifecycle_core::Action| println!("{}", action.action_type));
//!
//!     let action = InboundAction::http(HttpIntent::new("api").entity("user").url("/users/1"));
//!     if let Some(handle) = interceptor.intercept(action, &dispatch, |_| ()).into_handle() {
//!         let _ = handle.wait().await;
//!     }
//! }
//! ```
//!
//! Non-2xx answers become [`HttpError::Status`](http_lifecycle_core::HttpError::Status)
//! carrying the decoded body, so they route to the failure notification.

pub mod client;

pub use client::ReqwestClient;
