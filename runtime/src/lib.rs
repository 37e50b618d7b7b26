//! # HTTP Lifecycle Runtime
//!
//! The interceptor that turns HTTP intents into HTTP calls and lifecycle
//! notifications.
//!
//! ## Core Components
//!
//! - **Interceptor**: built once from a [`ClientRegistry`] and [`GlobalParams`]
//! - **Routing**: picks the action for each lifecycle phase
//! - **Request Executor**: runs the one async HTTP call per action on tokio
//!
//! ## Flow
//!
//! 1. Non-qualifying actions (no intent, no `base`, unknown client, no tokio
//!    runtime to run the call on) go to `next` unchanged
//! 2. The configuration layers are resolved and the lifecycle types derived
//! 3. The request notification is dispatched synchronously
//! 4. The HTTP call is spawned; its result is routed to exactly one success or
//!    failure notification (or a logged skip)
//!
//! ## Example
//!
//! ```ignore
//! use http_lifecycle_runtime::{Interceptor, Interception};
//!
//! let interceptor = Interceptor::builder()
//!     .client("api", api_client)
//!     .params(GlobalParams::from_env()?)
//!     .build();
//!
//! let dispatch: Arc<dyn Dispatch> = Arc::new(store_dispatcher);
//! match interceptor.intercept(action, &dispatch, |action| next(action)) {
//!     Interception::Passed(result) => result,
//!     Interception::Handled(handle) => handle.wait().await?,
//! }
//! ```

use http_lifecycle_core::{
    ClientRegistry, Dispatch, GlobalParams, HttpClient, HttpIntent, HttpIntentCarrier,
    LifecycleTypes, PayloadStyle, ResolvedConfig,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Channel-backed dispatch sink
pub mod dispatcher;

/// Prometheus metrics for observability
pub mod metrics;

/// Strategy selection for lifecycle notifications
pub mod routing;

pub use dispatcher::ChannelDispatcher;
pub use error::InterceptError;

use crate::metrics::InterceptorMetrics;

/// Error types for the interceptor runtime
pub mod error {
    use thiserror::Error;

    /// Errors surfaced while waiting on an intercepted request
    #[derive(Error, Debug)]
    pub enum InterceptError {
        /// The task running the request panicked or was aborted
        ///
        /// HTTP failures never end up here; they are routed to a failure
        /// notification instead.
        #[error("Request task failed: {0}")]
        TaskFailed(#[from] tokio::task::JoinError),
    }
}

/// Result of [`Interceptor::intercept`].
#[derive(Debug)]
pub enum Interception<T> {
    /// The action did not qualify and was handed to `next`
    Passed(T),
    /// The action was turned into an HTTP call
    Handled(RequestHandle),
}

impl<T> Interception<T> {
    /// Whether the interceptor took the action.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Result of `next`, if the action was passed through.
    #[must_use]
    pub fn into_passed(self) -> Option<T> {
        match self {
            Self::Passed(result) => Some(result),
            Self::Handled(_) => None,
        }
    }

    /// Handle of the in-flight request, if the action was handled.
    #[must_use]
    pub fn into_handle(self) -> Option<RequestHandle> {
        match self {
            Self::Passed(_) => None,
            Self::Handled(handle) => Some(handle),
        }
    }
}

/// Handle to an in-flight request.
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct RequestHandle {
    task: JoinHandle<()>,
}

impl RequestHandle {
    /// Wait until the request finished and its notification was dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::TaskFailed`] if the task panicked, e.g.
    /// because a callback or the dispatch sink panicked.
    pub async fn wait(self) -> Result<(), InterceptError> {
        self.task.await?;
        Ok(())
    }

    /// Whether the request and its routing are complete.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

struct Inner {
    clients: ClientRegistry,
    params: GlobalParams,
    runtime: Option<Handle>,
}

/// Dispatch interceptor for HTTP intents.
///
/// The client registry and global parameters are fixed at construction and
/// shared read-only by every invocation. Cloning is cheap.
#[derive(Clone)]
pub struct Interceptor {
    inner: Arc<Inner>,
}

impl Interceptor {
    /// Create an interceptor over `clients` with the given defaults.
    #[must_use]
    pub fn new(clients: ClientRegistry, params: GlobalParams) -> Self {
        InterceptorBuilder {
            clients,
            params,
            runtime: None,
        }
        .build()
    }

    /// Start building an interceptor.
    #[must_use]
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::default()
    }

    /// Registered clients.
    #[must_use]
    pub fn clients(&self) -> &ClientRegistry {
        &self.inner.clients
    }

    /// Global parameters.
    #[must_use]
    pub fn params(&self) -> &GlobalParams {
        &self.inner.params
    }

    /// Handle one action.
    ///
    /// Actions without an intent, without a `base`, or naming an unknown
    /// client are handed to `next` and its result returned in
    /// [`Interception::Passed`]; nothing is dispatched for them. The same
    /// holds when there is no runtime to run the call on: neither one set
    /// with [`InterceptorBuilder::runtime`] nor an ambient tokio runtime.
    ///
    /// Otherwise the request notification is dispatched before this returns,
    /// the HTTP call is spawned, and `next` is never called.
    #[tracing::instrument(skip_all, name = "http_intercept")]
    pub fn intercept<A, T, N>(&self, action: A, dispatch: &Arc<dyn Dispatch>, next: N) -> Interception<T>
    where
        A: HttpIntentCarrier,
        N: FnOnce(A) -> T,
    {
        let Some((base, client, intent, runtime)) = self.qualify(&action) else {
            InterceptorMetrics::record_passthrough();
            return Interception::Passed(next(action));
        };

        let resolved = self.inner.params.resolve(&base, &intent);
        let types = resolved.lifecycle_types();

        let request = routing::request_action(&intent, &types, resolved.payload_style);
        tracing::debug!(action_type = %request.action_type, "Dispatching request notification");
        dispatch.dispatch(request);

        Interception::Handled(Self::execute(
            &runtime,
            base,
            &client,
            intent,
            resolved,
            types,
            Arc::clone(dispatch),
        ))
    }

    /// Middleware in the `(dispatch, next) -> (action) -> result` shape.
    pub fn middleware<A, T, N>(
        &self,
        dispatch: Arc<dyn Dispatch>,
        next: N,
    ) -> impl Fn(A) -> Interception<T> + use<A, T, N>
    where
        A: HttpIntentCarrier,
        N: Fn(A) -> T,
    {
        let interceptor = self.clone();
        move |action| interceptor.intercept(action, &dispatch, &next)
    }

    fn qualify<A: HttpIntentCarrier>(
        &self,
        action: &A,
    ) -> Option<(String, Arc<dyn HttpClient>, HttpIntent, Handle)> {
        let Some(intent) = action.http_intent() else {
            tracing::trace!("No HTTP intent, passing action through");
            return None;
        };

        let Some(base) = intent.base() else {
            tracing::debug!("HTTP intent without base, passing action through");
            return None;
        };

        let Some(client) = self.inner.clients.get(base) else {
            tracing::debug!(base, "Unknown HTTP client, passing action through");
            return None;
        };

        let runtime = match &self.inner.runtime {
            Some(runtime) => runtime.clone(),
            None => match Handle::try_current() {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!(
                        base,
                        error = %e,
                        "No tokio runtime for HTTP request, passing action through"
                    );
                    return None;
                }
            },
        };

        Some((base.to_string(), Arc::clone(client), intent.clone(), runtime))
    }

    fn execute(
        runtime: &Handle,
        base: String,
        client: &Arc<dyn HttpClient>,
        intent: HttpIntent,
        resolved: ResolvedConfig,
        types: LifecycleTypes,
        dispatch: Arc<dyn Dispatch>,
    ) -> RequestHandle {
        let style: PayloadStyle = resolved.payload_style;
        tracing::info!(
            base = %base,
            method = %resolved.method,
            url = %resolved.url,
            "Issuing HTTP request"
        );
        InterceptorMetrics::record_request(&base);

        let span = tracing::debug_span!("http_request", base = %base, url = %resolved.url);
        let started = Instant::now();
        let response = client.request(resolved.request_config);

        let task = runtime.spawn(
            async move {
                let result = response.await;
                InterceptorMetrics::record_completion(&base, result.is_ok(), started.elapsed());

                let action = match &result {
                    Ok(response) => {
                        tracing::debug!(status = response.status, "HTTP request succeeded");
                        routing::success_action(&intent, &types, style, response)
                    }
                    Err(error) => {
                        tracing::debug!(error = %error, "HTTP request failed");
                        routing::failure_action(&intent, &types, style, error)
                    }
                };

                if let Some(action) = action {
                    tracing::debug!(action_type = %action.action_type, "Dispatching completion");
                    dispatch.dispatch(action);
                }
            }
            .instrument(span),
        );

        RequestHandle { task }
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("clients", &self.inner.clients)
            .field("params", &self.inner.params)
            .finish()
    }
}

/// Builder for [`Interceptor`].
#[derive(Default)]
pub struct InterceptorBuilder {
    clients: ClientRegistry,
    params: GlobalParams,
    runtime: Option<Handle>,
}

impl InterceptorBuilder {
    /// Register a client under `name`.
    #[must_use]
    pub fn client(mut self, name: impl Into<String>, client: impl HttpClient + 'static) -> Self {
        self.clients = self.clients.with_client(name, client);
        self
    }

    /// Register a shared client under `name`.
    #[must_use]
    pub fn shared_client(mut self, name: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        self.clients.register(name, client);
        self
    }

    /// Set the global parameters.
    #[must_use]
    pub fn params(mut self, params: GlobalParams) -> Self {
        self.params = params;
        self
    }

    /// Run requests on `runtime` instead of the caller's ambient runtime.
    ///
    /// Lets `intercept` be called from threads outside any tokio runtime.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the interceptor.
    #[must_use]
    pub fn build(self) -> Interceptor {
        tracing::debug!(clients = self.clients.len(), "Creating HTTP interceptor");
        Interceptor {
            inner: Arc::new(Inner {
                clients: self.clients,
                params: self.params,
                runtime: self.runtime,
            }),
        }
    }
}
