//! Mock collaborators: a scripted HTTP client and a recording dispatch sink.

use futures::future::BoxFuture;
use http_lifecycle_core::{
    Action, Dispatch, HttpClient, HttpError, HttpResponse, HttpResult, RequestConfig,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// HTTP client returning scripted results.
///
/// Scripted results are consumed first-in first-out; once exhausted every
/// call gets the fallback (a `200` with `null` body unless changed). Every
/// [`RequestConfig`] received is recorded. Clones share script and record.
///
/// # Example
///
/// ```
/// use http_lifecycle_testing::MockHttpClient;
/// use serde_json::json;
///
/// let client = MockHttpClient::new()
///     .respond_with(json!({"id": 1}))
///     .fail_with_status(500, json!({"message": "boom"}));
/// assert_eq!(client.request_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    script: Arc<Mutex<VecDeque<HttpResult>>>,
    fallback: Arc<Mutex<HttpResult>>,
    requests: Arc<Mutex<Vec<RequestConfig>>>,
    delay: Option<Duration>,
}

impl MockHttpClient {
    /// Client answering `200 null` to everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(Ok(HttpResponse::ok(Value::Null)))),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Queue a `200` response with `data` as body.
    #[must_use]
    pub fn respond_with(self, data: Value) -> Self {
        self.push(Ok(HttpResponse::ok(data)))
    }

    /// Queue a full response.
    #[must_use]
    pub fn respond_with_response(self, response: HttpResponse) -> Self {
        self.push(Ok(response))
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail_with(self, error: HttpError) -> Self {
        self.push(Err(error))
    }

    /// Queue a non-success status failure.
    #[must_use]
    pub fn fail_with_status(self, status: u16, data: Value) -> Self {
        self.fail_with(HttpError::Status { status, data })
    }

    /// Result returned once the script is exhausted.
    #[must_use]
    pub fn with_fallback(self, result: HttpResult) -> Self {
        *lock(&self.fallback) = result;
        self
    }

    /// Delay every answer by `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn push(self, result: HttpResult) -> Self {
        lock(&self.script).push_back(result);
        self
    }

    /// Requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RequestConfig> {
        lock(&self.requests).clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for MockHttpClient {
    fn request(&self, config: RequestConfig) -> BoxFuture<'static, HttpResult> {
        lock(&self.requests).push(config);
        let result = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| lock(&self.fallback).clone());
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

/// Dispatch sink that records every action.
///
/// Clones share the record.
#[derive(Clone, Debug, Default)]
pub struct RecordingDispatcher {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl RecordingDispatcher {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// This recorder as a shared dispatch sink.
    #[must_use]
    pub fn sink(&self) -> Arc<dyn Dispatch> {
        Arc::new(self.clone())
    }

    /// Actions dispatched so far.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        lock(&self.actions).clone()
    }

    /// Types of the actions dispatched so far.
    #[must_use]
    pub fn action_types(&self) -> Vec<String> {
        lock(&self.actions)
            .iter()
            .map(|a| a.action_type.clone())
            .collect()
    }

    /// Number of actions dispatched so far.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.actions).len()
    }

    /// Whether nothing has been dispatched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.actions).is_empty()
    }

    /// Forget recorded actions.
    pub fn clear(&self) {
        lock(&self.actions).clear();
    }
}

impl Dispatch for RecordingDispatcher {
    fn dispatch(&self, action: Action) {
        lock(&self.actions).push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let client = MockHttpClient::new()
            .respond_with(json!(1))
            .fail_with_status(404, json!(null));

        let first = client.request(RequestConfig::new().with_url("/a")).await;
        let second = client.request(RequestConfig::new().with_url("/b")).await;
        let third = client.request(RequestConfig::new().with_url("/c")).await;

        assert_eq!(first.unwrap().data, json!(1));
        assert_eq!(second.unwrap_err(), HttpError::Status { status: 404, data: json!(null) });
        assert_eq!(third.unwrap().data, Value::Null);

        let urls: Vec<String> = client
            .requests()
            .iter()
            .filter_map(|r| r.url().map(str::to_string))
            .collect();
        assert_eq!(urls, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_recording_dispatcher() {
        let recorder = RecordingDispatcher::new();
        let sink = recorder.sink();

        sink.dispatch(Action::custom("A", json!({})));
        sink.dispatch(Action::custom("B", json!({})));

        assert_eq!(recorder.action_types(), vec!["A", "B"]);
        recorder.clear();
        assert!(recorder.is_empty());
    }
}
