//! Integration tests for the request/success/failure flow of the interceptor
//!
//! Tests drive the interceptor with mock clients and a recording dispatcher,
//! waiting on each request handle before asserting.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use http_lifecycle_core::{
    Action, GlobalParams, HttpError, HttpIntent, HttpResponse, InboundAction, ParamLayer,
    PayloadStyle, RequestConfig, Suffixes,
};
use http_lifecycle_runtime::{InterceptError, Interception, Interceptor};
use http_lifecycle_testing::{MockHttpClient, RecordingDispatcher, assertions};
use serde_json::json;

fn user_suffixes() -> Suffixes {
    Suffixes::new("REQUEST", "SUCCESS", "FAILURE")
}

fn user_intent() -> HttpIntent {
    HttpIntent::new("api").entity("user").suffixes(user_suffixes())
}

async fn run(interceptor: &Interceptor, action: InboundAction) -> RecordingDispatcher {
    let recorder = RecordingDispatcher::new();
    let interception = interceptor.intercept(action, &recorder.sink(), |_| ());
    if let Interception::Handled(handle) = interception {
        handle.wait().await.unwrap();
    }
    recorder
}

#[tokio::test]
async fn test_actions_without_base_pass_through() {
    let client = MockHttpClient::new();
    let interceptor = Interceptor::builder().client("api", client.clone()).build();
    let recorder = RecordingDispatcher::new();
    let sink = recorder.sink();

    let cases = vec![
        None,
        Some(InboundAction::new("PLAIN", json!({"n": 1}))),
        Some(InboundAction::http(HttpIntent::default())),
        Some(InboundAction::http(HttpIntent::new(""))),
        Some(InboundAction::http(HttpIntent::new("unregistered"))),
    ];

    for case in cases {
        let expected = case.as_ref().map(|a| a.action_type.clone());
        let result = interceptor.intercept(case, &sink, |action| action.map(|a| a.action_type));
        assert_eq!(result.into_passed(), Some(expected));
    }

    assertions::assert_nothing_dispatched(&recorder.actions());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_request_notification_precedes_http_call() {
    let client = MockHttpClient::new();
    let interceptor = Interceptor::builder().client("api", client.clone()).build();
    let recorder = RecordingDispatcher::new();

    let custom = Action::custom("LOADING", json!({"busy": true}));
    let interception = interceptor.intercept(
        InboundAction::http(user_intent().with_request_action(custom.clone())),
        &recorder.sink(),
        |_| (),
    );

    // Dispatched synchronously, before the spawned call completes.
    assert_eq!(recorder.actions(), vec![custom]);

    interception.into_handle().unwrap().wait().await.unwrap();
    assert_eq!(recorder.action_types(), vec!["LOADING", "USER_SUCCESS"]);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_plain_success_payload() {
    let interceptor = Interceptor::builder()
        .client("api", MockHttpClient::new().respond_with(json!({"id": 1})))
        .build();

    let recorder = run(&interceptor, InboundAction::http(user_intent())).await;
    let actions = recorder.actions();

    assertions::assert_action_types(&actions, &["USER_REQUEST", "USER_SUCCESS"]);
    assert_eq!(
        actions[0].to_value().unwrap()["payload"],
        json!({"status": "request"})
    );
    assert_eq!(
        actions[1].to_value().unwrap()["payload"],
        json!({"status": "success", "data": {"id": 1}})
    );
}

#[tokio::test]
async fn test_complex_failure_payload() {
    let interceptor = Interceptor::builder()
        .client(
            "api",
            MockHttpClient::new().fail_with_status(503, json!({"message": "unavailable"})),
        )
        .build();

    let intent = user_intent().payload_style(PayloadStyle::Complex);
    let recorder = run(&interceptor, InboundAction::http(intent)).await;
    let actions = recorder.actions();

    assertions::assert_action_types(&actions, &["USER_REQUEST", "USER_FAILURE"]);
    assert_eq!(
        actions[1].to_value().unwrap()["payload"],
        json!({
            "request": false,
            "success": false,
            "failure": true,
            "error": {"kind": "status", "status": 503, "data": {"message": "unavailable"}}
        })
    );
}

#[tokio::test]
async fn test_default_suffix_typo_is_preserved() {
    let interceptor = Interceptor::builder()
        .client("api", MockHttpClient::new())
        .build();

    let recorder = run(&interceptor, InboundAction::http(HttpIntent::new("api"))).await;
    let actions = recorder.actions();

    assertions::assert_action_types(&actions, &["ENTITY_REQUEST", "ENTITY_ SUCCESS"]);
    assert_eq!(actions[1].to_value().unwrap()["payload"]["status"], json!(" success"));
}

#[tokio::test]
async fn test_on_response_suppresses_other_success_strategies() {
    let interceptor = Interceptor::builder()
        .client("api", MockHttpClient::new().respond_with(json!([1, 2, 3])))
        .build();

    let intent = user_intent()
        .on_response(|response: &HttpResponse| {
            Action::custom("RESPONSE", json!({"count": response.data.as_array().map(Vec::len)}))
        })
        .on_success(|_| Action::custom("SUCCESS_CALLBACK", json!({})))
        .with_success_action(Action::custom("SUCCESS_TEMPLATE", json!({})));

    let recorder = run(&interceptor, InboundAction::http(intent)).await;

    assert_eq!(recorder.action_types(), vec!["USER_REQUEST", "RESPONSE"]);
    assert_eq!(recorder.actions()[1], Action::custom("RESPONSE", json!({"count": 3})));
}

#[tokio::test]
async fn test_malformed_success_template_dispatches_nothing() {
    let interceptor = Interceptor::builder()
        .client("api", MockHttpClient::new().respond_with(json!({"id": 1})))
        .build();

    let intent = user_intent().with_success_action(Action::custom("X", json!("not-an-object")));
    let recorder = run(&interceptor, InboundAction::http(intent)).await;

    // Only the request notification; no fallback to the default success.
    assert_eq!(recorder.action_types(), vec!["USER_REQUEST"]);
}

#[tokio::test]
async fn test_malformed_failure_template_dispatches_nothing() {
    let interceptor = Interceptor::builder()
        .client(
            "api",
            MockHttpClient::new().fail_with(HttpError::Transport {
                message: "reset".to_string(),
            }),
        )
        .build();

    let intent = user_intent().with_failure_action(Action::custom("X", json!(42)));
    let recorder = run(&interceptor, InboundAction::http(intent)).await;

    assert_eq!(recorder.action_types(), vec!["USER_REQUEST"]);
}

#[tokio::test]
async fn test_templates_receive_data_and_error() {
    let interceptor = Interceptor::builder()
        .client(
            "api",
            MockHttpClient::new()
                .respond_with(json!({"id": 7}))
                .fail_with_status(404, json!(null)),
        )
        .build();

    let intent = user_intent()
        .with_success_action(Action::custom("USER_LOADED", json!({"source": "api"})))
        .with_failure_action(Action::custom("USER_MISSING", json!({"source": "api"})));

    let first = run(&interceptor, InboundAction::http(intent.clone())).await;
    assert_eq!(
        first.actions()[1],
        Action::custom("USER_LOADED", json!({"source": "api", "data": {"id": 7}}))
    );

    let second = run(&interceptor, InboundAction::http(intent)).await;
    assert_eq!(
        second.actions()[1],
        Action::custom(
            "USER_MISSING",
            json!({"source": "api", "error": {"kind": "status", "status": 404, "data": null}})
        )
    );
}

#[tokio::test]
async fn test_resolved_url_and_method_beat_custom_config() {
    let client = MockHttpClient::new();
    let params = GlobalParams::new()
        .with_defaults(ParamLayer::new().with_method("post"))
        .with_client("api", ParamLayer::new().with_url("/users"));
    let interceptor = Interceptor::builder()
        .client("api", client.clone())
        .params(params)
        .build();

    let config = RequestConfig::new()
        .with_url("/ignored")
        .with_method("delete")
        .with("data", json!({"name": "ada"}));
    run(&interceptor, InboundAction::http(user_intent().with_config(config))).await;

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url(), Some("/users"));
    assert_eq!(requests[0].method(), Some("post"));
    assert_eq!(requests[0].get("data"), Some(&json!({"name": "ada"})));
}

#[tokio::test]
async fn test_override_replaces_request_notification_only() {
    let interceptor = Interceptor::builder()
        .client("api", MockHttpClient::new().respond_with(json!("ok")))
        .build();

    let intent = user_intent().with_override("CUSTOM_START", json!({"step": 1}));
    let recorder = run(&interceptor, InboundAction::http(intent)).await;

    assert_eq!(recorder.action_types(), vec!["CUSTOM_START", "USER_SUCCESS"]);
}

#[tokio::test]
async fn test_intent_from_json() {
    let client = MockHttpClient::new().respond_with(json!({"id": 3}));
    let interceptor = Interceptor::builder().client("api", client.clone()).build();

    let action: InboundAction = serde_json::from_value(json!({
        "type": "LOAD_ORDER",
        "http": {
            "base": "api",
            "entity": "order",
            "url": "/orders/3",
            "payloadStyle": "complex",
            "suffixes": ["START", "DONE", "FAIL"]
        }
    }))
    .unwrap();

    let recorder = run(&interceptor, action).await;

    assert_eq!(recorder.action_types(), vec!["ORDER_START", "ORDER_DONE"]);
    assert_eq!(
        recorder.actions()[1].to_value().unwrap()["payload"],
        json!({"start": false, "done": true, "fail": false, "data": {"id": 3}})
    );
    assert_eq!(client.requests()[0].url(), Some("/orders/3"));
}

#[tokio::test]
async fn test_panicking_callback_fails_the_task_without_completion() {
    let interceptor = Interceptor::builder()
        .client("api", MockHttpClient::new().respond_with(json!({"id": 1})))
        .build();
    let recorder = RecordingDispatcher::new();

    let intent = user_intent().on_success(|_| panic!("callback bug"));
    let handle = interceptor
        .intercept(InboundAction::http(intent), &recorder.sink(), |_| ())
        .into_handle()
        .unwrap();

    let result = handle.wait().await;

    assert!(matches!(result, Err(InterceptError::TaskFailed(_))));
    assert_eq!(recorder.action_types(), vec!["USER_REQUEST"]);
}
