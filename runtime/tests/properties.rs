//! Property tests: whatever the layer stack, one request notification and
//! exactly one completion are dispatched, named after the resolved entity.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use http_lifecycle_core::{GlobalParams, HttpIntent, InboundAction};
use http_lifecycle_runtime::Interceptor;
use http_lifecycle_testing::properties::param_layer;
use http_lifecycle_testing::{MockHttpClient, RecordingDispatcher};
use proptest::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_one_request_and_one_completion(
        defaults in param_layer(),
        client_layer in param_layer(),
        call in param_layer(),
        fail in any::<bool>(),
    ) {
        init_tracing();
        let params = GlobalParams::new()
            .with_defaults(defaults)
            .with_client("api", client_layer);
        let intent = HttpIntent::new("api").with_params(call);
        let expected = params.resolve("api", &intent).lifecycle_types();

        let client = if fail {
            MockHttpClient::new().fail_with_status(500, json!(null))
        } else {
            MockHttpClient::new()
        };
        let interceptor = Interceptor::builder()
            .client("api", client.clone())
            .params(params)
            .build();

        let types = tokio_test::block_on(async {
            let recorder = RecordingDispatcher::new();
            interceptor
                .intercept(InboundAction::http(intent), &recorder.sink(), |_| ())
                .into_handle()
                .unwrap()
                .wait()
                .await
                .unwrap();
            recorder.action_types()
        });

        let completion = if fail { expected.failure } else { expected.success };
        prop_assert_eq!(types, vec![expected.request, completion]);
        prop_assert_eq!(client.request_count(), 1);
    }
}
