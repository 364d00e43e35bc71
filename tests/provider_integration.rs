// tests/provider_integration.rs

use llm_map_rs::types::{ErrorReply, LngLat, MapBounds, MapState};
use llm_map_rs::{LlmClient, MapCommandRequest, MapCommandService, MapLlmError};

#[test]
fn empty_api_key_is_rejected_up_front() {
    let result = LlmClient::new("", None, None);
    assert!(matches!(result, Err(MapLlmError::MissingApiKey)));

    let result = LlmClient::new("   ", None, None);
    assert!(matches!(result, Err(MapLlmError::MissingApiKey)));
}

#[test]
fn base_url_defaults_and_normalizes() {
    let client = LlmClient::new("sk-test", None, None).expect("default config");
    assert_eq!(client.base_url(), "https://api.openai.com/v1");
    assert_eq!(client.model(), "gpt-4-turbo");

    let client =
        LlmClient::new("sk-test", Some("proxy.internal:8080/v1/"), Some("gpt-4o-mini"))
            .expect("scheme-less base url");
    assert_eq!(client.base_url(), "https://proxy.internal:8080/v1");
    assert_eq!(client.model(), "gpt-4o-mini");
}

#[test]
fn error_statuses_match_the_failure_taxonomy() {
    let unsafe_code = llm_map_rs::safety::check_code("eval('x')").expect_err("violation");
    assert_eq!(MapLlmError::UnsafeCode(unsafe_code).status_code(), 403);

    let bad_ops = llm_map_rs::ops::parse_operations("not json").expect_err("bad payload");
    assert_eq!(MapLlmError::InvalidOperations(bad_ops).status_code(), 422);

    assert_eq!(MapLlmError::MissingApiKey.status_code(), 500);
    assert_eq!(
        MapLlmError::InvalidInput("radius".to_string()).status_code(),
        400
    );
}

#[test]
fn error_reply_serializes_to_the_wire_shape() {
    let reply = ErrorReply::new(MapLlmError::MissingApiKey.to_string());
    let body = serde_json::to_value(&reply).expect("serialize");
    assert_eq!(body, serde_json::json!({"error": "LLM provider API key is missing"}));
}

// Hits the real provider; needs OPENAI_API_KEY (a .env file is honored).
// Run with: cargo test --test provider_integration -- --ignored
#[tokio::test]
#[ignore]
async fn live_round_trip_produces_validated_operations() {
    dotenvy::dotenv().ok();
    let _ = env_logger::builder().is_test(true).try_init();

    let service = MapCommandService::from_env().expect("OPENAI_API_KEY must be set");
    let request = MapCommandRequest {
        prompt: "Draw a 10km circle around Chicago".to_string(),
        map_state: MapState {
            center: LngLat {
                lng: -98.5795,
                lat: 39.8283,
            },
            zoom: 3.0,
            bounds: MapBounds {
                sw: LngLat {
                    lng: -125.0,
                    lat: 24.0,
                },
                ne: LngLat {
                    lng: -66.9,
                    lat: 49.4,
                },
            },
        },
    };

    let (reply, operations, scene) = service
        .handle_to_scene(&request)
        .await
        .expect("live pipeline");

    assert!(!reply.code.is_empty());
    assert!(!reply.explanation.is_empty());
    assert!(!operations.is_empty());
    assert!(
        !scene.sources.is_empty() || scene.camera.is_some(),
        "expected the scene to change somehow"
    );
}
