//! End-to-end integration tests
//!
//! Client → gateway over TCP → signed request to the mock Bedrock runtime →
//! normalized result back to the client.

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_bedrock::MockBedrock;
use recipe_core::TextVariant;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_e2e_recipe_from_ingredients() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_invoke(
            json!({
                "max_tokens": 200,
                "messages": [{
                    "role": "user",
                    "content": [{
                        "type": "text",
                        "text": "Suggest a recipe idea using these ingredients: chicken, lemon, thyme."
                    }]
                }]
            }),
            200,
            message_response("Roast lemon-thyme chicken."),
        )
        .await;

    let server = TestServer::start(config_for(&bedrock.url())).await;
    let result = server
        .ask(&json!({"ingredients": ["chicken", "lemon", "thyme"]}))
        .await;

    assert_eq!(result.body, "Roast lemon-thyme chicken.");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_e2e_legacy_completion() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_invoke(
            json!({
                "prompt": "\n\nHuman: What can I bake with oats?\n\nAssistant:",
                "stop_sequences": ["\n\nHuman:"]
            }),
            200,
            completion_response(" Oatmeal cookies."),
        )
        .await;

    let mut config = config_for(&bedrock.url());
    config.bedrock.text_variant = TextVariant::Legacy;
    let server = TestServer::start(config).await;

    let result = server
        .ask(&json!({"question": "What can I bake with oats?", "ingredients": ["oats"]}))
        .await;

    assert_eq!(result.body, " Oatmeal cookies.");
}

#[tokio::test]
async fn test_e2e_image_question() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_invoke(
            json!({
                "max_tokens": 1000,
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "image",
                            "source": {
                                "type": "base64",
                                "media_type": "image/jpeg",
                                "data": SAMPLE_IMAGE_BASE64
                            }
                        },
                        {"type": "text", "text": "What's in this image?"}
                    ]
                }]
            }),
            200,
            message_response("A single black pixel."),
        )
        .await;

    let server = TestServer::start(config_for(&bedrock.url())).await;
    let result = server
        .ask(&json!({"imageBase64": SAMPLE_IMAGE_BASE64}))
        .await;

    assert_eq!(result.body, "A single black pixel.");
}

#[tokio::test]
async fn test_e2e_signed_model_path() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_invoke(json!({}), 200, message_response("ok"))
        .await;

    let server = TestServer::start(config_for(&bedrock.url())).await;
    server.ask(&json!({"question": "Breakfast?"})).await;

    let received = bedrock.received().await;
    assert_eq!(received.len(), 1);

    let request = &received[0];
    assert_eq!(
        request.url.path(),
        "/model/anthropic.claude-3-sonnet-20240229-v1%3A0/invoke"
    );
    let authorization = request.headers["authorization"].to_str().unwrap();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(authorization.contains("/us-east-1/bedrock/aws4_request"));
}

#[tokio::test]
async fn test_e2e_provider_error() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_invoke(
            json!({}),
            429,
            error_response("Too many requests, please wait before trying again."),
        )
        .await;

    let server = TestServer::start(config_for(&bedrock.url())).await;
    let result = server.ask(&json!({"ingredients": ["rice"]})).await;

    assert!(result.body.is_empty());
    let error = result.error().unwrap();
    assert!(error.contains("429"));
    assert!(error.contains("Too many requests"));
}

#[tokio::test]
async fn test_e2e_non_json_body() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock.mock_raw(200, "<html>gateway</html>").await;

    let server = TestServer::start(config_for(&bedrock.url())).await;
    let result = server.ask(&json!({"ingredients": ["rice"]})).await;

    assert!(result
        .error()
        .unwrap()
        .starts_with("failed to parse provider response"));
}

#[tokio::test]
async fn test_e2e_request_timeout() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_delayed(message_response("late"), Duration::from_secs(5))
        .await;

    let mut config = config_for(&bedrock.url());
    config.bedrock.timeout = Duration::from_millis(200);
    let server = TestServer::start(config).await;

    let result = server.ask(&json!({"question": "Quick lunch?"})).await;
    assert!(result
        .error()
        .unwrap()
        .starts_with("no response received"));
}

#[tokio::test]
async fn test_e2e_health_and_metrics() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    bedrock
        .mock_invoke(json!({}), 200, message_response("Fried rice."))
        .await;

    let server = TestServer::start(config_for(&bedrock.url())).await;

    let health = server.get("/health").await;
    assert_eq!(health.status(), 200);

    let ready = server.get("/ready").await;
    assert_eq!(ready.status(), 200);

    server.ask(&json!({"ingredients": ["rice", "egg"]})).await;

    let metrics = server.get("/metrics").await.text().await.unwrap();
    assert!(metrics.contains(
        "recipe_ai_invocations_total{outcome=\"success\",variant=\"message_text\"} 1"
    ));
}

#[tokio::test]
async fn test_e2e_malformed_request() {
    init_tracing();
    let bedrock = MockBedrock::start().await;
    let server = TestServer::start(config_for(&bedrock.url())).await;

    let response = server
        .client
        .post(format!("{}/v1/ask-bedrock", server.base_url))
        .header("content-type", "application/json")
        .body("{\"ingredients\": [")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(bedrock.received().await.is_empty());
}
