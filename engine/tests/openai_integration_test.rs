//! Integration tests for the OpenAI-compatible provider
//!
//! Validates request shape, content extraction and error mapping against a
//! wiremock server.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studycoder_engine::config::LlmConfig;
use studycoder_engine::llm::openai::OpenAIProvider;
use studycoder_engine::llm::{GeneratorError, TemplateVars, TextGenerator};

fn test_config(base_url: String) -> LlmConfig {
    LlmConfig {
        base_url,
        model: "qwen3-32b".to_string(),
        temperature: 0.3,
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn generate_extracts_completion_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("theory")))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(test_config(server.uri()), "test-key");
    let out = provider
        .generate("Classify the query.", "What is Rust?", &TemplateVars::new())
        .await
        .expect("generate");

    assert_eq!(out, "theory");
}

#[tokio::test]
async fn generate_sends_model_temperature_and_rendered_system_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(test_config(server.uri()), "test-key");
    let mut vars = TemplateVars::new();
    vars.insert("context".to_string(), "earlier turns".to_string());

    provider
        .generate("Context: {context}.", "the query", &vars)
        .await
        .expect("generate");

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("request body");
    assert_eq!(body["model"], "qwen3-32b");
    assert!((body["temperature"].as_f64().expect("temperature") - 0.3).abs() < 1e-9);

    let messages = body["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "Context: earlier turns.");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "the query");
}

#[tokio::test]
async fn auth_failures_map_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(test_config(server.uri()), "wrong-key");
    let err = provider
        .generate("sys", "query", &TemplateVars::new())
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeneratorError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn throttling_maps_to_rate_limit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(test_config(server.uri()), "test-key");
    let err = provider
        .generate("sys", "query", &TemplateVars::new())
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeneratorError::RateLimitExceeded));
}

#[tokio::test]
async fn server_errors_map_to_backend_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(test_config(server.uri()), "test-key");
    let err = provider
        .generate("sys", "query", &TemplateVars::new())
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeneratorError::BackendUnavailable(_)));
}

#[tokio::test]
async fn malformed_payload_maps_to_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(test_config(server.uri()), "test-key");
    let err = provider
        .generate("sys", "query", &TemplateVars::new())
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeneratorError::ParseError(_)));
}
