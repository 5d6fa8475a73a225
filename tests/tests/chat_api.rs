use axum::http::StatusCode;
use domain::random::{FixedIndex, SequenceIndex};
use infrastructure::config::Config;
use presentation::api::{CHAT_FAILED, CHAT_MISSING_MESSAGE};
use serde_json::json;
use tests::{app, config_with_upstream, post_json, FakeGemini};

#[tokio::test]
async fn empty_message_is_bad_request() {
    let (status, body) = post_json(
        app(&Config::default(), FixedIndex(0)),
        "/api/chat",
        json!({"message": "", "concerns": ["acne"], "age": 30, "history": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], CHAT_MISSING_MESSAGE);
}

#[tokio::test]
async fn canned_replies_without_api_key() {
    let app = app(&Config::default(), SequenceIndex::new(vec![0, 1, 2]));
    let mut seen = Vec::new();
    for _ in 0..3 {
        let (status, body) = post_json(
            app.clone(),
            "/api/chat",
            json!({"message": "化粧水のおすすめは？", "concerns": ["dryness"], "age": 26, "history": []}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        seen.push(body["response"].as_str().unwrap().to_string());
    }
    assert!(seen[0].contains("26歳"));
    seen.dedup();
    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn without_api_key_no_upstream_call_is_made() {
    let upstream = FakeGemini::replying_text("unused").await;
    let config = Config {
        gemini_base_url: upstream.base_url.clone(),
        ..Config::default()
    };
    let (status, _) = post_json(
        app(&config, FixedIndex(0)),
        "/api/chat",
        json!({"message": "こんにちは", "concerns": [], "age": 0, "history": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn history_is_replayed_to_gemini() {
    let upstream = FakeGemini::replying_text("セラミド配合の化粧水がおすすめです。").await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/chat",
        json!({
            "message": "化粧水は何を使えばいい？",
            "concerns": ["dryness", "sensitive"],
            "age": 33,
            "history": [
                {"role": "assistant", "content": "こんにちは！"},
                {"role": "user", "content": "冬になると粉をふきます"},
                {"role": "assistant", "content": "保湿を重ねましょう"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "セラミド配合の化粧水がおすすめです。");

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let contents = requests[0].body["contents"].as_array().unwrap();
    let roles: Vec<&str> = contents.iter().map(|c| c["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["user", "model", "model", "user", "model", "user"]);
    let system = contents[0]["parts"][0]["text"].as_str().unwrap();
    assert!(system.contains("33歳"));
    assert!(system.contains("乾燥、敏感肌"));
    assert_eq!(contents[5]["parts"][0]["text"], "化粧水は何を使えばいい？");
    assert_eq!(requests[0].body["generationConfig"]["maxOutputTokens"], 512);
}

#[tokio::test]
async fn empty_gemini_reply_is_server_error() {
    let upstream = FakeGemini::start(StatusCode::OK, json!({"candidates": []})).await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/chat",
        json!({"message": "こんにちは", "concerns": ["acne"], "age": 20, "history": []}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], CHAT_FAILED);
}

#[tokio::test]
async fn unknown_history_role_is_bad_request() {
    let (status, _) = post_json(
        app(&Config::default(), FixedIndex(0)),
        "/api/chat",
        json!({"message": "hi", "history": [{"role": "system", "content": "x"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gemini_error_status_is_server_error() {
    let upstream = FakeGemini::start(StatusCode::FORBIDDEN, json!({"error": {"message": "API key not valid"}})).await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/chat",
        json!({"message": "日焼け止めは？", "concerns": ["spots"], "age": 41, "history": []}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], CHAT_FAILED);
    assert!(!body.to_string().contains("API key not valid"));
    assert_eq!(upstream.requests().len(), 1);
}
