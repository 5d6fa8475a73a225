use axum::http::StatusCode;
use domain::advice::{AdviceResult, CONCERN_SEPARATOR};
use domain::random::FixedIndex;
use infrastructure::config::Config;
use presentation::api::{ADVICE_FAILED, ADVICE_MISSING_FIELDS, MALFORMED_BODY};
use serde_json::json;
use tests::{app, config_with_upstream, post_json, post_raw, FakeGemini, TEST_API_KEY};

const FIELDS: [&str; 5] = ["analysis", "treatment", "depacos", "drugstore", "lifestyle"];

fn advice_json() -> String {
    serde_json::to_string(&AdviceResult {
        analysis: "乾燥による小じわが見られます。".into(),
        treatment: "水光注射がおすすめです。".into(),
        depacos: "クレ・ド・ポー ボーテ".into(),
        drugstore: "キュレル".into(),
        lifestyle: "睡眠を十分に。".into(),
    })
    .unwrap()
}

#[tokio::test]
async fn static_advice_fills_every_field_for_each_concern() {
    for concern in ["dryness", "spots", "acne", "pores", "wrinkles", "sagging", "sensitive"] {
        let (status, body) = post_json(
            app(&Config::default(), FixedIndex(1)),
            "/api/advice",
            json!({"concerns": [concern], "age": 35}),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{concern}");
        for field in FIELDS {
            let text = body[field].as_str().unwrap();
            assert!(!text.trim().is_empty(), "{concern}.{field} is empty");
        }
    }
}

#[tokio::test]
async fn separator_count_matches_concern_count() {
    let (status, body) = post_json(
        app(&Config::default(), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["acne", "pores", "sagging"], "age": 52}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"].as_str().unwrap().matches(CONCERN_SEPARATOR).count(), 2);
    assert_eq!(body["treatment"].as_str().unwrap().matches(CONCERN_SEPARATOR).count(), 2);
}

#[tokio::test]
async fn duplicate_concerns_act_as_one() {
    let once = post_json(
        app(&Config::default(), FixedIndex(2)),
        "/api/advice",
        json!({"concerns": ["dryness"], "age": 40}),
    )
    .await;
    let twice = post_json(
        app(&Config::default(), FixedIndex(2)),
        "/api/advice",
        json!({"concerns": ["dryness", "dryness"], "age": 40}),
    )
    .await;
    assert_eq!(once, twice);
    assert!(!twice.1["analysis"].as_str().unwrap().contains(CONCERN_SEPARATOR));
}

#[tokio::test]
async fn empty_concerns_is_bad_request() {
    let (status, body) = post_json(
        app(&Config::default(), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": [], "age": 30}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], ADVICE_MISSING_FIELDS);
}

#[tokio::test]
async fn missing_age_is_bad_request() {
    let (status, body) = post_json(
        app(&Config::default(), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["acne"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], ADVICE_MISSING_FIELDS);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (status, body) = post_raw(
        app(&Config::default(), FixedIndex(0)),
        "/api/advice",
        "{not json".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], MALFORMED_BODY);
}

#[tokio::test]
async fn undisclosed_age_is_served_statically() {
    let (status, body) = post_json(
        app(&Config::default(), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["wrinkles", "spots"], "age": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["analysis"].as_str().unwrap().contains("0歳"));
}

#[tokio::test]
async fn without_api_key_no_upstream_call_is_made() {
    let upstream = FakeGemini::replying_text(&advice_json()).await;
    let config = Config {
        gemini_base_url: upstream.base_url.clone(),
        ..Config::default()
    };
    let (status, _) = post_json(
        app(&config, FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["acne"], "age": 22}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn gemini_reply_with_embedded_json_is_parsed() {
    let reply = format!("承知しました。\n```json\n{}\n```", advice_json());
    let upstream = FakeGemini::replying_text(&reply).await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["dryness", "wrinkles"], "age": 45}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["treatment"], "水光注射がおすすめです。");
    assert_eq!(body["drugstore"], "キュレル");

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1beta/models/gemini-1.5-flash:generateContent");
    assert_eq!(requests[0].query.as_deref(), Some(format!("key={}", TEST_API_KEY).as_str()));
    let prompt = requests[0].body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("45歳"));
    assert!(prompt.contains("乾燥、しわ"));
}

#[tokio::test]
async fn gemini_reply_without_json_is_server_error() {
    let upstream = FakeGemini::replying_text("申し訳ありませんが回答できません。").await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["acne"], "age": 19}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], ADVICE_FAILED);
}

#[tokio::test]
async fn gemini_error_status_is_server_error() {
    let upstream = FakeGemini::start(StatusCode::FORBIDDEN, json!({"error": {"message": "API key not valid"}})).await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["pores"], "age": 27}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], ADVICE_FAILED);
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn unreachable_gemini_is_server_error() {
    let (status, _) = post_json(
        app(&config_with_upstream("http://127.0.0.1:1"), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["sensitive"], "age": 60}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn key_with_undisclosed_age_skips_gemini() {
    let upstream = FakeGemini::replying_text(&advice_json()).await;
    let (status, body) = post_json(
        app(&config_with_upstream(&upstream.base_url), FixedIndex(0)),
        "/api/advice",
        json!({"concerns": ["sagging"], "age": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["drugstore"], "キュレル");
    assert!(upstream.requests().is_empty());
}
