use std::sync::Arc;

use application::{AdviceService, ChatService, ServiceError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use domain::advice::AdviceResult;
use domain::catalog::AdviceCatalog;
use domain::chat::ChatTurn;
use domain::concern::{Concern, ConcernInfo, CONCERNS};
use domain::random::RandomSource;
use domain::selection::{is_acceptable_age, Selection, AGE_UNDISCLOSED};
use infrastructure::config::Config;
use infrastructure::gemini_client::GeminiClient;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const ADVICE_MISSING_FIELDS: &str = "必要な情報が不足しています";
pub const ADVICE_BAD_AGE: &str = "年齢は10〜100の範囲で入力してください";
pub const ADVICE_FAILED: &str = "アドバイスの生成に失敗しました";
pub const CHAT_MISSING_MESSAGE: &str = "メッセージが必要です";
pub const CHAT_FAILED: &str = "チャットの応答に失敗しました";
pub const MALFORMED_BODY: &str = "リクエストの形式が正しくありません";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub concerns: Vec<Concern>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub concerns: Vec<Concern>,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler failure carrying the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        let body = ErrorBody {
            error: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn service_failure(err: ServiceError, route: &str, bad_request: &'static str, failed: &'static str) -> ApiError {
    match err {
        ServiceError::Validation(reason) => {
            tracing::debug!(route, %reason, "rejected request");
            ApiError::BadRequest(bad_request)
        }
        ServiceError::Upstream(cause) => {
            tracing::error!(route, error = %format!("{:#}", cause), "upstream failure");
            ApiError::Internal(failed)
        }
    }
}

fn malformed(rejection: JsonRejection, route: &str) -> ApiError {
    tracing::debug!(route, error = %rejection.body_text(), "malformed request body");
    ApiError::BadRequest(MALFORMED_BODY)
}

/// Read-only state shared by all handlers.
pub struct AppState {
    pub advice: AdviceService,
    pub chat: ChatService,
}

impl AppState {
    pub fn new(config: &Config, catalog: AdviceCatalog, random: Arc<dyn RandomSource>) -> Self {
        let gemini = GeminiClient::from_config(config);
        Self {
            advice: AdviceService::new(Arc::new(catalog), Arc::clone(&random), gemini.clone()),
            chat: ChatService::new(random, gemini),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/concerns", get(concerns))
        .route("/api/advice", post(advice))
        .route("/api/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn concerns() -> Json<&'static [ConcernInfo]> {
    Json(&CONCERNS[..])
}

async fn advice(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<AdviceResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| malformed(rejection, "advice"))?;
    let age = request.age.ok_or(ApiError::BadRequest(ADVICE_MISSING_FIELDS))?;
    if request.concerns.is_empty() {
        return Err(ApiError::BadRequest(ADVICE_MISSING_FIELDS));
    }
    if !is_acceptable_age(age) {
        return Err(ApiError::BadRequest(ADVICE_BAD_AGE));
    }

    let selection = Selection::new(request.concerns, age);
    tracing::info!(
        concerns = selection.len(),
        age,
        llm = state.advice.uses_llm_for(&selection),
        "advice requested"
    );
    let result = state
        .advice
        .generate(&selection)
        .await
        .map_err(|err| service_failure(err, "advice", ADVICE_MISSING_FIELDS, ADVICE_FAILED))?;
    Ok(Json(result))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| malformed(rejection, "chat"))?;
    let message = request.message.unwrap_or_default();
    let age = if is_acceptable_age(request.age) {
        request.age
    } else {
        AGE_UNDISCLOSED
    };
    let selection = Selection::new(request.concerns, age);

    let response = state
        .chat
        .reply(&message, &selection, &request.history)
        .await
        .map_err(|err| service_failure(err, "chat", CHAT_MISSING_MESSAGE, CHAT_FAILED))?;
    Ok(Json(ChatResponse { response }))
}
