use std::sync::Arc;

use axum::{
    extract::{ Request, State },
    http::StatusCode,
    middleware::{ self, Next },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use chrono::Utc;
use log::{ error, info };
use serde::{ Deserialize, Serialize };

use crate::config::prompt;
use crate::llm::ChatClient;
use crate::server::{ cors, recover };

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatClient>,
    pub model: String,
}

#[derive(Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ChatSuccess {
    message: String,
    success: bool,
    model: String,
}

#[derive(Serialize)]
struct ChatFailure {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct ValidationError {
    error: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
struct InfoResponse {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    model: String,
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        .layer(middleware::from_fn(recover::recover_json_body))
        .layer(cors::cors_layer())
        .layer(middleware::from_fn(cors::origin_guard))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    info!("{} {}", req.method(), req.uri());
    next.run(req).await
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> Response {
    let message = match payload.message.filter(|m| !m.is_empty()) {
        Some(m) => m,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidationError { error: "Message manquant" }),
            ).into_response();
        }
    };

    info!("User input: {}", message);
    let prompt = prompt::chat_prompt(&message);

    match state.chat.complete(&prompt).await {
        Ok(completion) => {
            info!("Gemini output: {}", completion.response);
            (
                StatusCode::OK,
                Json(ChatSuccess {
                    message: completion.response,
                    success: true,
                    model: state.model.clone(),
                }),
            ).into_response()
        }
        Err(e) => {
            error!("Erreur Gemini: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatFailure {
                    success: false,
                    error: e.to_string(),
                }),
            ).into_response()
        }
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Botadvisor Gemini actif",
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Botadvisor Gemini",
        version: env!("CARGO_PKG_VERSION"),
        description: "Assistant IA spécialisé dans les investissements et conseils financiers",
        model: state.model.clone(),
        status: "actif",
    })
}
