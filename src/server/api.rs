use crate::agent::FinanceAgent;
use crate::error::ChatError;
use crate::models::api::{ ChatRequest, ChatResponse, ErrorResponse, ReloadResponse };
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, rejection::JsonRejection },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<FinanceAgent>,
    pub prompts_path: Option<String>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::EmptyPrompt => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.user_message().to_string() })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/gemini", post(chat_handler))
        .route("/api/reload-prompts", get(reload_prompts_handler))
        .layer(cors)
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    // An unreadable body is treated as a missing prompt.
    let question = match payload {
        Ok(Json(req)) => req.prompt.unwrap_or_default(),
        Err(rejection) => {
            warn!("Rejected chat request body: {}", rejection);
            String::new()
        }
    };

    match state.agent.answer(&question).await {
        Ok(text) => {
            info!("Answered chat request ({} chars)", text.len());
            (StatusCode::OK, Json(ChatResponse::new(text))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn reload_prompts_handler(State(state): State<AppState>) -> impl IntoResponse {
    let Some(path) = state.prompts_path.as_deref() else {
        return (StatusCode::OK, Json(ReloadResponse {
            success: true,
            message: "Reload complete".into(),
            details: Some(vec!["Built-in prompt in use, nothing to reload".into()]),
        }));
    };

    match state.agent.reload_prompts_if_changed(path).await {
        Ok(changed) => {
            let detail = if changed { "Local reloaded" } else { "Local unchanged" };
            (StatusCode::OK, Json(ReloadResponse {
                success: true,
                message: "Reload complete".into(),
                details: Some(vec![detail.into()]),
            }))
        }
        Err(e) => (StatusCode::BAD_REQUEST, Json(ReloadResponse {
            success: false,
            message: "Reload errors".into(),
            details: Some(vec![format!("Local error: {}", e)]),
        })),
    }
}
