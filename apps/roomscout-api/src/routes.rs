use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;
use roomscout_service::{ChatRequest, ChatResponse, HistoryResponse, ServiceError};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/chat", post(chat))
		.route("/chat/history/{session_token}", get(history))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state.service.chat(payload).await?;
	Ok(Json(response))
}

async fn history(
	State(state): State<AppState>,
	Path(session_token): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
	let response = state.service.history(&session_token).await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::new(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				Some(vec!["message".to_string()]),
			),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::Provider { .. } | ServiceError::Storage { .. } => {
				tracing::error!(error = %err, "Chat request failed.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal",
					"Failed to process the request.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
