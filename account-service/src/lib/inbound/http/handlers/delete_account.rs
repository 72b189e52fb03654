use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::sign_in::SignInRequest;
use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_account(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .account_service
        .delete_account(&body.username, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
