use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let token = state
        .account_service
        .sign_in(&body.username, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %body.username, error = %e, "Sign in rejected");
            ApiError::from(e)
        })?;

    tracing::info!(username = %body.username, "Signed in");

    Ok(ApiSuccess::new(StatusCode::OK, TokenData { token }))
}

/// Credentials as submitted; also the body of account deletion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub token: String,
}
