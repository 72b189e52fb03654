use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::account::models::ChangeUsernameCommand;
use crate::account::models::Username;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn change_username(
    State(state): State<AppState>,
    Json(body): Json<ChangeUsernameRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .account_service
        .change_username(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeUsernameRequest {
    username: String,
    new_username: String,
    password: String,
}

impl ChangeUsernameRequest {
    fn try_into_command(self) -> Result<ChangeUsernameCommand, AccountError> {
        Ok(ChangeUsernameCommand {
            username: self.username,
            new_username: Username::new(self.new_username)?,
            password: self.password,
        })
    }
}
