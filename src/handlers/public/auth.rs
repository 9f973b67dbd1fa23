use axum::extract::State;
use serde::Deserialize;

use crate::database::models::Session;
use crate::error::ApiError;
use crate::handlers::validate;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct PostLoginReq {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "pwd")]
    pub password: String,
}

/// POST /auth/login - exchange email and password for an access token
pub async fn login_post(State(state): State<AppState>, ApiJson(req): ApiJson<PostLoginReq>) -> ApiResult<Session> {
    validate::email(&req.email)?;
    if req.password.is_empty() {
        return Err(ApiError::PostUsersInvalidPassword);
    }

    let session = state.user_provider.log_in(&req.email, &req.password).await?;
    Ok(ApiResponse::success(session))
}
