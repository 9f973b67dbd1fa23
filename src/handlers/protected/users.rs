use axum::extract::State;
use serde::Deserialize;

use super::NICKNAME_UPDATED;
use crate::error::ApiError;
use crate::handlers::validate;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchUserReq {
    #[serde(default)]
    pub nick_name: String,
}

/// PATCH /users/:userIdx - change the caller's own nickname
pub async fn nickname_patch(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_idx): ApiPath<i64>,
    ApiJson(req): ApiJson<PatchUserReq>,
) -> ApiResult<&'static str> {
    auth.ensure_owner(user_idx)?;
    validate::nickname(&req.nick_name)?;

    let rows = state.user_service.update_user_nickname(user_idx, &req.nick_name).await?;
    if rows == 0 {
        return Err(ApiError::ModifyFailUsername);
    }
    Ok(ApiResponse::success(NICKNAME_UPDATED))
}
