use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{Session, User, UserProfile};
use crate::handlers::validate;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::services::Registration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUserReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nick_name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub email: Option<String>,
}

/// POST /users - sign up and receive an access token
pub async fn user_register(State(state): State<AppState>, ApiJson(req): ApiJson<PostUserReq>) -> ApiResult<Session> {
    let phone = req.phone.filter(|p| !p.trim().is_empty());
    validate::email(&req.email)?;
    validate::nickname(&req.nick_name)?;
    validate::password(&req.password)?;
    validate::name(&req.name)?;
    validate::phone(phone.as_deref())?;

    let session = state
        .user_service
        .register_user(Registration {
            name: req.name,
            nick_name: req.nick_name,
            phone,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::success(session))
}

/// GET /users[?email=] - every user, or the one registered with `email`
pub async fn users_get(State(state): State<AppState>, ApiQuery(query): ApiQuery<UsersQuery>) -> ApiResult<Vec<User>> {
    let users = match query.email {
        Some(email) => state.user_provider.users_by_email(&email).await?,
        None => state.user_provider.list_users().await?,
    };
    Ok(ApiResponse::success(users))
}

/// GET /users/:userIdx - profile header plus post thumbnails
pub async fn user_profile_get(State(state): State<AppState>, ApiPath(user_idx): ApiPath<i64>) -> ApiResult<UserProfile> {
    let profile = state.user_provider.user_profile(user_idx).await?;
    Ok(ApiResponse::success(profile))
}
