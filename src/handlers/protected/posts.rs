use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::{POST_DELETED, POST_UPDATED};
use crate::handlers::validate;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostImgUrlReq {
    #[serde(default)]
    pub img_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPostsReq {
    pub user_idx: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub post_img_urls: Vec<PostImgUrlReq>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPostsRes {
    pub post_idx: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPostsReq {
    pub user_idx: i64,
    #[serde(default)]
    pub content: String,
}

/// POST /posts - publish a post with at least one image
pub async fn post_create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<PostPostsReq>,
) -> ApiResult<PostPostsRes> {
    auth.ensure_owner(req.user_idx)?;

    let img_urls: Vec<String> = req.post_img_urls.into_iter().map(|img| img.img_url).collect();
    validate::post_content(&req.content)?;
    validate::post_images(&img_urls)?;

    let post_idx = state.post_service.create_post(req.user_idx, &req.content, &img_urls).await?;
    Ok(ApiResponse::success(PostPostsRes { post_idx }))
}

/// PATCH /posts/:postIdx - replace the post text
pub async fn post_modify(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(post_idx): ApiPath<i64>,
    ApiJson(req): ApiJson<PatchPostsReq>,
) -> ApiResult<&'static str> {
    auth.ensure_owner(req.user_idx)?;
    validate::post_content(&req.content)?;

    state.post_service.modify_post(req.user_idx, post_idx, &req.content).await?;
    Ok(ApiResponse::success(POST_UPDATED))
}

/// PATCH /posts/:postIdx/status - mark the post INACTIVE
pub async fn post_delete_soft(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(post_idx): ApiPath<i64>,
) -> ApiResult<&'static str> {
    tracing::debug!(user_idx = auth.user_idx, post_idx, "Soft delete requested");
    state.post_service.delete_post_soft(post_idx).await?;
    Ok(ApiResponse::success(POST_DELETED))
}

/// DELETE /posts/:postIdx - remove the post and its images
pub async fn post_delete_hard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(post_idx): ApiPath<i64>,
) -> ApiResult<&'static str> {
    tracing::debug!(user_idx = auth.user_idx, post_idx, "Hard delete requested");
    state.post_service.delete_post_hard(post_idx).await?;
    Ok(ApiResponse::success(POST_DELETED))
}
