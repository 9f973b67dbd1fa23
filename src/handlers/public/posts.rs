use axum::extract::State;
use serde::Deserialize;

use crate::database::models::FeedItem;
use crate::error::ApiError;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub user_idx: Option<i64>,
}

/// GET /posts?userIdx= - feed of everyone the user follows
pub async fn feed_get(State(state): State<AppState>, ApiQuery(query): ApiQuery<FeedQuery>) -> ApiResult<Vec<FeedItem>> {
    let user_idx = query.user_idx.ok_or(ApiError::UsersEmptyUserId)?;
    let feed = state.post_provider.list_feed(user_idx).await?;
    Ok(ApiResponse::success(feed))
}
