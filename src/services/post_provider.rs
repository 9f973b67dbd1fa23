use std::sync::Arc;

use crate::database::models::FeedItem;
use crate::database::PostDao;
use crate::error::ApiError;

/// Read side of posts
#[derive(Clone)]
pub struct PostProvider {
    post_dao: Arc<dyn PostDao>,
}

impl PostProvider {
    pub fn new(post_dao: Arc<dyn PostDao>) -> Self {
        Self { post_dao }
    }

    /// Feed of `user_idx`; empty when they follow nobody
    pub async fn list_feed(&self, user_idx: i64) -> Result<Vec<FeedItem>, ApiError> {
        let feed = self.post_dao.select_feed(user_idx).await?;
        tracing::debug!(user_idx, posts = feed.len(), "Loaded feed");
        Ok(feed)
    }

    pub async fn user_exists(&self, user_idx: i64) -> Result<bool, ApiError> {
        Ok(self.post_dao.check_user_exist(user_idx).await?)
    }

    pub async fn post_exists(&self, post_idx: i64) -> Result<bool, ApiError> {
        Ok(self.post_dao.check_post_exist(post_idx).await?)
    }
}
