use std::sync::Arc;

use tracing::{info, warn};

use crate::database::PostDao;
use crate::error::ApiError;
use crate::services::post_provider::PostProvider;
use crate::types::{char_len, MAX_POST_CONTENT_CHARS};

/// Write side of posts. Every operation validates, checks existence, then mutates.
#[derive(Clone)]
pub struct PostService {
    post_dao: Arc<dyn PostDao>,
    post_provider: PostProvider,
}

impl PostService {
    pub fn new(post_dao: Arc<dyn PostDao>, post_provider: PostProvider) -> Self {
        Self { post_dao, post_provider }
    }

    /// Returns the new post id
    pub async fn create_post(&self, user_idx: i64, content: &str, img_urls: &[String]) -> Result<i64, ApiError> {
        validate_content(content)?;
        if img_urls.is_empty() {
            return Err(ApiError::PostPostsEmptyImgUrl);
        }
        if !self.post_provider.user_exists(user_idx).await? {
            return Err(ApiError::UsersEmptyUserId);
        }

        let post_idx = self.post_dao.insert_post(user_idx, content, img_urls).await?;
        info!(user_idx, post_idx, images = img_urls.len(), "Created post");
        Ok(post_idx)
    }

    pub async fn modify_post(&self, user_idx: i64, post_idx: i64, content: &str) -> Result<(), ApiError> {
        validate_content(content)?;
        if !self.post_provider.user_exists(user_idx).await? {
            return Err(ApiError::UsersEmptyUserId);
        }
        if !self.post_provider.post_exists(post_idx).await? {
            return Err(ApiError::PostsEmptyPostId);
        }

        let rows = self.post_dao.update_post(post_idx, content).await?;
        if rows != 1 {
            warn!(post_idx, rows, "Post update affected an unexpected number of rows");
            return Err(ApiError::ModifyFailPost);
        }
        info!(user_idx, post_idx, "Modified post");
        Ok(())
    }

    /// Flip the post to INACTIVE; the row stays for historical joins
    pub async fn delete_post_soft(&self, post_idx: i64) -> Result<(), ApiError> {
        if !self.post_provider.post_exists(post_idx).await? {
            return Err(ApiError::PostsEmptyPostId);
        }

        if self.post_dao.soft_delete_post(post_idx).await? == 0 {
            return Err(ApiError::DeleteFailPost);
        }
        info!(post_idx, "Soft-deleted post");
        Ok(())
    }

    /// Remove the post row and its images for good
    pub async fn delete_post_hard(&self, post_idx: i64) -> Result<(), ApiError> {
        if !self.post_provider.post_exists(post_idx).await? {
            return Err(ApiError::PostsEmptyPostId);
        }

        if self.post_dao.hard_delete_post(post_idx).await? == 0 {
            return Err(ApiError::DeleteFailPost);
        }
        info!(post_idx, "Hard-deleted post");
        Ok(())
    }
}

/// Post bodies are limited to MAX_POST_CONTENT_CHARS characters
pub fn validate_content(content: &str) -> Result<(), ApiError> {
    if char_len(content) > MAX_POST_CONTENT_CHARS {
        return Err(ApiError::PostPostsInvalidContents);
    }
    Ok(())
}
