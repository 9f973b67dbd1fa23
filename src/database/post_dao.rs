use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{FeedItem, FeedRow, PostImage};
use crate::types::Status;

/// Persistence contract for posts and their images. Implementations run queries only;
/// callers validate input and check existence first.
#[async_trait]
pub trait PostDao: Send + Sync {
    /// Active posts of everyone `user_idx` follows, newest first, images attached
    async fn select_feed(&self, user_idx: i64) -> Result<Vec<FeedItem>, DatabaseError>;

    async fn select_post_images(&self, post_idx: i64) -> Result<Vec<PostImage>, DatabaseError>;

    /// Insert a post and its images; returns the generated post id
    async fn insert_post(&self, user_idx: i64, content: &str, img_urls: &[String]) -> Result<i64, DatabaseError>;

    async fn update_post(&self, post_idx: i64, content: &str) -> Result<u64, DatabaseError>;

    async fn soft_delete_post(&self, post_idx: i64) -> Result<u64, DatabaseError>;

    async fn hard_delete_post(&self, post_idx: i64) -> Result<u64, DatabaseError>;

    async fn check_user_exist(&self, user_idx: i64) -> Result<bool, DatabaseError>;

    async fn check_post_exist(&self, post_idx: i64) -> Result<bool, DatabaseError>;
}

pub struct PgPostDao {
    pool: PgPool,
}

impl PgPostDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_FEED: &str = r#"
    SELECT p.post_idx,
           u.user_idx,
           u.nick_name,
           u.profile_img_url,
           p.content,
           COALESCE(plc.post_like_count, 0) AS post_like_count,
           COALESCE(c.comment_count, 0) AS comment_count,
           p.updated_at,
           EXISTS (
               SELECT 1 FROM post_likes pl
               WHERE pl.post_idx = p.post_idx AND pl.user_idx = f.follower_idx AND pl.status = 'ACTIVE'
           ) AS like_or_not
    FROM posts p
        JOIN users u ON u.user_idx = p.user_idx
        JOIN follows f ON f.followee_idx = p.user_idx AND f.status = 'ACTIVE'
        LEFT JOIN (SELECT post_idx, COUNT(post_like_idx) AS post_like_count
                   FROM post_likes WHERE status = 'ACTIVE' GROUP BY post_idx) plc ON plc.post_idx = p.post_idx
        LEFT JOIN (SELECT post_idx, COUNT(comment_idx) AS comment_count
                   FROM comments WHERE status = 'ACTIVE' GROUP BY post_idx) c ON c.post_idx = p.post_idx
    WHERE f.follower_idx = $1 AND p.status = 'ACTIVE'
    ORDER BY p.updated_at DESC, p.post_idx DESC
"#;

#[async_trait]
impl PostDao for PgPostDao {
    async fn select_feed(&self, user_idx: i64) -> Result<Vec<FeedItem>, DatabaseError> {
        let rows = sqlx::query_as::<_, FeedRow>(SELECT_FEED)
            .bind(user_idx)
            .fetch_all(&self.pool)
            .await?;

        let images = try_join_all(rows.iter().map(|row| self.select_post_images(row.post_idx))).await?;

        let now = Utc::now();
        Ok(rows
            .into_iter()
            .zip(images)
            .map(|(row, imgs)| FeedItem::from_row(row, imgs, now))
            .collect())
    }

    async fn select_post_images(&self, post_idx: i64) -> Result<Vec<PostImage>, DatabaseError> {
        let images = sqlx::query_as::<_, PostImage>(
            "SELECT pi.post_img_url_idx, pi.img_url
             FROM post_img_urls pi
                 JOIN posts p ON p.post_idx = pi.post_idx
             WHERE pi.status = 'ACTIVE' AND p.status = 'ACTIVE' AND p.post_idx = $1
             ORDER BY pi.post_img_url_idx",
        )
        .bind(post_idx)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn insert_post(&self, user_idx: i64, content: &str, img_urls: &[String]) -> Result<i64, DatabaseError> {
        // Post and images commit together; a failed image insert leaves no orphan post
        let mut tx = self.pool.begin().await?;

        let (post_idx,): (i64,) = sqlx::query_as(
            "INSERT INTO posts (user_idx, content) VALUES ($1, $2) RETURNING post_idx",
        )
        .bind(user_idx)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        for img_url in img_urls {
            sqlx::query("INSERT INTO post_img_urls (post_idx, img_url) VALUES ($1, $2)")
                .bind(post_idx)
                .bind(img_url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(post_idx)
    }

    async fn update_post(&self, post_idx: i64, content: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE posts SET content = $1, updated_at = now() WHERE post_idx = $2")
            .bind(content)
            .bind(post_idx)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn soft_delete_post(&self, post_idx: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE posts SET status = $1, updated_at = now() WHERE post_idx = $2")
            .bind(Status::Inactive.as_str())
            .bind(post_idx)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn hard_delete_post(&self, post_idx: i64) -> Result<u64, DatabaseError> {
        // post_img_urls, post_likes and comments go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM posts WHERE post_idx = $1")
            .bind(post_idx)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn check_user_exist(&self, user_idx: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE user_idx = $1)")
            .bind(user_idx)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn check_post_exist(&self, post_idx: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM posts WHERE post_idx = $1)")
            .bind(post_idx)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
