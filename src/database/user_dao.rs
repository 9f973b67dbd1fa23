use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{LoginAccount, NewUser, User, UserInfo, UserPostThumbnail};

/// Persistence contract for accounts
#[async_trait]
pub trait UserDao: Send + Sync {
    /// Profile header of an active user
    async fn select_user_info(&self, user_idx: i64) -> Result<Option<UserInfo>, DatabaseError>;

    /// One thumbnail per active post, oldest post first
    async fn select_user_posts(&self, user_idx: i64) -> Result<Vec<UserPostThumbnail>, DatabaseError>;

    async fn select_users(&self) -> Result<Vec<User>, DatabaseError>;

    async fn select_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn select_user_by_idx(&self, user_idx: i64) -> Result<Option<User>, DatabaseError>;

    async fn select_login_account(&self, email: &str) -> Result<Option<LoginAccount>, DatabaseError>;

    async fn insert_user(&self, new_user: &NewUser) -> Result<i64, DatabaseError>;

    async fn check_email(&self, email: &str) -> Result<bool, DatabaseError>;

    async fn check_user_exist(&self, user_idx: i64) -> Result<bool, DatabaseError>;

    async fn update_nickname(&self, user_idx: i64, nick_name: &str) -> Result<u64, DatabaseError>;
}

pub struct PgUserDao {
    pool: PgPool,
}

impl PgUserDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER_INFO: &str = r#"
    SELECT u.name,
           u.nick_name,
           u.profile_img_url,
           u.website,
           u.introduction,
           COALESCE(p.post_count, 0) AS post_count,
           COALESCE(f1.follower_count, 0) AS follower_count,
           COALESCE(f2.following_count, 0) AS following_count
    FROM users u
        LEFT JOIN (SELECT user_idx, COUNT(post_idx) AS post_count
                   FROM posts WHERE status = 'ACTIVE' GROUP BY user_idx) p ON p.user_idx = u.user_idx
        LEFT JOIN (SELECT followee_idx, COUNT(follow_idx) AS follower_count
                   FROM follows WHERE status = 'ACTIVE' GROUP BY followee_idx) f1 ON f1.followee_idx = u.user_idx
        LEFT JOIN (SELECT follower_idx, COUNT(follow_idx) AS following_count
                   FROM follows WHERE status = 'ACTIVE' GROUP BY follower_idx) f2 ON f2.follower_idx = u.user_idx
    WHERE u.user_idx = $1 AND u.status = 'ACTIVE'
"#;

const SELECT_USER_POSTS: &str = r#"
    SELECT DISTINCT ON (p.post_idx) p.post_idx, pi.img_url AS post_img_url
    FROM posts p
        JOIN post_img_urls pi ON pi.post_idx = p.post_idx AND pi.status = 'ACTIVE'
    WHERE p.status = 'ACTIVE' AND p.user_idx = $1
    ORDER BY p.post_idx, pi.post_img_url_idx
"#;

#[async_trait]
impl UserDao for PgUserDao {
    async fn select_user_info(&self, user_idx: i64) -> Result<Option<UserInfo>, DatabaseError> {
        let info = sqlx::query_as::<_, UserInfo>(SELECT_USER_INFO)
            .bind(user_idx)
            .fetch_optional(&self.pool)
            .await?;

        Ok(info)
    }

    async fn select_user_posts(&self, user_idx: i64) -> Result<Vec<UserPostThumbnail>, DatabaseError> {
        let posts = sqlx::query_as::<_, UserPostThumbnail>(SELECT_USER_POSTS)
            .bind(user_idx)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn select_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_idx, name, nick_name, email FROM users ORDER BY user_idx",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn select_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_idx, name, nick_name, email FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn select_user_by_idx(&self, user_idx: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_idx, name, nick_name, email FROM users WHERE user_idx = $1",
        )
        .bind(user_idx)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn select_login_account(&self, email: &str) -> Result<Option<LoginAccount>, DatabaseError> {
        let account = sqlx::query_as::<_, LoginAccount>(
            "SELECT user_idx, password, status FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert_user(&self, new_user: &NewUser) -> Result<i64, DatabaseError> {
        let (user_idx,): (i64,) = sqlx::query_as(
            "INSERT INTO users (name, nick_name, phone, email, password)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING user_idx",
        )
        .bind(&new_user.name)
        .bind(&new_user.nick_name)
        .bind(&new_user.phone)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;

        Ok(user_idx)
    }

    async fn check_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn check_user_exist(&self, user_idx: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE user_idx = $1)")
            .bind(user_idx)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn update_nickname(&self, user_idx: i64, nick_name: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE users SET nick_name = $1, updated_at = now() WHERE user_idx = $2")
            .bind(nick_name)
            .bind(user_idx)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
