use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{verify_password, TokenService};
use crate::database::models::{Session, User, UserProfile};
use crate::database::{DatabaseError, UserDao};
use crate::error::ApiError;
use crate::types::Status;

/// Read side of accounts, including login
#[derive(Clone)]
pub struct UserProvider {
    user_dao: Arc<dyn UserDao>,
    tokens: TokenService,
}

impl UserProvider {
    pub fn new(user_dao: Arc<dyn UserDao>, tokens: TokenService) -> Self {
        Self { user_dao, tokens }
    }

    pub async fn user_profile(&self, user_idx: i64) -> Result<UserProfile, ApiError> {
        let user_info = self
            .user_dao
            .select_user_info(user_idx)
            .await?
            .ok_or(ApiError::UsersEmptyUserId)?;
        let user_posts = self.user_dao.select_user_posts(user_idx).await?;

        Ok(UserProfile { user_info, user_posts })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.user_dao.select_users().await?)
    }

    /// Zero or one users; email is unique
    pub async fn users_by_email(&self, email: &str) -> Result<Vec<User>, ApiError> {
        Ok(self.user_dao.select_user_by_email(email).await?.into_iter().collect())
    }

    pub async fn user_by_idx(&self, user_idx: i64) -> Result<User, ApiError> {
        self.user_dao
            .select_user_by_idx(user_idx)
            .await?
            .ok_or(ApiError::UsersNotFound)
    }

    pub async fn check_email(&self, email: &str) -> Result<bool, ApiError> {
        Ok(self.user_dao.check_email(email).await?)
    }

    /// Unknown email, inactive account and wrong password all answer FailedToLogin
    pub async fn log_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let Some(account) = self.user_dao.select_login_account(email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ApiError::FailedToLogin);
        };

        let status = Status::parse(&account.status).ok_or_else(|| {
            DatabaseError::QueryError(format!("unexpected user status '{}'", account.status))
        })?;
        if status != Status::Active {
            warn!(user_idx = account.user_idx, "Login attempt for inactive account");
            return Err(ApiError::FailedToLogin);
        }

        if !verify_password(password, &account.password) {
            warn!(user_idx = account.user_idx, "Login attempt with wrong password");
            return Err(ApiError::FailedToLogin);
        }

        let jwt = self.tokens.issue(account.user_idx)?;
        info!(user_idx = account.user_idx, "User logged in");
        Ok(Session { user_idx: account.user_idx, jwt })
    }
}
