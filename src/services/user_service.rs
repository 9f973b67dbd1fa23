use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{hash_password, TokenService};
use crate::database::models::{NewUser, Session};
use crate::database::{DatabaseError, UserDao};
use crate::error::ApiError;
use crate::services::user_provider::UserProvider;

/// Sign-up payload with the plaintext password
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub nick_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub password: String,
}

/// Write side of accounts
#[derive(Clone)]
pub struct UserService {
    user_dao: Arc<dyn UserDao>,
    user_provider: UserProvider,
    tokens: TokenService,
}

impl UserService {
    pub fn new(user_dao: Arc<dyn UserDao>, user_provider: UserProvider, tokens: TokenService) -> Self {
        Self {
            user_dao,
            user_provider,
            tokens,
        }
    }

    /// Create the account and log it in
    pub async fn register_user(&self, registration: Registration) -> Result<Session, ApiError> {
        if self.user_provider.check_email(&registration.email).await? {
            return Err(ApiError::PostUsersExistsEmail);
        }

        let password = hash_password(&registration.password).map_err(|e| {
            tracing::error!("{}", e);
            ApiError::PasswordEncryptionError
        })?;

        let new_user = NewUser {
            name: registration.name,
            nick_name: registration.nick_name,
            phone: registration.phone,
            email: registration.email,
            password,
        };

        let user_idx = match self.user_dao.insert_user(&new_user).await {
            Ok(user_idx) => user_idx,
            // Lost a race with a concurrent sign-up for the same email
            Err(DatabaseError::UniqueViolation(constraint)) => {
                warn!(constraint = %constraint, "Duplicate email on insert");
                return Err(ApiError::PostUsersExistsEmail);
            }
            Err(e) => return Err(e.into()),
        };

        let jwt = self.tokens.issue(user_idx)?;
        info!(user_idx, "Registered user");
        Ok(Session { user_idx, jwt })
    }

    /// Returns the number of rows changed; callers treat 0 as failure
    pub async fn update_user_nickname(&self, user_idx: i64, nick_name: &str) -> Result<u64, ApiError> {
        if !self.user_dao.check_user_exist(user_idx).await? {
            return Err(ApiError::UsersEmptyUserId);
        }

        let rows = self.user_dao.update_nickname(user_idx, nick_name).await?;
        info!(user_idx, rows, "Updated nickname");
        Ok(rows)
    }
}
