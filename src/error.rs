// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

/// Every failure a request can end in. Each variant has a stable numeric status that
/// clients switch on, independent of the HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    // 2000: request shape
    #[error("invalid request: {0}")]
    RequestError(String),

    // 2001-2004: token
    #[error("missing access token")]
    EmptyJwt,
    #[error("invalid access token")]
    InvalidJwt,
    #[error("token does not belong to this user")]
    InvalidUserJwt,
    #[error("access token has expired")]
    ExpiredJwt,

    // 2010-2019: users
    #[error("user does not exist")]
    UsersEmptyUserId,
    #[error("email is required")]
    PostUsersEmptyEmail,
    #[error("email is malformed")]
    PostUsersInvalidEmail,
    #[error("email is already registered")]
    PostUsersExistsEmail,
    #[error("nickname is required")]
    PostUsersEmptyNickname,
    #[error("password is invalid")]
    PostUsersInvalidPassword,

    // 2030-2032: posts
    #[error("post does not exist")]
    PostsEmptyPostId,
    #[error("post content exceeds the length limit")]
    PostPostsInvalidContents,
    #[error("post needs at least one image")]
    PostPostsEmptyImgUrl,

    // 3000: lookups
    #[error("user not found")]
    UsersNotFound,
    #[error("unknown email or wrong password")]
    FailedToLogin,

    // 4000: server side
    #[error("database error")]
    DatabaseError,
    #[error("server error")]
    ServerError,
    #[error("password hashing failed")]
    PasswordEncryptionError,
    #[error("nickname update failed")]
    ModifyFailUsername,
    #[error("post update failed")]
    ModifyFailPost,
    #[error("post delete failed")]
    DeleteFailPost,
}

impl ApiError {
    /// Stable envelope status code
    pub fn status(&self) -> u32 {
        match self {
            ApiError::RequestError(_) => 2000,
            ApiError::EmptyJwt => 2001,
            ApiError::InvalidJwt => 2002,
            ApiError::InvalidUserJwt => 2003,
            ApiError::ExpiredJwt => 2004,
            ApiError::UsersEmptyUserId => 2010,
            ApiError::PostUsersEmptyEmail => 2015,
            ApiError::PostUsersInvalidEmail => 2016,
            ApiError::PostUsersExistsEmail => 2017,
            ApiError::PostUsersEmptyNickname => 2018,
            ApiError::PostUsersInvalidPassword => 2019,
            ApiError::PostsEmptyPostId => 2030,
            ApiError::PostPostsInvalidContents => 2031,
            ApiError::PostPostsEmptyImgUrl => 2032,
            ApiError::UsersNotFound => 3010,
            ApiError::FailedToLogin => 3014,
            ApiError::DatabaseError => 4000,
            ApiError::ServerError => 4001,
            ApiError::PasswordEncryptionError => 4011,
            ApiError::ModifyFailUsername => 4014,
            ApiError::ModifyFailPost => 4020,
            ApiError::DeleteFailPost => 4021,
        }
    }

    /// HTTP status code for the response line
    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::RequestError(_)
            | ApiError::PostUsersEmptyEmail
            | ApiError::PostUsersInvalidEmail
            | ApiError::PostUsersEmptyNickname
            | ApiError::PostUsersInvalidPassword
            | ApiError::PostPostsInvalidContents
            | ApiError::PostPostsEmptyImgUrl => StatusCode::BAD_REQUEST,
            ApiError::EmptyJwt | ApiError::InvalidJwt | ApiError::ExpiredJwt | ApiError::FailedToLogin => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InvalidUserJwt => StatusCode::FORBIDDEN,
            ApiError::UsersEmptyUserId | ApiError::PostsEmptyPostId | ApiError::UsersNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::PostUsersExistsEmail => StatusCode::CONFLICT,
            ApiError::DatabaseError
            | ApiError::ServerError
            | ApiError::PasswordEncryptionError
            | ApiError::ModifyFailUsername
            | ApiError::ModifyFailPost
            | ApiError::DeleteFailPost => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message
    pub fn message(&self) -> String {
        match self {
            ApiError::RequestError(detail) => format!("Invalid request: {}", detail),
            ApiError::EmptyJwt => "Please provide an access token.".to_string(),
            ApiError::InvalidJwt => "The access token is not valid.".to_string(),
            ApiError::InvalidUserJwt => "This user is not allowed to perform the request.".to_string(),
            ApiError::ExpiredJwt => "The access token has expired.".to_string(),
            ApiError::UsersEmptyUserId => "Please check the user id.".to_string(),
            ApiError::PostUsersEmptyEmail => "Please enter an email.".to_string(),
            ApiError::PostUsersInvalidEmail => "Please check the email format.".to_string(),
            ApiError::PostUsersExistsEmail => "This email is already registered.".to_string(),
            ApiError::PostUsersEmptyNickname => "Please enter a nickname.".to_string(),
            ApiError::PostUsersInvalidPassword => "Please check the password.".to_string(),
            ApiError::PostsEmptyPostId => "Please check the post id.".to_string(),
            ApiError::PostPostsInvalidContents => "Post content must be 450 characters or fewer.".to_string(),
            ApiError::PostPostsEmptyImgUrl => "Please attach at least one image.".to_string(),
            ApiError::UsersNotFound => "No matching user was found.".to_string(),
            ApiError::FailedToLogin => "Unknown email or wrong password.".to_string(),
            ApiError::DatabaseError => "Failed to reach the database.".to_string(),
            ApiError::ServerError => "Failed to reach the server.".to_string(),
            ApiError::PasswordEncryptionError => "Failed to encrypt the password.".to_string(),
            ApiError::ModifyFailUsername => "Failed to update the nickname.".to_string(),
            ApiError::ModifyFailPost => "Failed to update the post.".to_string(),
            ApiError::DeleteFailPost => "Failed to delete the post.".to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "isSuccess": false,
            "status": self.status(),
            "message": self.message(),
        })
    }
}

// Persistence failures collapse into one kind; the cause is logged, never returned
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::DatabaseError
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        match err {
            crate::auth::JwtError::Expired => ApiError::ExpiredJwt,
            crate::auth::JwtError::Invalid(reason) => {
                tracing::debug!("Rejected access token: {}", reason);
                ApiError::InvalidJwt
            }
            crate::auth::JwtError::InvalidSecret
            | crate::auth::JwtError::InvalidExpiry(_)
            | crate::auth::JwtError::TokenGeneration(_) => {
                tracing::error!("Token service error: {}", err);
                ApiError::ServerError
            }
        }
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.http_status(), Json(self.to_json())).into_response()
    }
}
