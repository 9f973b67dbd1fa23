use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_idx: i64,
    pub name: String,
    pub nick_name: String,
    pub email: String,
}

/// Profile header: the user plus post/follower/following counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub nick_name: String,
    pub profile_img_url: Option<String>,
    pub website: Option<String>,
    pub introduction: Option<String>,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

/// First active image of one of the user's posts, for the profile grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserPostThumbnail {
    pub post_idx: i64,
    pub post_img_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_info: UserInfo,
    pub user_posts: Vec<UserPostThumbnail>,
}

/// Insert payload; `password` is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub nick_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub password: String,
}

/// Credentials row used only by login
#[derive(Debug, Clone, FromRow)]
pub struct LoginAccount {
    pub user_idx: i64,
    pub password: String,
    pub status: String,
}

/// Result of registration and login: who the caller is and their access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_idx: i64,
    pub jwt: String,
}
