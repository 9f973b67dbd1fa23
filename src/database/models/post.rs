use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostImage {
    pub post_img_url_idx: i64,
    pub img_url: String,
}

/// One row of the feed query, before images and the age label are attached
#[derive(Debug, Clone, FromRow)]
pub struct FeedRow {
    pub post_idx: i64,
    pub user_idx: i64,
    pub nick_name: String,
    pub profile_img_url: Option<String>,
    pub content: String,
    pub post_like_count: i64,
    pub comment_count: i64,
    pub updated_at: DateTime<Utc>,
    pub like_or_not: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub post_idx: i64,
    pub user_idx: i64,
    pub nick_name: String,
    pub profile_img_url: Option<String>,
    pub content: String,
    pub post_like_count: i64,
    pub comment_count: i64,
    /// Relative age, e.g. "3 hours ago"
    pub updated_at: String,
    pub like_or_not: bool,
    pub imgs: Vec<PostImage>,
}

impl FeedItem {
    pub fn from_row(row: FeedRow, imgs: Vec<PostImage>, now: DateTime<Utc>) -> Self {
        Self {
            post_idx: row.post_idx,
            user_idx: row.user_idx,
            nick_name: row.nick_name,
            profile_img_url: row.profile_img_url,
            content: row.content,
            post_like_count: row.post_like_count,
            comment_count: row.comment_count,
            updated_at: relative_age(row.updated_at, now),
            like_or_not: row.like_or_not,
            imgs,
        }
    }
}

/// Render the age of `then` in the largest unit that keeps the number under the next
/// bucket: seconds (<60), minutes (<60), hours (<24), days (<365), then years.
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // Clock skew can put `then` slightly in the future
    let elapsed = (now - then).num_seconds().max(0);

    let (amount, unit) = if elapsed < 60 {
        (elapsed, "second")
    } else if elapsed < 60 * 60 {
        (elapsed / 60, "minute")
    } else if elapsed < 60 * 60 * 24 {
        (elapsed / (60 * 60), "hour")
    } else if elapsed < 60 * 60 * 24 * 365 {
        (elapsed / (60 * 60 * 24), "day")
    } else {
        (elapsed / (60 * 60 * 24 * 365), "year")
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}
