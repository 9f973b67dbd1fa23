// Protected handlers: every handler takes `AuthUser`, so a request without a valid
// access token is rejected before the handler body runs.
pub mod posts;
pub mod users;

/// Confirmation strings returned as `result` by the mutation endpoints
pub const POST_UPDATED: &str = "Post updated.";
pub const POST_DELETED: &str = "Post deleted.";
pub const NICKNAME_UPDATED: &str = "Nickname updated.";
