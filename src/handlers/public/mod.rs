// Public handlers: no access token required.
pub mod auth;
pub mod posts;
pub mod users;
