pub mod post_provider;
pub mod post_service;
pub mod user_provider;
pub mod user_service;

pub use post_provider::PostProvider;
pub use post_service::{validate_content, PostService};
pub use user_provider::UserProvider;
pub use user_service::{Registration, UserService};
