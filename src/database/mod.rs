pub mod manager;
pub mod models;
pub mod post_dao;
pub mod user_dao;

pub use manager::{DatabaseError, DatabaseManager};
pub use post_dao::{PgPostDao, PostDao};
pub use user_dao::{PgUserDao, UserDao};
