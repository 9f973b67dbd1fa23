pub mod post;
pub mod user;

pub use post::{relative_age, FeedItem, FeedRow, PostImage};
pub use user::{LoginAccount, NewUser, Session, User, UserInfo, UserPostThumbnail, UserProfile};
