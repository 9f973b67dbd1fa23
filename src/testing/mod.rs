//! In-memory stand-ins for the DAOs so providers, services and the router can be
//! exercised without Postgres.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::auth::{hash_password, TokenService};
use crate::database::models::{
    FeedItem, FeedRow, LoginAccount, NewUser, PostImage, User, UserInfo, UserPostThumbnail,
};
use crate::database::{DatabaseError, PostDao, UserDao};
use crate::types::Status;

pub const TEST_SECRET: &str = "gram-api-test-secret";

pub fn test_tokens() -> TokenService {
    TokenService::new(TEST_SECRET, 1).expect("test secret is not empty")
}

#[derive(Debug, Clone)]
struct UserRow {
    user_idx: i64,
    name: String,
    nick_name: String,
    email: String,
    password: String,
    status: Status,
}

/// Stored state of one post as seen by assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPost {
    pub user_idx: i64,
    pub content: String,
    pub status: Status,
}

#[derive(Debug, Clone)]
struct PostRow {
    post_idx: i64,
    user_idx: i64,
    content: String,
    status: Status,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ImageRow {
    post_img_url_idx: i64,
    post_idx: i64,
    img_url: String,
    status: Status,
}

#[derive(Default)]
struct State {
    next_idx: i64,
    users: Vec<UserRow>,
    posts: Vec<PostRow>,
    images: Vec<ImageRow>,
    follows: Vec<(i64, i64)>,
    likes: Vec<(i64, i64)>,
    comments: Vec<i64>,
    queries: usize,
    updates: usize,
    fail_queries: bool,
    drop_writes: bool,
    race_email_inserts: bool,
}

impl State {
    fn next_idx(&mut self) -> i64 {
        self.next_idx += 1;
        self.next_idx
    }

    fn insert_post(&mut self, user_idx: i64, content: &str, img_urls: &[String]) -> i64 {
        let post_idx = self.next_idx();
        // Strictly increasing timestamps keep feed order deterministic
        let updated_at = Utc::now() + Duration::milliseconds(post_idx);
        self.posts.push(PostRow {
            post_idx,
            user_idx,
            content: content.to_string(),
            status: Status::Active,
            updated_at,
        });
        for img_url in img_urls {
            let post_img_url_idx = self.next_idx();
            self.images.push(ImageRow {
                post_img_url_idx,
                post_idx,
                img_url: img_url.clone(),
                status: Status::Active,
            });
        }
        post_idx
    }

    fn insert_user(&mut self, new_user: &NewUser) -> i64 {
        let user_idx = self.next_idx();
        self.users.push(UserRow {
            user_idx,
            name: new_user.name.clone(),
            nick_name: new_user.nick_name.clone(),
            email: new_user.email.clone(),
            password: new_user.password.clone(),
            status: Status::Active,
        });
        user_idx
    }

    fn active_images(&self, post_idx: i64) -> Vec<PostImage> {
        let parent_active = self
            .posts
            .iter()
            .any(|p| p.post_idx == post_idx && p.status == Status::Active);
        if !parent_active {
            return Vec::new();
        }
        self.images
            .iter()
            .filter(|i| i.post_idx == post_idx && i.status == Status::Active)
            .map(|i| PostImage {
                post_img_url_idx: i.post_img_url_idx,
                img_url: i.img_url.clone(),
            })
            .collect()
    }

    fn user(&self, user_idx: i64) -> Option<&UserRow> {
        self.users.iter().find(|u| u.user_idx == user_idx)
    }
}

fn public_user(row: &UserRow) -> User {
    User {
        user_idx: row.user_idx,
        name: row.name.clone(),
        nick_name: row.nick_name.clone(),
        email: row.email.clone(),
    }
}

/// Shared, cloneable in-memory database. Every DAO call counts as one query; failure
/// switches let tests drive the error paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_dao(&self) -> Arc<dyn PostDao> {
        Arc::new(self.clone())
    }

    pub fn user_dao(&self) -> Arc<dyn UserDao> {
        Arc::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    fn read(&self) -> Result<MutexGuard<'_, State>, DatabaseError> {
        let mut state = self.lock();
        state.queries += 1;
        if state.fail_queries {
            return Err(DatabaseError::QueryError("injected failure".into()));
        }
        Ok(state)
    }

    fn write(&self) -> Result<MutexGuard<'_, State>, DatabaseError> {
        let mut state = self.read()?;
        state.updates += 1;
        Ok(state)
    }

    // Fixtures; these bypass the query counters

    pub fn add_user(&self, email: &str) -> i64 {
        self.insert_fixture_user(email, "unused".to_string())
    }

    pub fn add_user_with_password(&self, email: &str, password: &str) -> i64 {
        let hash = hash_password(password).expect("hashing works in tests");
        self.insert_fixture_user(email, hash)
    }

    fn insert_fixture_user(&self, email: &str, password: String) -> i64 {
        let local = email.split('@').next().unwrap_or(email).to_string();
        self.lock().insert_user(&NewUser {
            name: local.clone(),
            nick_name: local,
            phone: None,
            email: email.to_string(),
            password,
        })
    }

    pub fn deactivate_user(&self, user_idx: i64) {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.user_idx == user_idx) {
            user.status = Status::Inactive;
        }
    }

    pub fn add_post(&self, user_idx: i64, content: &str, img_urls: &[&str]) -> i64 {
        let img_urls: Vec<String> = img_urls.iter().map(|s| s.to_string()).collect();
        self.lock().insert_post(user_idx, content, &img_urls)
    }

    pub fn follow(&self, follower_idx: i64, followee_idx: i64) {
        self.lock().follows.push((follower_idx, followee_idx));
    }

    pub fn like(&self, post_idx: i64, user_idx: i64) {
        self.lock().likes.push((post_idx, user_idx));
    }

    pub fn comment(&self, post_idx: i64, _user_idx: i64) {
        self.lock().comments.push(post_idx);
    }

    // Inspection

    pub fn post(&self, post_idx: i64) -> Option<StoredPost> {
        self.lock().posts.iter().find(|p| p.post_idx == post_idx).map(|p| StoredPost {
            user_idx: p.user_idx,
            content: p.content.clone(),
            status: p.status,
        })
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    /// (owning post, url) for every stored image row of `post_idx`, any status
    pub fn images_of(&self, post_idx: i64) -> Vec<(i64, String)> {
        self.lock()
            .images
            .iter()
            .filter(|i| i.post_idx == post_idx)
            .map(|i| (i.post_idx, i.img_url.clone()))
            .collect()
    }

    pub fn password_of(&self, user_idx: i64) -> Option<String> {
        self.lock().user(user_idx).map(|u| u.password.clone())
    }

    pub fn queries(&self) -> usize {
        self.lock().queries
    }

    pub fn updates(&self) -> usize {
        self.lock().updates
    }

    // Failure switches

    pub fn fail_queries(&self, on: bool) {
        self.lock().fail_queries = on;
    }

    /// Writes succeed but report zero affected rows
    pub fn drop_writes(&self, on: bool) {
        self.lock().drop_writes = on;
    }

    /// `insert_user` fails with a unique violation, as if another request won the race
    pub fn race_email_inserts(&self, on: bool) {
        self.lock().race_email_inserts = on;
    }
}

#[async_trait]
impl PostDao for MemoryStore {
    async fn select_feed(&self, user_idx: i64) -> Result<Vec<FeedItem>, DatabaseError> {
        let state = self.read()?;
        let now = Utc::now();

        let mut posts: Vec<&PostRow> = state
            .posts
            .iter()
            .filter(|p| p.status == Status::Active)
            .filter(|p| state.follows.contains(&(user_idx, p.user_idx)))
            .collect();
        posts.sort_by(|a, b| (b.updated_at, b.post_idx).cmp(&(a.updated_at, a.post_idx)));

        let feed = posts
            .into_iter()
            .filter_map(|p| {
                let author = state.user(p.user_idx)?;
                let row = FeedRow {
                    post_idx: p.post_idx,
                    user_idx: p.user_idx,
                    nick_name: author.nick_name.clone(),
                    profile_img_url: None,
                    content: p.content.clone(),
                    post_like_count: state.likes.iter().filter(|(post, _)| *post == p.post_idx).count() as i64,
                    comment_count: state.comments.iter().filter(|post| **post == p.post_idx).count() as i64,
                    updated_at: p.updated_at,
                    like_or_not: state.likes.contains(&(p.post_idx, user_idx)),
                };
                Some(FeedItem::from_row(row, state.active_images(p.post_idx), now))
            })
            .collect();

        Ok(feed)
    }

    async fn select_post_images(&self, post_idx: i64) -> Result<Vec<PostImage>, DatabaseError> {
        Ok(self.read()?.active_images(post_idx))
    }

    async fn insert_post(&self, user_idx: i64, content: &str, img_urls: &[String]) -> Result<i64, DatabaseError> {
        let mut state = self.write()?;
        Ok(state.insert_post(user_idx, content, img_urls))
    }

    async fn update_post(&self, post_idx: i64, content: &str) -> Result<u64, DatabaseError> {
        let mut state = self.write()?;
        if state.drop_writes {
            return Ok(0);
        }
        match state.posts.iter_mut().find(|p| p.post_idx == post_idx) {
            Some(post) => {
                post.content = content.to_string();
                post.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn soft_delete_post(&self, post_idx: i64) -> Result<u64, DatabaseError> {
        let mut state = self.write()?;
        if state.drop_writes {
            return Ok(0);
        }
        match state.posts.iter_mut().find(|p| p.post_idx == post_idx) {
            Some(post) => {
                post.status = Status::Inactive;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn hard_delete_post(&self, post_idx: i64) -> Result<u64, DatabaseError> {
        let mut state = self.write()?;
        if state.drop_writes {
            return Ok(0);
        }
        let before = state.posts.len();
        state.posts.retain(|p| p.post_idx != post_idx);
        state.images.retain(|i| i.post_idx != post_idx);
        Ok((before - state.posts.len()) as u64)
    }

    async fn check_user_exist(&self, user_idx: i64) -> Result<bool, DatabaseError> {
        Ok(self.read()?.user(user_idx).is_some())
    }

    async fn check_post_exist(&self, post_idx: i64) -> Result<bool, DatabaseError> {
        Ok(self.read()?.posts.iter().any(|p| p.post_idx == post_idx))
    }
}

#[async_trait]
impl UserDao for MemoryStore {
    async fn select_user_info(&self, user_idx: i64) -> Result<Option<UserInfo>, DatabaseError> {
        let state = self.read()?;
        let Some(user) = state.user(user_idx).filter(|u| u.status == Status::Active) else {
            return Ok(None);
        };

        Ok(Some(UserInfo {
            name: user.name.clone(),
            nick_name: user.nick_name.clone(),
            profile_img_url: None,
            website: None,
            introduction: None,
            post_count: state
                .posts
                .iter()
                .filter(|p| p.user_idx == user_idx && p.status == Status::Active)
                .count() as i64,
            follower_count: state.follows.iter().filter(|(_, followee)| *followee == user_idx).count() as i64,
            following_count: state.follows.iter().filter(|(follower, _)| *follower == user_idx).count() as i64,
        }))
    }

    async fn select_user_posts(&self, user_idx: i64) -> Result<Vec<UserPostThumbnail>, DatabaseError> {
        let state = self.read()?;
        let mut thumbnails: Vec<UserPostThumbnail> = state
            .posts
            .iter()
            .filter(|p| p.user_idx == user_idx && p.status == Status::Active)
            .filter_map(|p| {
                state.active_images(p.post_idx).into_iter().next().map(|img| UserPostThumbnail {
                    post_idx: p.post_idx,
                    post_img_url: img.img_url,
                })
            })
            .collect();
        thumbnails.sort_by_key(|t| t.post_idx);
        Ok(thumbnails)
    }

    async fn select_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.read()?.users.iter().map(public_user).collect())
    }

    async fn select_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).map(public_user))
    }

    async fn select_user_by_idx(&self, user_idx: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.read()?.user(user_idx).map(public_user))
    }

    async fn select_login_account(&self, email: &str) -> Result<Option<LoginAccount>, DatabaseError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).map(|u| LoginAccount {
            user_idx: u.user_idx,
            password: u.password.clone(),
            status: u.status.as_str().to_string(),
        }))
    }

    async fn insert_user(&self, new_user: &NewUser) -> Result<i64, DatabaseError> {
        let mut state = self.write()?;
        if state.race_email_inserts || state.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".into()));
        }
        Ok(state.insert_user(new_user))
    }

    async fn check_email(&self, email: &str) -> Result<bool, DatabaseError> {
        Ok(self.read()?.users.iter().any(|u| u.email == email))
    }

    async fn check_user_exist(&self, user_idx: i64) -> Result<bool, DatabaseError> {
        Ok(self.read()?.user(user_idx).is_some())
    }

    async fn update_nickname(&self, user_idx: i64, nick_name: &str) -> Result<u64, DatabaseError> {
        let mut state = self.write()?;
        if state.drop_writes {
            return Ok(0);
        }
        match state.users.iter_mut().find(|u| u.user_idx == user_idx) {
            Some(user) => {
                user.nick_name = nick_name.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
