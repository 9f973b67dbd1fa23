//! Presentation-layer checks run before anything reaches a provider or service.

use validator::ValidateEmail;

use crate::error::ApiError;
use crate::services::validate_content;
use crate::types::{char_len, MAX_EMAIL_CHARS, MAX_NAME_CHARS, MAX_NICKNAME_CHARS, MAX_PHONE_CHARS};

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_PASSWORD_CHARS: usize = 20;

pub fn email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::PostUsersEmptyEmail);
    }
    if char_len(email) > MAX_EMAIL_CHARS || !email.validate_email() {
        return Err(ApiError::PostUsersInvalidEmail);
    }
    Ok(())
}

pub fn nickname(nick_name: &str) -> Result<(), ApiError> {
    if nick_name.trim().is_empty() {
        return Err(ApiError::PostUsersEmptyNickname);
    }
    if char_len(nick_name) > MAX_NICKNAME_CHARS {
        return Err(ApiError::RequestError(format!(
            "nickName must be at most {} characters",
            MAX_NICKNAME_CHARS
        )));
    }
    Ok(())
}

pub fn name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::RequestError("name is required".to_string()));
    }
    if char_len(name) > MAX_NAME_CHARS {
        return Err(ApiError::RequestError(format!("name must be at most {} characters", MAX_NAME_CHARS)));
    }
    Ok(())
}

pub fn phone(phone: Option<&str>) -> Result<(), ApiError> {
    match phone {
        Some(phone) if char_len(phone) > MAX_PHONE_CHARS => Err(ApiError::RequestError(format!(
            "phone must be at most {} characters",
            MAX_PHONE_CHARS
        ))),
        _ => Ok(()),
    }
}

pub fn password(password: &str) -> Result<(), ApiError> {
    let len = char_len(password);
    if !(MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&len) {
        return Err(ApiError::PostUsersInvalidPassword);
    }
    Ok(())
}

pub fn post_content(content: &str) -> Result<(), ApiError> {
    validate_content(content)
}

pub fn post_images(img_urls: &[String]) -> Result<(), ApiError> {
    if img_urls.is_empty() || img_urls.iter().any(|url| url.trim().is_empty()) {
        return Err(ApiError::PostPostsEmptyImgUrl);
    }
    Ok(())
}
