use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

pub const SUCCESS_STATUS: u32 = 1000;
pub const SUCCESS_MESSAGE: &str = "Request succeeded.";

/// Wrapper for API responses that adds the success envelope:
/// `{"isSuccess": true, "status": 1000, "message": ..., "result": ...}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub result: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(result: T) -> Self {
        Self { result }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let result = match serde_json::to_value(&self.result) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::ServerError.into_response();
            }
        };

        let envelope = json!({
            "isSuccess": true,
            "status": SUCCESS_STATUS,
            "message": SUCCESS_MESSAGE,
            "result": result,
        });

        (StatusCode::OK, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
