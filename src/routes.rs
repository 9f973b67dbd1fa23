use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseManager, PgPostDao, PgUserDao, PostDao, UserDao};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PostProvider, PostService, UserProvider, UserService};

/// Everything a handler can reach. Built once at startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub post_provider: PostProvider,
    pub post_service: PostService,
    pub user_provider: UserProvider,
    pub user_service: UserService,
    pub tokens: TokenService,
    /// Absent when running on in-memory DAOs
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(post_dao: Arc<dyn PostDao>, user_dao: Arc<dyn UserDao>, tokens: TokenService) -> Self {
        let post_provider = PostProvider::new(post_dao.clone());
        let post_service = PostService::new(post_dao, post_provider.clone());
        let user_provider = UserProvider::new(user_dao.clone(), tokens.clone());
        let user_service = UserService::new(user_dao, user_provider.clone(), tokens.clone());

        Self {
            post_provider,
            post_service,
            user_provider,
            user_service,
            tokens,
            pool: None,
        }
    }

    /// Postgres-backed state
    pub fn with_pool(pool: PgPool, tokens: TokenService) -> Self {
        let mut state = Self::new(
            Arc::new(PgPostDao::new(pool.clone())),
            Arc::new(PgUserDao::new(pool.clone())),
            tokens,
        );
        state.pool = Some(pool);
        state
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Router with request tracing and CORS applied per configuration
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = router(state);
    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }
    if config.server.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Posts
        .route("/posts", get(public::posts::feed_get).post(protected::posts::post_create))
        .route(
            "/posts/:post_idx",
            patch(protected::posts::post_modify).delete(protected::posts::post_delete_hard),
        )
        .route("/posts/:post_idx/status", patch(protected::posts::post_delete_soft))
        // Users
        .route("/users", get(public::users::users_get).post(public::users::user_register))
        .route(
            "/users/:user_idx",
            get(public::users::user_profile_get).patch(protected::users::nickname_patch),
        )
        // Auth
        .route("/auth/login", post(public::auth::login_post))
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "gram-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Photo feed backend: users, posts with images, follow feed",
    })))
}

async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    let Some(pool) = state.pool.as_ref() else {
        return ApiResponse::success(json!({ "status": "ok", "timestamp": now, "database": "not configured" }))
            .into_response();
    };

    match DatabaseManager::health_check(pool).await {
        Ok(()) => ApiResponse::success(json!({ "status": "ok", "timestamp": now, "database": "ok" })).into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(ApiError::DatabaseError.to_json())).into_response()
        }
    }
}
