mod drafts;
mod popups;
mod uploads;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use optin_core::{AppConfig, ValidationError};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_shop_session, RateLimitState, RequestId, SessionState,
};

/// Size limits applied by the upload route.
#[derive(Debug, Clone, Copy)]
pub struct ApiLimits {
    /// Largest image accepted, checked after the multipart body is read.
    pub upload_max_bytes: usize,
    /// Raw request body cap on the upload route.
    pub upload_body_limit_bytes: usize,
}

impl Default for ApiLimits {
    fn default() -> Self {
        Self {
            upload_max_bytes: optin_core::upload::DEFAULT_MAX_UPLOAD_BYTES,
            upload_body_limit_bytes: 8 * 1024 * 1024,
        }
    }
}

impl ApiLimits {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            upload_max_bytes: config.upload_max_bytes,
            upload_body_limit_bytes: config.upload_body_limit_bytes,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub limits: ApiLimits,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "payload_too_large" => StatusCode::PAYLOAD_TOO_LARGE,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &optin_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn validation_error(request_id: &str, error: &ValidationError) -> ApiError {
    ApiError::new(request_id, "validation_error", error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-shop-domain"),
        ])
}

fn protected_router(
    session: SessionState,
    rate_limit: RateLimitState,
    limits: ApiLimits,
) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/popups",
            get(popups::list_popups).post(popups::create_popup),
        )
        .route(
            "/api/v1/popups/{popup_id}",
            get(popups::get_popup)
                .put(popups::save_popup)
                .delete(popups::delete_popup),
        )
        .route(
            "/api/v1/popups/{popup_id}/toggle",
            post(popups::toggle_popup),
        )
        .route(
            "/api/v1/popups/{popup_id}/preview",
            get(popups::preview_popup),
        )
        .route("/api/v1/drafts/apply", post(drafts::apply_commands))
        .route("/api/v1/drafts/preview", post(drafts::preview_draft))
        .route(
            "/api/v1/uploads",
            post(uploads::upload_image)
                .layer(DefaultBodyLimit::max(limits.upload_body_limit_bytes)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    session,
                    require_shop_session,
                )),
        )
}

pub fn build_app(state: AppState, session: SessionState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(session, rate_limit, state.limits))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match optin_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
