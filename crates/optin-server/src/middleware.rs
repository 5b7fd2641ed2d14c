use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use optin_core::{AppConfig, ShopToken};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const SHOP_DOMAIN_HEADER: &str = "x-shop-domain";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The shop the current request acts for. Every persistence call is scoped by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop(pub String);

/// Session provider settings used by middleware.
#[derive(Clone)]
pub struct SessionState {
    tokens: Arc<Vec<ShopToken>>,
    /// Development only: trust the `x-shop-domain` header when no tokens are configured.
    header_fallback: bool,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("shops", &self.tokens.len())
            .field("header_fallback", &self.header_fallback)
            .finish()
    }
}

impl SessionState {
    /// Builds the session provider from `OPTIN_SHOP_TOKENS`.
    ///
    /// In development, an empty token set falls back to the `x-shop-domain`
    /// header for local iteration. In non-development envs it fails startup.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::from_tokens(config.shop_tokens.clone(), config.is_development())
    }

    pub fn from_tokens(tokens: Vec<ShopToken>, is_development: bool) -> anyhow::Result<Self> {
        if tokens.is_empty() {
            if is_development {
                tracing::warn!(
                    "OPTIN_SHOP_TOKENS not set; shop taken from {SHOP_DOMAIN_HEADER} header in development environment"
                );
                return Ok(Self {
                    tokens: Arc::new(Vec::new()),
                    header_fallback: true,
                });
            }

            anyhow::bail!(
                "OPTIN_SHOP_TOKENS is required outside development; provide comma-separated shop=token pairs"
            );
        }

        Ok(Self {
            tokens: Arc::new(tokens),
            header_fallback: false,
        })
    }

    /// Map a bearer token to its shop. Every configured token is compared so
    /// the time taken does not depend on which one matched.
    fn shop_for_token(&self, token: &str) -> Option<&str> {
        let mut found = None;
        for entry in self.tokens.iter() {
            if bool::from(entry.token.as_bytes().ct_eq(token.as_bytes())) {
                found = Some(entry.shop.as_str());
            }
        }
        found
    }

    fn resolve(&self, headers: &HeaderMap) -> Option<String> {
        if self.header_fallback {
            return headers
                .get(SHOP_DOMAIN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned);
        }

        extract_bearer_token(headers.get(AUTHORIZATION))
            .and_then(|token| self.shop_for_token(token))
            .map(ToOwned::to_owned)
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        )
    }
}

/// Error response in the standard `{error, meta}` envelope. The request id
/// comes from [`request_id`], which runs before every other middleware.
fn middleware_error(req: &Request, code: &'static str, message: &'static str) -> Response {
    let rid = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();
    ApiError::new(rid, code, message).into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware resolving the request's shop and inserting it as [`Shop`].
pub async fn require_shop_session(
    State(session): State<SessionState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(shop) = session.resolve(req.headers()) else {
        let message = if session.header_fallback {
            "missing x-shop-domain header"
        } else {
            "missing or invalid bearer token"
        };
        return middleware_error(&req, "unauthorized", message);
    };

    req.extensions_mut().insert(Shop(shop));
    next.run(req).await
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return middleware_error(&req, "rate_limited", "rate limit exceeded");
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
