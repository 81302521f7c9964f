//! Rate limiting middleware backed by the request counter store.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "Too many requests. Please try again later.",
        )
            .into_response()
    }
}

/// Fixed-window budget for one class of routes.
struct Budget {
    scope: &'static str,
    max_requests: u64,
    window_seconds: u64,
}

const GENERAL: Budget = Budget {
    scope: "general",
    max_requests: RATE_LIMIT_REQUESTS,
    window_seconds: RATE_LIMIT_WINDOW_SECONDS,
};

const AUTH: Budget = Budget {
    scope: "auth",
    max_requests: RATE_LIMIT_AUTH_REQUESTS,
    window_seconds: RATE_LIMIT_AUTH_WINDOW_SECONDS,
};

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn get_client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        // First IP in the chain is the original client
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

async fn enforce(
    state: &AppState,
    budget: &Budget,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client_id = get_client_identifier(&request);
    let key = format!("{}:{}", budget.scope, client_id);

    let (count, allowed) = match state
        .rate_limiter
        .check_rate_limit(&key, budget.max_requests, budget.window_seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Fail closed when the counter store is unavailable
            tracing::error!(error = %e, scope = budget.scope, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: budget.window_seconds,
            });
        }
    };

    if !allowed {
        tracing::warn!(
            client = %client_id,
            scope = budget.scope,
            count = count,
            "Rate limit exceeded"
        );
        return Err(RateLimitError {
            retry_after: budget.window_seconds,
        });
    }

    let mut response = next.run(request).await;

    let remaining = budget.max_requests.saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(budget.max_requests));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}

/// General rate limiting middleware.
/// Limits requests to RATE_LIMIT_REQUESTS per RATE_LIMIT_WINDOW_SECONDS.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(&state, &GENERAL, request, next).await
}

/// Stricter rate limiting for login, registration and password changes.
/// Limits requests to RATE_LIMIT_AUTH_REQUESTS per RATE_LIMIT_AUTH_WINDOW_SECONDS.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(&state, &AUTH, request, next).await
}
