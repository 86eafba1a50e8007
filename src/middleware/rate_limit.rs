//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and route bucket.
//! Without Redis, or when Redis errors, requests pass through.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use tracing::warn;

use crate::{
    constants::{API_BASE_PATH, rate_limits},
    error::AppError,
    state::AppState,
};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(mut redis) = state.redis() else {
        return Ok(next.run(request).await);
    };

    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let bucket = path_bucket(request.uri().path());
    let (limit, window) = bucket_limit(bucket);

    let key = format!("rate_limit:{}:{}", ip, bucket);

    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Rate limiter unavailable, allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        // Set expiry on first request
        let _: () = redis.expire(&key, window).await.unwrap_or(());
    }

    if count > limit {
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Bucket for a request path (groups endpoints sharing a limit)
fn path_bucket(path: &str) -> &'static str {
    let path = path.strip_prefix(API_BASE_PATH).unwrap_or(path);

    if path.starts_with("/auth") {
        "auth"
    } else if path.starts_with("/registrations") {
        "registrations"
    } else {
        "general"
    }
}

/// Requests allowed per window, and the window length in seconds
fn bucket_limit(bucket: &str) -> (i64, i64) {
    match bucket {
        "auth" => (
            rate_limits::AUTH_MAX_REQUESTS,
            rate_limits::AUTH_WINDOW_SECS,
        ),
        "registrations" => (
            rate_limits::REGISTRATION_MAX_REQUESTS,
            rate_limits::REGISTRATION_WINDOW_SECS,
        ),
        _ => (
            rate_limits::GENERAL_MAX_REQUESTS,
            rate_limits::GENERAL_WINDOW_SECS,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bucket() {
        assert_eq!(path_bucket("/api/auth/login"), "auth");
        assert_eq!(path_bucket("/api/registrations/checkin"), "registrations");
        assert_eq!(path_bucket("/api/events"), "general");
        assert_eq!(path_bucket("/api/health"), "general");
    }

    #[test]
    fn test_auth_bucket_is_strictest() {
        let (auth, _) = bucket_limit("auth");
        let (registrations, _) = bucket_limit("registrations");
        let (general, _) = bucket_limit("general");
        assert!(auth < registrations && registrations < general);
    }
}
