//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{error::AppError, models::Admin, services::AuthService, state::AppState};

/// Administrator resolved from a bearer token
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedAdmin {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<Admin> for AuthenticatedAdmin {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            name: admin.name,
            role: admin.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAdmin>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated admin wrapper (never fails)
pub struct OptionalAuth(pub Option<AuthenticatedAdmin>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedAdmin>().cloned()))
    }
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(&request) else {
        debug!(path = %path, "Auth failed: missing or malformed Authorization header");
        return Err(AppError::Unauthorized);
    };

    let admin = AuthService::authenticate(state.store(), &state.config().jwt.secret, token)
        .await
        .inspect_err(|e| debug!(path = %path, error = ?e, "Auth failed"))?;

    debug!(path = %path, admin_id = %admin.id, "Admin authenticated");

    request
        .extensions_mut()
        .insert(AuthenticatedAdmin::from(admin));
    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token)
///
/// An invalid token is treated the same as no token.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&request) {
        match AuthService::authenticate(state.store(), &state.config().jwt.secret, token).await {
            Ok(admin) => {
                request
                    .extensions_mut()
                    .insert(AuthenticatedAdmin::from(admin));
            }
            Err(e) => debug!(error = ?e, "Ignoring unusable bearer token"),
        }
    }

    next.run(request).await
}
