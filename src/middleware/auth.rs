use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;

/// Caller identity resolved from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Resolves the caller from `Authorization` and injects [`AuthUser`] into the request
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers()).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let auth_user = state.users.authenticate(&token).await?;
    tracing::debug!("Authenticated {} ({})", auth_user.email, auth_user.id);

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Accepts `Bearer <token>` and the older `Token token=<token>` form
fn extract_token(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = if let Some(rest) = auth_str.strip_prefix("Bearer ") {
        rest.trim()
    } else if let Some(rest) = auth_str.strip_prefix("Token token=") {
        rest.trim().trim_matches('"')
    } else {
        return Err("Authorization header must use Bearer token format");
    };

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token.to_string())
}
