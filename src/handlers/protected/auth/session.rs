// handlers/protected/auth/session.rs - PATCH /change-password, DELETE /sign-out

use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, NonBlankJson};
use crate::services::PasswordChange;

#[derive(Debug, Default, Deserialize)]
pub struct PasswordsBody {
    #[serde(default)]
    pub passwords: PasswordChange,
}

/// PATCH /change-password - Replace the caller's password
///
/// Input: `{"passwords": {"old": "...", "new": "..."}}`. 401 if `old` is wrong.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    NonBlankJson(body): NonBlankJson<PasswordsBody>,
) -> ApiResult<()> {
    state.users.change_password(&caller, body.passwords).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /sign-out - Revoke the caller's current token
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<()> {
    state.users.sign_out(&caller).await?;
    Ok(ApiResponse::no_content())
}
