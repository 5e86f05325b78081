// handlers/public/auth/sign_up.rs - POST /sign-up handler

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::PublicUser;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};

use super::CredentialsBody;

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: PublicUser,
}

/// POST /sign-up - Register a new account
///
/// Input: `{"credentials": {"email", "password", "password_confirmation"}}`
///
/// 201 with `{"user": {...}}`; 422 on invalid fields; 409 when the email is taken.
pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CredentialsBody>,
) -> ApiResult<UserBody> {
    let user = state.users.sign_up(body.credentials).await?;
    Ok(ApiResponse::created(UserBody {
        user: PublicUser::from(&user),
    }))
}
