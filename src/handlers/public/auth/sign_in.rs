// handlers/public/auth/sign_in.rs - POST /sign-in handler

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::PublicUser;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};

use super::sign_up::UserBody;
use super::CredentialsBody;

/// POST /sign-in - Exchange email and password for a bearer token
///
/// Each sign-in rotates the token, so a previously issued token stops working.
///
/// Expected Output:
/// ```json
/// { "user": { "id": "...", "email": "a@example.com", "token": "3f9c...", ... } }
/// ```
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CredentialsBody>,
) -> ApiResult<UserBody> {
    let (user, token) = state.users.sign_in(body.credentials).await?;
    Ok(ApiResponse::created(UserBody {
        user: PublicUser::from(&user).with_token(token),
    }))
}
