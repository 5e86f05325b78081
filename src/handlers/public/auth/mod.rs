// handlers/public/auth/mod.rs - Account creation and token acquisition
pub mod sign_in; // POST /sign-in - verify credentials, issue token
pub mod sign_up; // POST /sign-up - create account

pub use sign_in::sign_in;
pub use sign_up::sign_up;

use serde::Deserialize;

use crate::services::Credentials;

/// `{"credentials": {...}}`
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub credentials: Credentials,
}
