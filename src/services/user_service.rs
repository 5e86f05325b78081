use std::sync::Arc;

use serde::Deserialize;

use crate::auth::{generate_token, token_digest, PasswordHasherConfig};
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::UserStore;
use crate::error::{ApiError, FieldErrors};
use crate::middleware::AuthUser;

/// `credentials` object of sign-up and sign-in bodies
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// `passwords` object of the change-password body
#[derive(Debug, Default, Deserialize)]
pub struct PasswordChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Account lifecycle and bearer token resolution
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasherConfig,
    min_password_length: usize,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, security: &SecurityConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasherConfig::from_security(security),
            min_password_length: security.min_password_length,
        }
    }

    pub async fn sign_up(&self, credentials: Credentials) -> Result<User, ApiError> {
        let mut errors = FieldErrors::new();

        let email = credentials.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            errors.insert("email".into(), "is required".into());
        } else if !looks_like_email(email) {
            errors.insert("email".into(), "is not a valid email address".into());
        }

        let password = credentials.password.as_deref().unwrap_or_default();
        if let Some(problem) = self.password_problem(password) {
            errors.insert("password".into(), problem);
        }
        if credentials.password_confirmation.as_deref() != Some(password) {
            errors.insert("password_confirmation".into(), "does not match password".into());
        }

        if !errors.is_empty() {
            return Err(ApiError::unprocessable_entity("The received params failed validation", errors));
        }

        let hashed = self.hasher.hash(password)?;
        let user = self.store.insert(email, &hashed).await?;
        tracing::info!("Registered user {} ({})", user.email, user.id);
        Ok(user)
    }

    /// Verify credentials and issue a fresh token, replacing any previous one
    pub async fn sign_in(&self, credentials: Credentials) -> Result<(User, String), ApiError> {
        let (Some(email), Some(password)) = (credentials.email, credentials.password) else {
            let mut errors = FieldErrors::new();
            errors.insert("credentials".into(), "email and password are required".into());
            return Err(ApiError::unprocessable_entity("The received params failed validation", errors));
        };

        let user = self
            .store
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| {
                tracing::warn!("Sign-in failed: unknown email");
                ApiError::unauthorized("The provided username or password is incorrect")
            })?;

        if !self.hasher.verify(&password, &user.hashed_password)? {
            tracing::warn!("Sign-in failed: wrong password for {}", user.id);
            return Err(ApiError::unauthorized("The provided username or password is incorrect"));
        }

        let token = generate_token();
        self.store.set_token_digest(user.id, &token_digest(&token)).await?;
        tracing::info!("User {} signed in", user.id);
        Ok((user, token))
    }

    pub async fn change_password(&self, caller: &AuthUser, passwords: PasswordChange) -> Result<(), ApiError> {
        let user = self
            .store
            .find_by_id(caller.id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))?;

        let old = passwords.old.unwrap_or_default();
        if !self.hasher.verify(&old, &user.hashed_password)? {
            tracing::warn!("Password change rejected for {}: old password mismatch", user.id);
            return Err(ApiError::unauthorized("The provided password is incorrect"));
        }

        let new = passwords.new.unwrap_or_default();
        if let Some(problem) = self.password_problem(&new) {
            return Err(ApiError::invalid_field("new", problem));
        }

        let hashed = self.hasher.hash(&new)?;
        self.store.set_password(user.id, &hashed).await?;
        tracing::info!("Password changed for {}", user.id);
        Ok(())
    }

    /// Replace the stored digest with one nobody holds a token for
    pub async fn sign_out(&self, caller: &AuthUser) -> Result<(), ApiError> {
        self.store
            .set_token_digest(caller.id, &token_digest(&generate_token()))
            .await?;
        tracing::info!("User {} signed out", caller.id);
        Ok(())
    }

    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, ApiError> {
        let user = self
            .store
            .find_by_token_digest(&token_digest(token))
            .await?
            .ok_or_else(|| {
                tracing::warn!("Rejected unknown bearer token");
                ApiError::unauthorized("Invalid bearer token")
            })?;
        Ok(AuthUser::from(&user))
    }

    fn password_problem(&self, password: &str) -> Option<String> {
        if password.is_empty() {
            Some("is required".to_string())
        } else if password.chars().count() < self.min_password_length {
            Some(format!("must be at least {} characters", self.min_password_length))
        } else {
            None
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
