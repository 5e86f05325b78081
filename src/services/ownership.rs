use crate::database::models::Recipe;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Fails with `Forbidden` unless `caller` owns `recipe`
pub fn require_ownership(caller: &AuthUser, recipe: &Recipe) -> Result<(), ApiError> {
    if recipe.owner == caller.id {
        return Ok(());
    }
    tracing::warn!(
        "Ownership check failed: user {} tried to modify recipe {} owned by {}",
        caller.id,
        recipe.id,
        recipe.owner
    );
    Err(ApiError::forbidden("The requested resource belongs to another user"))
}
