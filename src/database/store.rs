use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewRecipe, Recipe, RecipePatch, User};

/// Persistence seam for recipes
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes owned by `owner`, oldest first
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Recipe>, DatabaseError>;

    async fn find(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError>;

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, DatabaseError>;

    /// Overwrite the fields set in `patch` and bump `updated_at`
    async fn update(&self, id: Uuid, patch: RecipePatch) -> Result<(), DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// Persistence seam for accounts and their bearer token digests
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_token_digest(&self, digest: &str) -> Result<Option<User>, DatabaseError>;

    async fn set_token_digest(&self, id: Uuid, digest: &str) -> Result<(), DatabaseError>;

    async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<(), DatabaseError>;
}
