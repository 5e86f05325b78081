use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewRecipe, Recipe, RecipePatch, User};
use super::store::{RecipeStore, UserStore};

/// Process-local store backing both traits. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    recipes: Arc<RwLock<HashMap<Uuid, Recipe>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Recipe>, DatabaseError> {
        let recipes = self.recipes.read().await;
        let mut owned: Vec<Recipe> = recipes
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        Ok(self.recipes.read().await.get(&id).cloned())
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, DatabaseError> {
        let stored = recipe.into_recipe(Uuid::new_v4(), Utc::now());
        self.recipes.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, patch: RecipePatch) -> Result<(), DatabaseError> {
        let mut recipes = self.recipes.write().await;
        let recipe = recipes
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("recipe {}", id)))?;
        patch.apply_to(recipe);
        recipe.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.recipes
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("recipe {}", id)))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(DatabaseError::Conflict("email already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            token_digest: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_token_digest(&self, digest: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.token_digest.as_deref() == Some(digest))
            .cloned())
    }

    async fn set_token_digest(&self, id: Uuid, digest: &str) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        user.token_digest = Some(digest.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}
