use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{NewRecipe, Recipe, RecipePatch};
use crate::database::RecipeStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::ownership::require_ownership;

/// Owner-scoped recipe operations on top of a [`RecipeStore`]
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Recipes owned by the caller; empty when they have none
    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<Recipe>, ApiError> {
        Ok(self.store.list_by_owner(caller.id).await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Recipe, ApiError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("recipe {} not found", id)))
    }

    /// Validate `payload` and persist it with the caller as owner.
    ///
    /// Any `owner` key in the payload is ignored.
    pub async fn create(&self, payload: &Value, caller: &AuthUser) -> Result<Recipe, ApiError> {
        let fields = as_object(payload)?;
        let new = NewRecipe::from_payload(fields, caller.id).map_err(|field_errors| {
            ApiError::unprocessable_entity("The received params failed validation", field_errors)
        })?;

        let recipe = self.store.insert(new).await?;
        tracing::info!("Created recipe {} for {}", recipe.id, caller.id);
        Ok(recipe)
    }

    /// Load a recipe the caller may modify: 404 when absent, 403 when owned by someone else
    pub async fn find_owned(&self, id: Uuid, caller: &AuthUser) -> Result<Recipe, ApiError> {
        let recipe = self.get_by_id(id).await?;
        require_ownership(caller, &recipe)?;
        Ok(recipe)
    }

    /// Apply the non-blank fields of `payload` to a recipe the caller owns
    pub async fn update(&self, id: Uuid, payload: &Value, caller: &AuthUser) -> Result<(), ApiError> {
        let recipe = self.find_owned(id, caller).await?;
        self.apply_patch(&recipe, payload).await
    }

    /// Validate `payload` as a partial update of `recipe`, which must already be authorized
    pub async fn apply_patch(&self, recipe: &Recipe, payload: &Value) -> Result<(), ApiError> {
        let mut fields = as_object(payload)?.clone();
        fields.remove("owner");
        let patch = RecipePatch::from_payload(&fields).map_err(|field_errors| {
            ApiError::unprocessable_entity("The received params failed validation", field_errors)
        })?;

        if patch.is_empty() {
            tracing::debug!("Empty update for recipe {}, nothing to write", recipe.id);
            return Ok(());
        }
        self.store.update(recipe.id, patch).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid, caller: &AuthUser) -> Result<(), ApiError> {
        self.find_owned(id, caller).await?;

        self.store.delete(id).await?;
        tracing::info!("Deleted recipe {} for {}", id, caller.id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), ApiError> {
        Ok(self.store.health_check().await?)
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ApiError::invalid_field("recipe", "is required")),
        _ => Err(ApiError::invalid_field("recipe", "must be an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use serde_json::json;

    fn soup() -> Value {
        json!({
            "name": "Soup",
            "ingredients": "water",
            "instructions": "boil",
            "calories": 10,
            "type": "dinner",
            "cuisine": "french",
            "favorite": false
        })
    }

    #[tokio::test]
    async fn create_sets_owner_from_caller() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;

        let mut payload = soup();
        payload["owner"] = json!(Uuid::new_v4());
        let recipe = ctx.state.recipes.create(&payload, &alice).await.unwrap();

        assert_eq!(recipe.owner, alice.id);
        assert_eq!(recipe.created_at, recipe.updated_at);
    }

    #[tokio::test]
    async fn create_without_required_field_is_unprocessable() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;

        let mut payload = soup();
        payload.as_object_mut().unwrap().remove("cuisine");
        let err = ctx.state.recipes.create(&payload, &alice).await.unwrap_err();
        match err {
            ApiError::UnprocessableEntity { field_errors, .. } => {
                assert!(field_errors.contains_key("cuisine"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = ctx.state.recipes.create(&Value::Null, &alice).await.unwrap_err();
        assert!(matches!(err, ApiError::UnprocessableEntity { .. }));
    }

    #[tokio::test]
    async fn list_is_scoped_to_caller() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let (bob, _) = ctx.create_user("bob@example.com").await;

        ctx.state.recipes.create(&soup(), &alice).await.unwrap();
        ctx.state.recipes.create(&soup(), &alice).await.unwrap();
        ctx.state.recipes.create(&soup(), &bob).await.unwrap();

        let listed = ctx.state.recipes.list(&alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.owner == alice.id));
    }

    #[tokio::test]
    async fn update_overwrites_present_fields_only() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let recipe = ctx.state.recipes.create(&soup(), &alice).await.unwrap();

        let patch = json!({ "favorite": true, "name": "", "owner": Uuid::new_v4() });
        ctx.state.recipes.update(recipe.id, &patch, &alice).await.unwrap();

        let stored = ctx.state.recipes.get_by_id(recipe.id).await.unwrap();
        assert!(stored.favorite);
        assert_eq!(stored.name, "Soup");
        assert_eq!(stored.owner, alice.id);
        assert!(stored.updated_at >= recipe.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_wrong_types() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let recipe = ctx.state.recipes.create(&soup(), &alice).await.unwrap();

        let err = ctx
            .state
            .recipes
            .update(recipe.id, &json!({ "calories": "many" }), &alice)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnprocessableEntity { .. }));
    }

    #[tokio::test]
    async fn mutations_by_non_owner_are_forbidden() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let (bob, _) = ctx.create_user("bob@example.com").await;
        let recipe = ctx.state.recipes.create(&soup(), &alice).await.unwrap();

        let err = ctx
            .state
            .recipes
            .update(recipe.id, &json!({ "name": "Mine now" }), &bob)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err = ctx.state.recipes.delete(recipe.id, &bob).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        assert_eq!(ctx.state.recipes.get_by_id(recipe.id).await.unwrap().name, "Soup");
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let id = Uuid::new_v4();

        assert!(matches!(ctx.state.recipes.get_by_id(id).await, Err(ApiError::NotFound(_))));
        assert!(matches!(
            ctx.state.recipes.update(id, &json!({}), &alice).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(ctx.state.recipes.delete(id, &alice).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_owned_checks_existence_before_ownership() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let (bob, _) = ctx.create_user("bob@example.com").await;
        let recipe = ctx.state.recipes.create(&soup(), &alice).await.unwrap();

        assert_eq!(ctx.state.recipes.find_owned(recipe.id, &alice).await.unwrap(), recipe);
        assert!(matches!(
            ctx.state.recipes.find_owned(recipe.id, &bob).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.state.recipes.find_owned(Uuid::new_v4(), &bob).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let ctx = TestContext::new();
        let (alice, _) = ctx.create_user("alice@example.com").await;
        let recipe = ctx.state.recipes.create(&soup(), &alice).await.unwrap();

        ctx.state.recipes.delete(recipe.id, &alice).await.unwrap();
        assert!(matches!(
            ctx.state.recipes.delete(recipe.id, &alice).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
