// handlers/protected/recipes/collection.rs - GET and POST /recipes

use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};

use super::utils::{RecipeBody, RecipeEnvelope, RecipesEnvelope};

/// GET /recipes - Recipes owned by the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<RecipesEnvelope> {
    let recipes = state.recipes.list(&caller).await?;
    Ok(ApiResponse::success(RecipesEnvelope { recipes }))
}

/// POST /recipes - Create a recipe owned by the caller
///
/// Input: `{"recipe": {"name", "ingredients", "instructions", "calories", "type", "cuisine", "favorite"}}`
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(body): ApiJson<RecipeBody>,
) -> ApiResult<RecipeEnvelope> {
    let recipe = state.recipes.create(&body.recipe, &caller).await?;
    Ok(ApiResponse::created(RecipeEnvelope { recipe }))
}
