// handlers/protected/recipes/record.rs - GET, PATCH and DELETE /recipes/:id

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, NonBlankJson};

use super::utils::{parse_recipe_id, RecipeBody, RecipeEnvelope};

/// GET /recipes/:id - Any authenticated caller may read a recipe by id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RecipeEnvelope> {
    let id = parse_recipe_id(&id)?;
    let recipe = state.recipes.get_by_id(id).await?;
    Ok(ApiResponse::success(RecipeEnvelope { recipe }))
}

/// PATCH /recipes/:id - Partial update; blank strings leave fields unchanged
///
/// A missing recipe (404) or someone else's recipe (403) is reported before
/// any problem with the body.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<NonBlankJson<RecipeBody>, ApiError>,
) -> ApiResult<()> {
    let id = parse_recipe_id(&id)?;
    let recipe = state.recipes.find_owned(id, &caller).await?;
    let NonBlankJson(body) = body?;
    state.recipes.apply_patch(&recipe, &body.recipe).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /recipes/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_recipe_id(&id)?;
    state.recipes.delete(id, &caller).await?;
    Ok(ApiResponse::no_content())
}
