// handlers/protected/recipes/utils.rs - Request and response bodies shared by recipe handlers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::Recipe;
use crate::error::ApiError;

/// Request body shape `{"recipe": {...}}`; a missing key deserializes to `null`
#[derive(Debug, Default, Deserialize)]
pub struct RecipeBody {
    #[serde(default)]
    pub recipe: Value,
}

#[derive(Debug, Serialize)]
pub struct RecipeEnvelope {
    pub recipe: Recipe,
}

#[derive(Debug, Serialize)]
pub struct RecipesEnvelope {
    pub recipes: Vec<Recipe>,
}

/// A path segment that is not a UUID cannot name a stored recipe
pub fn parse_recipe_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("recipe {} not found", raw)))
}
