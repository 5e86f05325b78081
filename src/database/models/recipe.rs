use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::FieldErrors;

/// A stored recipe as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub calories: i32,
    #[serde(rename = "type")]
    pub recipe_type: String,
    pub cuisine: String,
    pub favorite: bool,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for an insert; the owner always comes from the caller
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub calories: i32,
    pub recipe_type: String,
    pub cuisine: String,
    pub favorite: bool,
    pub owner: Uuid,
}

/// Fields to overwrite on update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub calories: Option<i32>,
    pub recipe_type: Option<String>,
    pub cuisine: Option<String>,
    pub favorite: Option<bool>,
}

impl NewRecipe {
    /// Check every required field for presence and JSON type.
    ///
    /// All problems are collected so the client sees them in one response.
    pub fn from_payload(payload: &Map<String, Value>, owner: Uuid) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut fields = FieldReader { payload, errors: &mut errors, required: true };

        let name = fields.string("name");
        let ingredients = fields.string("ingredients");
        let instructions = fields.string("instructions");
        let calories = fields.integer("calories");
        let recipe_type = fields.string("type");
        let cuisine = fields.string("cuisine");
        let favorite = fields.boolean("favorite");

        match (name, ingredients, instructions, calories, recipe_type, cuisine, favorite) {
            (
                Some(name),
                Some(ingredients),
                Some(instructions),
                Some(calories),
                Some(recipe_type),
                Some(cuisine),
                Some(favorite),
            ) if errors.is_empty() => Ok(Self {
                name,
                ingredients,
                instructions,
                calories,
                recipe_type,
                cuisine,
                favorite,
                owner,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_recipe(self, id: Uuid, now: DateTime<Utc>) -> Recipe {
        Recipe {
            id,
            name: self.name,
            ingredients: self.ingredients,
            instructions: self.instructions,
            calories: self.calories,
            recipe_type: self.recipe_type,
            cuisine: self.cuisine,
            favorite: self.favorite,
            owner: self.owner,
            created_at: now,
            updated_at: now,
        }
    }
}

impl RecipePatch {
    /// Read the updatable fields that are present. Unknown keys and `owner` are ignored.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut fields = FieldReader { payload, errors: &mut errors, required: false };

        let patch = Self {
            name: fields.string("name"),
            ingredients: fields.string("ingredients"),
            instructions: fields.string("instructions"),
            calories: fields.integer("calories"),
            recipe_type: fields.string("type"),
            cuisine: fields.string("cuisine"),
            favorite: fields.boolean("favorite"),
        };

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, recipe: &mut Recipe) {
        if let Some(v) = self.name {
            recipe.name = v;
        }
        if let Some(v) = self.ingredients {
            recipe.ingredients = v;
        }
        if let Some(v) = self.instructions {
            recipe.instructions = v;
        }
        if let Some(v) = self.calories {
            recipe.calories = v;
        }
        if let Some(v) = self.recipe_type {
            recipe.recipe_type = v;
        }
        if let Some(v) = self.cuisine {
            recipe.cuisine = v;
        }
        if let Some(v) = self.favorite {
            recipe.favorite = v;
        }
    }
}

struct FieldReader<'a> {
    payload: &'a Map<String, Value>,
    errors: &'a mut FieldErrors,
    required: bool,
}

impl<'a> FieldReader<'a> {
    fn present(&mut self, field: &str) -> Option<&'a Value> {
        let payload = self.payload;
        match payload.get(field) {
            Some(Value::Null) | None => {
                if self.required {
                    self.errors.insert(field.to_string(), "is required".to_string());
                }
                None
            }
            Some(v) => Some(v),
        }
    }

    fn string(&mut self, field: &str) -> Option<String> {
        let required = self.required;
        match self.present(field)? {
            Value::String(s) if required && s.is_empty() => {
                self.errors.insert(field.to_string(), "is required".to_string());
                None
            }
            // A blank string on update means "leave as is"
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors.insert(field.to_string(), "must be a string".to_string());
                None
            }
        }
    }

    fn integer(&mut self, field: &str) -> Option<i32> {
        let value = self.present(field)?;
        match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.errors.insert(field.to_string(), "must be an integer".to_string());
                None
            }
        }
    }

    fn boolean(&mut self, field: &str) -> Option<bool> {
        match self.present(field)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.errors.insert(field.to_string(), "must be a boolean".to_string());
                None
            }
        }
    }
}
