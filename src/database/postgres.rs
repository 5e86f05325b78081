use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{NewRecipe, Recipe, RecipePatch, User};
use super::store::{RecipeStore, UserStore};

const RECIPE_COLUMNS: &str = "id, name, ingredients, instructions, calories, recipe_type, \
                              cuisine, favorite, owner, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, hashed_password, token_digest, created_at, updated_at";

#[derive(Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Recipe>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE owner = $1 ORDER BY created_at, id",
            RECIPE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Recipe>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        let sql = format!("SELECT {} FROM recipes WHERE id = $1", RECIPE_COLUMNS);
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, DatabaseError> {
        let sql = format!(
            "INSERT INTO recipes \
             (id, name, ingredients, instructions, calories, recipe_type, cuisine, favorite, owner) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            RECIPE_COLUMNS
        );
        sqlx::query_as::<_, Recipe>(&sql)
            .bind(Uuid::new_v4())
            .bind(&recipe.name)
            .bind(&recipe.ingredients)
            .bind(&recipe.instructions)
            .bind(recipe.calories)
            .bind(&recipe.recipe_type)
            .bind(&recipe.cuisine)
            .bind(recipe.favorite)
            .bind(recipe.owner)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "recipe"))
    }

    async fn update(&self, id: Uuid, patch: RecipePatch) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE recipes SET \
                name = COALESCE($2, name), \
                ingredients = COALESCE($3, ingredients), \
                instructions = COALESCE($4, instructions), \
                calories = COALESCE($5, calories), \
                recipe_type = COALESCE($6, recipe_type), \
                cuisine = COALESCE($7, cuisine), \
                favorite = COALESCE($8, favorite), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.ingredients)
        .bind(patch.instructions)
        .bind(patch.calories)
        .bind(patch.recipe_type)
        .bind(patch.cuisine)
        .bind(patch.favorite)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("recipe {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("recipe {}", id)));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, email, hashed_password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(hashed_password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "email"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_token_digest(&self, digest: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE token_digest = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(digest)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_token_digest(&self, id: Uuid, digest: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET token_digest = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(digest)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "token"))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET hashed_password = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(hashed_password)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}
