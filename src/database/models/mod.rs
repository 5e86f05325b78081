pub mod recipe;
pub mod user;

pub use recipe::{NewRecipe, Recipe, RecipePatch};
pub use user::{PublicUser, User};
