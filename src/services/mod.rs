pub mod ownership;
pub mod recipe_service;
pub mod user_service;

pub use ownership::require_ownership;
pub use recipe_service::RecipeService;
pub use user_service::{Credentials, PasswordChange, UserService};
