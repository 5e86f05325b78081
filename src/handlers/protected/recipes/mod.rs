// handlers/protected/recipes/mod.rs - Owner-scoped recipe CRUD
pub mod collection;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::create;
pub use collection::list;

pub use record::destroy;
pub use record::show;
pub use record::update;
