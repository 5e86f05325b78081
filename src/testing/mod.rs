use crate::app::AppState;
use crate::auth::{generate_token, token_digest};
use crate::config::AppConfig;
use crate::database::{MemoryStore, UserStore};
use crate::middleware::AuthUser;

/// Memory-backed application state for unit tests
pub struct TestContext {
    pub store: MemoryStore,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::with_memory_store(store.clone(), &AppConfig::development());
        Self { store, state }
    }

    /// Insert a user directly with a live token, skipping password hashing
    pub async fn create_user(&self, email: &str) -> (AuthUser, String) {
        let user = UserStore::insert(&self.store, email, "unused-hash")
            .await
            .expect("insert test user");
        let token = generate_token();
        self.store
            .set_token_digest(user.id, &token_digest(&token))
            .await
            .expect("store test token");
        (AuthUser::from(&user), token)
    }
}
