use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment, StoreBackend};
use crate::database::{
    DatabaseError, DatabaseManager, MemoryStore, PgRecipeStore, PgUserStore, RecipeStore, UserStore,
};
use crate::handlers;
use crate::middleware::bearer_auth_middleware;
use crate::services::{RecipeService, UserService};

/// Shared per-request state: the two services and their stores
#[derive(Clone)]
pub struct AppState {
    pub recipes: RecipeService,
    pub users: UserService,
}

impl AppState {
    pub fn new(recipes: Arc<dyn RecipeStore>, users: Arc<dyn UserStore>, config: &AppConfig) -> Self {
        Self {
            recipes: RecipeService::new(recipes),
            users: UserService::new(users, &config.security),
        }
    }

    pub fn with_memory_store(store: MemoryStore, config: &AppConfig) -> Self {
        Self::new(Arc::new(store.clone()), Arc::new(store), config)
    }

    /// Build state for the backend selected in config
    pub async fn from_config(config: &AppConfig) -> Result<Self, DatabaseError> {
        match config.server.store {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Ok(Self::with_memory_store(MemoryStore::new(), config))
            }
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                Ok(Self::new(
                    Arc::new(PgRecipeStore::new(pool.clone())),
                    Arc::new(PgUserStore::new(pool)),
                    config,
                ))
            }
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let protected = Router::new()
        .merge(recipe_routes())
        .merge(auth_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), bearer_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Bearer token required
        .merge(protected)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/change-password", patch(auth::change_password))
        .route("/sign-out", delete(auth::sign_out))
}

fn recipe_routes() -> Router<AppState> {
    use handlers::protected::recipes;

    Router::new()
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/:id",
            get(recipes::show).patch(recipes::update).delete(recipes::destroy),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "recipe-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "POST /sign-up, POST /sign-in (public); PATCH /change-password, DELETE /sign-out (token)",
            "recipes": "GET|POST /recipes, GET|PATCH|DELETE /recipes/:id (token)",
            "health": "GET /health (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.recipes.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
