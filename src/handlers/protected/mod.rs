// handlers/protected/mod.rs - Endpoints behind `bearer_auth_middleware`
//
// Every handler here can rely on an `Extension<AuthUser>` being present.
pub mod auth;    // Session and password management for the caller
pub mod recipes; // Owner-scoped recipe CRUD
