// handlers/mod.rs - Handlers grouped by security tier
//
// Public (no token) → Protected (bearer token resolved by `bearer_auth_middleware`)
pub mod public;    // /sign-up, /sign-in
pub mod protected; // /recipes/*, /change-password, /sign-out
