// handlers/public/mod.rs - Endpoints that do not require a bearer token
//
// These are the token acquisition routes; everything they read comes from the
// request body, so they validate all of it.
pub mod auth;
