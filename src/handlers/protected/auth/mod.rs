// handlers/protected/auth/mod.rs - Session management for the signed-in caller
pub mod session;

pub use session::{change_password, sign_out};
