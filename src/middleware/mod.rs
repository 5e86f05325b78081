pub mod auth;
pub mod blank_fields;
pub mod json;
pub mod response;

pub use auth::{bearer_auth_middleware, AuthUser};
pub use blank_fields::{remove_blank_fields, NonBlankJson};
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};
