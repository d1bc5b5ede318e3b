pub mod auth;
pub mod role;

pub use auth::JwtAuth;
pub use role::RequireRole;
