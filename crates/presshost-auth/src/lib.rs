//! Authentication for the PressHost API: password accounts, bearer tokens,
//! and the axum middleware/extractor pair the other route crates build on.

pub mod auth_service;
pub mod context;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod types;

pub use auth_service::{AuthError, AuthService};
pub use context::AuthContext;
pub use extract::RequireAuth;
pub use handlers::{configure_routes, AuthApiDoc, AuthState};
pub use middleware::auth_middleware;
