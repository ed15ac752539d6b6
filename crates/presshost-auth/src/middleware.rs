use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
};

use crate::auth_service::TOKEN_PREFIX;
use crate::context::AuthContext;
use crate::handlers::AuthState;

/// Resolve the Authorization header (if any) into an AuthContext request
/// extension. Routes that require a caller use the RequireAuth extractor;
/// unauthenticated requests pass through here untouched so public routes
/// (register, login) keep working.
pub async fn auth_middleware(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    if let Some(token) = extract_bearer_token(&req) {
        if let Ok(user) = state.auth_service.validate_token(&token).await {
            req.extensions_mut().insert(AuthContext::new(user));
        }
    }

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Option<String> {
    let auth_header = req.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    if token.starts_with(TOKEN_PREFIX) {
        Some(token.to_string())
    } else {
        None
    }
}
