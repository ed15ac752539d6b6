use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use presshost_core::problemdetails;
use presshost_core::problemdetails::Problem;

use crate::context::AuthContext;

/// Extractor that rejects requests without an authenticated caller
pub struct RequireAuth(pub AuthContext);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                problemdetails::new(StatusCode::UNAUTHORIZED)
                    .with_type("https://presshost.dev/probs/authentication-required")
                    .with_title("Authentication Required")
                    .with_detail("Could not validate credentials")
            })?;

        Ok(RequireAuth(context))
    }
}
