use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::debug;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use presshost_core::problemdetails;
use presshost_core::problemdetails::Problem;

use crate::auth_service::{AuthError, AuthService};
use crate::extract::RequireAuth;
use crate::types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};

pub struct AuthState {
    pub auth_service: Arc<AuthService>,
}

pub fn configure_routes() -> Router<Arc<AuthState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(login))
        .route("/auth/me", get(me))
}

#[derive(OpenApi)]
#[openapi(
    paths(register, login, me),
    components(schemas(RegisterRequest, LoginRequest, TokenResponse, UserResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration and token issuance")
    )
)]
pub struct AuthApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

impl From<AuthError> for Problem {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken | AuthError::UsernameTaken => {
                problemdetails::new(StatusCode::BAD_REQUEST)
                    .with_title("Registration Failed")
                    .with_detail(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::InactiveUser => {
                problemdetails::new(StatusCode::UNAUTHORIZED)
                    .with_title("Authentication Failed")
                    .with_detail(err.to_string())
            }
            AuthError::InvalidToken => problemdetails::new(StatusCode::UNAUTHORIZED)
                .with_title("Authentication Failed")
                .with_detail("Could not validate credentials"),
            AuthError::PasswordHash(_) | AuthError::Database(_) => {
                problemdetails::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_title("Internal Server Error")
                    .with_detail(err.to_string())
            }
        }
    }
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Email or username already taken"),
    )
)]
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Problem> {
    let user = state
        .auth_service
        .register(&request.email, &request.username, &request.password)
        .await
        .map_err(Problem::from)?;

    Ok(Json(UserResponse::map_from_user(user)))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect email or password"),
    )
)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, Problem> {
    let token = state
        .auth_service
        .login(&request.username, &request.password)
        .await
        .map_err(Problem::from)?;

    debug!("Issued bearer token for {}", request.username);
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
    Json(UserResponse::map_from_user(auth.user))
}
