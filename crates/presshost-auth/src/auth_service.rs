use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::RngCore;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use presshost_database::DbConnection;
use presshost_entities::{api_tokens, users};

/// Issued bearer tokens carry this prefix so the middleware can tell them
/// apart from anything else that lands in an Authorization header.
pub const TOKEN_PREFIX: &str = "ph_";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("User account is inactive")]
    InactiveUser,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct AuthService {
    db: Arc<DbConnection>,
}

impl AuthService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    /// Register a new account. Email and username are both unique.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<users::Model, AuthError> {
        let existing_email = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        if existing_email.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let existing_username = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        if existing_username.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(password)?;

        let user = users::ActiveModel {
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            is_active: Set(true),
            ..Default::default()
        };
        let user = user.insert(self.db.as_ref()).await?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Verify credentials and issue a fresh bearer token.
    /// The identifier may be the account email or the username.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, AuthError> {
        let user = users::Entity::find()
            .filter(
                sea_orm::Condition::any()
                    .add(users::Column::Email.eq(identifier))
                    .add(users::Column::Username.eq(identifier)),
            )
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            warn!("Failed login attempt for {}", identifier);
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        let token = generate_token();
        let record = api_tokens::ActiveModel {
            user_id: Set(user.id),
            token_hash: Set(hash_token(&token)),
            ..Default::default()
        };
        record.insert(self.db.as_ref()).await?;

        debug!("Issued token for user {}", user.id);
        Ok(token)
    }

    /// Resolve a bearer token to its user, or fail with InvalidToken.
    pub async fn validate_token(&self, token: &str) -> Result<users::Model, AuthError> {
        if !token.starts_with(TOKEN_PREFIX) {
            return Err(AuthError::InvalidToken);
        }

        let record = api_tokens::Entity::find()
            .filter(api_tokens::Column::TokenHash.eq(hash_token(token)))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = users::Entity::find_by_id(record.user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        Ok(user)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn generate_token() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", TOKEN_PREFIX, hex::encode(bytes))
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
