use presshost_entities::users;
use serde::{Deserialize, Serialize};

/// Authenticated caller attached to a request by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user: users::Model,
}

impl AuthContext {
    pub fn new(user: users::Model) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> i32 {
        self.user.id
    }
}
