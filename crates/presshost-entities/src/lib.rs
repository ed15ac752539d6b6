//! SeaORM entity models for the PressHost platform

pub mod api_tokens;
pub mod sites;
pub mod types;
pub mod users;

pub use types::{InvalidTransition, SiteStatus};

pub mod prelude {
    pub use super::api_tokens::Entity as ApiTokens;
    pub use super::sites::Entity as Sites;
    pub use super::users::Entity as Users;
}
