use thiserror::Error;

use presshost_entities::InvalidTransition;

use crate::command::CommandError;

/// Failure of any provisioning step. The string representation is what
/// lands in the site's error log, so each variant leads with the failing
/// step's name and carries the external tool's diagnostic output verbatim.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Database creation failed: {0}")]
    Database(String),

    #[error("Web server configuration failed: {0}")]
    WebServer(String),

    #[error("Application install failed: {0}")]
    Install(String),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Command(#[from] CommandError),

    #[error("{0}")]
    Status(#[from] InvalidTransition),

    #[error("Database error: {0}")]
    Persistence(#[from] sea_orm::DbErr),
}
