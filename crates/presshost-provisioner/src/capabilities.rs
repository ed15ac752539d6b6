use std::path::Path;

use async_trait::async_trait;

use presshost_entities::sites;

use crate::error::ProvisionError;

/// Creates the backing-store database and credentials for one site
#[async_trait]
pub trait DatabaseProvisioner: Send + Sync {
    async fn provision(
        &self,
        db_name: &str,
        db_user: &str,
        db_password: &str,
    ) -> Result<(), ProvisionError>;
}

/// Publishes a web-server virtual host mapping a domain to a site directory
#[async_trait]
pub trait WebServerConfigurer: Send + Sync {
    async fn configure(&self, domain: &str, site_dir: &Path) -> Result<(), ProvisionError>;
}

/// Downloads and installs the application into a site directory
#[async_trait]
pub trait AppInstaller: Send + Sync {
    async fn install(&self, site: &sites::Model, site_dir: &Path) -> Result<(), ProvisionError>;
}
