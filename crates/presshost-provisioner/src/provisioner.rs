use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::{ActiveModelTrait, Set};
use tracing::{error, info, warn};

use presshost_config::ServerConfig;
use presshost_database::DbConnection;
use presshost_entities::{sites, SiteStatus};

use crate::capabilities::{AppInstaller, DatabaseProvisioner, WebServerConfigurer};
use crate::command::CommandRunner;
use crate::error::ProvisionError;
use crate::installer::ClassicPressInstaller;
use crate::mysql::MysqlProvisioner;
use crate::nginx::NginxConfigurer;

/// Executes the ordered steps that materialize a site, driving the status
/// state machine as it goes. Each status change is committed on its own:
/// the record reads `installing` while a run is in flight, and a crash
/// mid-run leaves it there.
pub struct SiteProvisioner {
    db: Arc<DbConnection>,
    sites_root: PathBuf,
    database: Arc<dyn DatabaseProvisioner>,
    web_server: Arc<dyn WebServerConfigurer>,
    installer: Arc<dyn AppInstaller>,
}

impl SiteProvisioner {
    pub fn new(
        db: Arc<DbConnection>,
        sites_root: PathBuf,
        database: Arc<dyn DatabaseProvisioner>,
        web_server: Arc<dyn WebServerConfigurer>,
        installer: Arc<dyn AppInstaller>,
    ) -> Self {
        Self {
            db,
            sites_root,
            database,
            web_server,
            installer,
        }
    }

    /// Wire the stock capability set (MySQL, nginx, ClassicPress) from the
    /// server configuration.
    pub fn from_config(
        db: Arc<DbConnection>,
        config: &ServerConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self::new(
            db,
            config.sites_root.clone(),
            Arc::new(MysqlProvisioner::new(runner.clone())),
            Arc::new(NginxConfigurer::new(
                runner.clone(),
                config.nginx_config_dir.clone(),
                config.php_fpm_socket.clone(),
            )),
            Arc::new(ClassicPressInstaller::new(
                runner,
                config.archive_url.clone(),
            )),
        )
    }

    /// Run the full provisioning sequence for a site. Returns whether the
    /// run succeeded; all error detail goes into the record's error log,
    /// nothing is propagated to the caller.
    pub async fn provision_site(&self, site: sites::Model) -> bool {
        let domain = site.domain.clone();

        let site = match self.persist_status(site, SiteStatus::Installing, None, None).await {
            Ok(site) => site,
            Err(e) => {
                warn!("Not provisioning {}: {}", domain, e);
                return false;
            }
        };

        match self.run_steps(&site).await {
            Ok(installation_log) => {
                info!("Provisioning completed for {}", domain);
                self.persist_status(site, SiteStatus::Active, Some(installation_log), None)
                    .await
                    .map_err(|e| error!("Failed to mark {} active: {}", domain, e))
                    .is_ok()
            }
            Err(e) => {
                error!("Error creating site {}: {}", domain, e);
                let _ = self
                    .persist_status(site, SiteStatus::Failed, None, Some(e.to_string()))
                    .await
                    .map_err(|update_err| {
                        error!("Failed to mark {} failed: {}", domain, update_err)
                    });
                false
            }
        }
    }

    /// The ordered side-effecting steps, each a precondition for the next.
    /// The first failure aborts the run; completed steps are not rolled
    /// back.
    async fn run_steps(&self, site: &sites::Model) -> Result<String, ProvisionError> {
        let mut log = Vec::new();

        let site_dir = self.sites_root.join(&site.domain);
        tokio::fs::create_dir_all(&site_dir).await?;
        log.push(format!("Created site directory at {}", site_dir.display()));

        self.database
            .provision(&site.db_name, &site.db_user, &site.db_password)
            .await?;
        log.push(format!("Provisioned database {}", site.db_name));

        self.web_server.configure(&site.domain, &site_dir).await?;
        log.push(format!("Published virtual host for {}", site.domain));

        self.installer.install(site, &site_dir).await?;
        log.push("Installed ClassicPress".to_string());

        Ok(log.join("\n"))
    }

    /// Validate and commit one status transition, with optional diagnostic
    /// fields. Returns the updated model.
    async fn persist_status(
        &self,
        site: sites::Model,
        next: SiteStatus,
        installation_log: Option<String>,
        error_log: Option<String>,
    ) -> Result<sites::Model, ProvisionError> {
        let status = site.status.transition_to(next)?;

        let mut active: sites::ActiveModel = site.into();
        active.status = Set(status);
        if let Some(log) = installation_log {
            active.installation_log = Set(Some(log));
        }
        if let Some(log) = error_log {
            active.error_log = Set(Some(log));
        }

        Ok(active.update(self.db.as_ref()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_extracted_archive, seed_pending_site, ScriptedRunner};
    use presshost_database::test_utils::TestDatabase;
    use sea_orm::EntityTrait;

    struct Fixture {
        _sites_root: tempfile::TempDir,
        _nginx_dir: tempfile::TempDir,
        db: TestDatabase,
        provisioner: SiteProvisioner,
    }

    async fn fixture(runner: Arc<ScriptedRunner>) -> Fixture {
        let sites_root = tempfile::tempdir().unwrap();
        let nginx_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(nginx_dir.path().join("sites-available")).unwrap();
        std::fs::create_dir_all(nginx_dir.path().join("sites-enabled")).unwrap();

        let db = TestDatabase::with_migrations().await.unwrap();

        let provisioner = SiteProvisioner::new(
            db.connection_arc(),
            sites_root.path().to_path_buf(),
            Arc::new(MysqlProvisioner::new(runner.clone())),
            Arc::new(NginxConfigurer::new(
                runner.clone(),
                nginx_dir.path().to_path_buf(),
                "unix:/var/run/php/php8.1-fpm.sock".to_string(),
            )),
            Arc::new(ClassicPressInstaller::new(
                runner,
                "https://www.classicpress.net/latest.zip".to_string(),
            )),
        );

        Fixture {
            _sites_root: sites_root,
            _nginx_dir: nginx_dir,
            db,
            provisioner,
        }
    }

    #[tokio::test]
    async fn test_successful_run_ends_active_with_log() {
        let runner = Arc::new(ScriptedRunner::succeeding());
        let fx = fixture(runner).await;
        let site = seed_pending_site(fx.db.db.as_ref(), "foo.example.com").await;

        // Pre-seed what unzip would have extracted
        let site_dir = fx.provisioner.sites_root.join(&site.domain);
        std::fs::create_dir_all(&site_dir).unwrap();
        seed_extracted_archive(&site_dir);

        assert!(fx.provisioner.provision_site(site.clone()).await);

        let reloaded = sites::Entity::find_by_id(site.id)
            .one(fx.db.db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SiteStatus::Active);
        assert!(reloaded.error_log.is_none());
        let log = reloaded.installation_log.unwrap();
        assert!(log.contains("Provisioned database"));
        assert!(log.contains("Installed ClassicPress"));
    }

    #[tokio::test]
    async fn test_database_failure_ends_failed_with_error_log() {
        let runner = Arc::new(ScriptedRunner::failing_on("mysql", "Database error"));
        let fx = fixture(runner).await;
        let site = seed_pending_site(fx.db.db.as_ref(), "foo.example.com").await;

        assert!(!fx.provisioner.provision_site(site.clone()).await);

        let reloaded = sites::Entity::find_by_id(site.id)
            .one(fx.db.db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SiteStatus::Failed);
        assert!(reloaded.error_log.unwrap().contains("Database error"));
        assert!(reloaded.installation_log.is_none());
    }

    #[tokio::test]
    async fn test_web_server_failure_captures_sub_step_output() {
        let runner = Arc::new(ScriptedRunner::failing_on("nginx", "config test failed"));
        let fx = fixture(runner).await;
        let site = seed_pending_site(fx.db.db.as_ref(), "bar.example.com").await;

        assert!(!fx.provisioner.provision_site(site.clone()).await);

        let reloaded = sites::Entity::find_by_id(site.id)
            .one(fx.db.db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SiteStatus::Failed);
        assert!(reloaded.error_log.unwrap().contains("config test failed"));
    }

    #[tokio::test]
    async fn test_refuses_site_not_in_pending() {
        let runner = Arc::new(ScriptedRunner::succeeding());
        let fx = fixture(runner.clone()).await;
        let site = seed_pending_site(fx.db.db.as_ref(), "baz.example.com").await;

        // Move the site out of pending first
        let mut active: sites::ActiveModel = site.clone().into();
        active.status = Set(SiteStatus::Deleted);
        let deleted = active.update(fx.db.db.as_ref()).await.unwrap();

        assert!(!fx.provisioner.provision_site(deleted).await);
        // No side-effecting command ran
        assert!(runner.calls().is_empty());
    }
}
