use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use presshost_entities::sites;

use crate::capabilities::AppInstaller;
use crate::command::{CommandOutput, CommandRunner};
use crate::error::ProvisionError;

/// AppInstaller for ClassicPress: downloads the release archive, unpacks
/// it into the site directory, normalizes ownership and permissions,
/// writes wp-config.php and runs the wp-cli one-shot installer.
pub struct ClassicPressInstaller {
    runner: Arc<dyn CommandRunner>,
    archive_url: String,
}

impl ClassicPressInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>, archive_url: String) -> Self {
        Self { runner, archive_url }
    }

    /// Render wp-config.php embedding the site's database credentials
    pub fn render_wp_config(site: &sites::Model) -> String {
        format!(
            r#"<?php
define('DB_NAME', '{db_name}');
define('DB_USER', '{db_user}');
define('DB_PASSWORD', '{db_password}');
define('DB_HOST', 'localhost');
define('DB_CHARSET', 'utf8mb4');
define('DB_COLLATE', '');

$table_prefix = 'wp_';

define('WP_DEBUG', false);

if (!defined('ABSPATH')) {{
    define('ABSPATH', dirname(__FILE__) . '/');
}}

require_once(ABSPATH . 'wp-settings.php');
"#,
            db_name = site.db_name,
            db_user = site.db_user,
            db_password = site.db_password,
        )
    }

    fn ensure_success(output: CommandOutput) -> Result<(), ProvisionError> {
        if output.success() {
            Ok(())
        } else {
            Err(ProvisionError::Install(output.diagnostic().to_string()))
        }
    }

    /// Move the archive contents up out of the single release directory
    /// that the zip wraps everything in.
    fn promote_extracted(temp_dir: &Path, site_dir: &Path) -> Result<(), ProvisionError> {
        for entry in std::fs::read_dir(temp_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                for item in std::fs::read_dir(entry.path())? {
                    let item = item?;
                    std::fs::rename(item.path(), site_dir.join(item.file_name()))?;
                }
            } else {
                std::fs::rename(entry.path(), site_dir.join(entry.file_name()))?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AppInstaller for ClassicPressInstaller {
    async fn install(&self, site: &sites::Model, site_dir: &Path) -> Result<(), ProvisionError> {
        let site_dir_str = site_dir.to_string_lossy().to_string();
        let zip_path = site_dir.join("latest.zip");
        let zip_str = zip_path.to_string_lossy().to_string();
        let temp_dir = site_dir.join("temp");
        let temp_str = temp_dir.to_string_lossy().to_string();

        // Download and extract the release archive
        debug!("Downloading {} to {}", self.archive_url, zip_str);
        Self::ensure_success(
            self.runner
                .run("wget", &[&self.archive_url, "-O", &zip_str], None)
                .await?,
        )?;

        Self::ensure_success(
            self.runner
                .run("unzip", &["-q", &zip_str, "-d", &temp_str], None)
                .await?,
        )?;

        Self::promote_extracted(&temp_dir, site_dir)?;

        // Best-effort cleanup, matching rm -f semantics
        let _ = std::fs::remove_dir_all(&temp_dir);
        let _ = std::fs::remove_file(&zip_path);

        // Normalize ownership and permissions: dirs 755, files 644
        Self::ensure_success(
            self.runner
                .run("chown", &["-R", "www-data:www-data", &site_dir_str], None)
                .await?,
        )?;
        Self::ensure_success(
            self.runner
                .run(
                    "find",
                    &[&site_dir_str, "-type", "d", "-exec", "chmod", "755", "{}", ";"],
                    None,
                )
                .await?,
        )?;
        Self::ensure_success(
            self.runner
                .run(
                    "find",
                    &[&site_dir_str, "-type", "f", "-exec", "chmod", "644", "{}", ";"],
                    None,
                )
                .await?,
        )?;

        // Write the application configuration with the generated credentials
        tokio::fs::write(site_dir.join("wp-config.php"), Self::render_wp_config(site)).await?;

        // One-shot installer. The generated database password doubles as the
        // initial admin password, matching the deployed tooling.
        let url = format!("--url=http://{}", site.domain);
        let title = format!("--title={}", site.title);
        let admin_user = format!("--admin_user={}", site.admin_user);
        let admin_password = format!("--admin_password={}", site.db_password);
        let admin_email = format!("--admin_email={}", site.admin_email);

        Self::ensure_success(
            self.runner
                .run(
                    "sudo",
                    &[
                        "-u",
                        "www-data",
                        "wp",
                        "core",
                        "install",
                        &url,
                        &title,
                        &admin_user,
                        &admin_password,
                        &admin_email,
                        "--skip-email",
                    ],
                    Some(site_dir),
                )
                .await?,
        )?;

        info!("Installed ClassicPress for {}", site.domain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_extracted_archive, test_site, ScriptedRunner};

    #[tokio::test]
    async fn test_install_runs_expected_commands() {
        let temp = tempfile::tempdir().unwrap();
        let site_dir = temp.path().join("test.example.com");
        std::fs::create_dir_all(&site_dir).unwrap();
        seed_extracted_archive(&site_dir);

        let runner = Arc::new(ScriptedRunner::succeeding());
        let installer =
            ClassicPressInstaller::new(runner.clone(), "https://www.classicpress.net/latest.zip".to_string());
        let site = test_site();

        installer.install(&site, &site_dir).await.unwrap();

        let calls = runner.calls();
        assert!(calls[0].starts_with("wget https://www.classicpress.net/latest.zip"));
        assert!(calls[1].starts_with("unzip -q"));
        assert!(calls.iter().any(|c| c.contains("chown -R www-data:www-data")));
        assert!(calls.iter().any(|c| c.contains("chmod 755")));
        assert!(calls.iter().any(|c| c.contains("chmod 644")));
        assert!(calls
            .iter()
            .any(|c| c.contains("wp core install") && c.contains("--skip-email")));

        // The archive payload was promoted into the site root
        assert!(site_dir.join("index.php").exists());
        assert!(!site_dir.join("temp").exists());
    }

    #[tokio::test]
    async fn test_install_writes_wp_config_with_credentials() {
        let temp = tempfile::tempdir().unwrap();
        let site_dir = temp.path().join("test.example.com");
        std::fs::create_dir_all(&site_dir).unwrap();
        seed_extracted_archive(&site_dir);

        let runner = Arc::new(ScriptedRunner::succeeding());
        let installer = ClassicPressInstaller::new(runner, "https://example.com/latest.zip".to_string());
        let site = test_site();

        installer.install(&site, &site_dir).await.unwrap();

        let config = std::fs::read_to_string(site_dir.join("wp-config.php")).unwrap();
        assert!(config.contains(&format!("define('DB_NAME', '{}');", site.db_name)));
        assert!(config.contains(&format!("define('DB_USER', '{}');", site.db_user)));
        assert!(config.contains(&format!("define('DB_PASSWORD', '{}');", site.db_password)));
    }

    #[tokio::test]
    async fn test_download_failure_aborts() {
        let temp = tempfile::tempdir().unwrap();
        let site_dir = temp.path().join("test.example.com");
        std::fs::create_dir_all(&site_dir).unwrap();

        let runner = Arc::new(ScriptedRunner::failing_on("wget", "Download failed"));
        let installer = ClassicPressInstaller::new(runner.clone(), "https://example.com/latest.zip".to_string());
        let site = test_site();

        let err = installer.install(&site, &site_dir).await.unwrap_err();

        assert!(err.to_string().contains("Download failed"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_wp_cli_failure_aborts() {
        let temp = tempfile::tempdir().unwrap();
        let site_dir = temp.path().join("test.example.com");
        std::fs::create_dir_all(&site_dir).unwrap();
        seed_extracted_archive(&site_dir);

        let runner = Arc::new(ScriptedRunner::failing_on("sudo", "WP-CLI error"));
        let installer = ClassicPressInstaller::new(runner, "https://example.com/latest.zip".to_string());
        let site = test_site();

        let err = installer.install(&site, &site_dir).await.unwrap_err();

        assert!(matches!(err, ProvisionError::Install(_)));
        assert!(err.to_string().contains("WP-CLI error"));
    }
}
