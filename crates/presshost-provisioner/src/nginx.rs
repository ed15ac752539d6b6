use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::capabilities::WebServerConfigurer;
use crate::command::CommandRunner;
use crate::error::ProvisionError;

/// WebServerConfigurer for nginx using the Debian sites-available /
/// sites-enabled layout. Publishing a vhost writes the rendered config,
/// links it into the enabled set, validates the full configuration and
/// reloads the server.
pub struct NginxConfigurer {
    runner: Arc<dyn CommandRunner>,
    config_dir: PathBuf,
    php_fpm_socket: String,
}

impl NginxConfigurer {
    pub fn new(runner: Arc<dyn CommandRunner>, config_dir: PathBuf, php_fpm_socket: String) -> Self {
        Self {
            runner,
            config_dir,
            php_fpm_socket,
        }
    }

    /// Render the vhost for a domain: canonical and www. server names, a
    /// PHP handler route, and a deny rule for hidden files.
    pub fn render_vhost(&self, domain: &str, site_dir: &Path) -> String {
        format!(
            r#"server {{
    listen 80;
    listen [::]:80;
    server_name {domain} www.{domain};
    root {root};

    index index.php index.html index.htm;

    location / {{
        try_files $uri $uri/ /index.php?$args;
    }}

    location ~ \.php$ {{
        include snippets/fastcgi-php.conf;
        fastcgi_pass {socket};
        fastcgi_param SCRIPT_FILENAME $document_root$fastcgi_script_name;
        include fastcgi_params;
    }}

    location ~ /\.ht {{
        deny all;
    }}
}}
"#,
            domain = domain,
            root = site_dir.display(),
            socket = self.php_fpm_socket,
        )
    }
}

#[async_trait]
impl WebServerConfigurer for NginxConfigurer {
    async fn configure(&self, domain: &str, site_dir: &Path) -> Result<(), ProvisionError> {
        let config_path = self
            .config_dir
            .join("sites-available")
            .join(format!("{}.conf", domain));
        let enabled_dir = self.config_dir.join("sites-enabled");

        debug!("Writing vhost for {} to {}", domain, config_path.display());
        tokio::fs::write(&config_path, self.render_vhost(domain, site_dir)).await?;

        let config_str = config_path.to_string_lossy().to_string();
        let enabled_str = format!("{}/", enabled_dir.display());

        let link = self
            .runner
            .run("ln", &["-sf", &config_str, &enabled_str], None)
            .await?;
        if !link.success() {
            return Err(ProvisionError::WebServer(link.diagnostic().to_string()));
        }

        let check = self.runner.run("nginx", &["-t"], None).await?;
        if !check.success() {
            return Err(ProvisionError::WebServer(check.diagnostic().to_string()));
        }

        let reload = self
            .runner
            .run("systemctl", &["reload", "nginx"], None)
            .await?;
        if !reload.success() {
            return Err(ProvisionError::WebServer(reload.diagnostic().to_string()));
        }

        info!("Published vhost for {}", domain);
        Ok(())
    }
}
