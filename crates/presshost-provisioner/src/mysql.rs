use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::capabilities::DatabaseProvisioner;
use crate::command::CommandRunner;
use crate::error::ProvisionError;

/// DatabaseProvisioner for a local MySQL/MariaDB server administered
/// through the `mysql` client binary.
///
/// db_name and db_user are derived identifiers (alphanumeric plus
/// underscore) and db_password is generated alphanumeric, so the statement
/// text below cannot carry quoting surprises.
pub struct MysqlProvisioner {
    runner: Arc<dyn CommandRunner>,
}

impl MysqlProvisioner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl DatabaseProvisioner for MysqlProvisioner {
    async fn provision(
        &self,
        db_name: &str,
        db_user: &str,
        db_password: &str,
    ) -> Result<(), ProvisionError> {
        let statements = [
            format!("CREATE DATABASE IF NOT EXISTS {};", db_name),
            format!(
                "CREATE USER IF NOT EXISTS {}@localhost IDENTIFIED BY \"{}\";",
                db_user, db_password
            ),
            format!(
                "GRANT ALL PRIVILEGES ON {}.* TO {}@localhost;",
                db_name, db_user
            ),
            "FLUSH PRIVILEGES;".to_string(),
        ];

        for statement in &statements {
            debug!("mysql: {}", statement);
            let output = self.runner.run("mysql", &["-e", statement], None).await?;
            if !output.success() {
                return Err(ProvisionError::Database(output.diagnostic().to_string()));
            }
        }

        info!("Provisioned database {} for user {}", db_name, db_user);
        Ok(())
    }
}
