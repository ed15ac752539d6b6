//! Shared fakes for provisioner tests

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

use presshost_database::DbConnection;
use presshost_entities::{sites, users, SiteStatus};

use crate::command::{CommandError, CommandOutput, CommandRunner};

/// CommandRunner fake that records every invocation and either succeeds
/// with empty output or fails once a configured program is hit.
pub struct ScriptedRunner {
    fail_on: Option<(String, String)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn succeeding() -> Self {
        Self {
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every invocation of `program` with `stderr`, succeed otherwise
    pub fn failing_on(program: &str, stderr: &str) -> Self {
        Self {
            fail_on: Some((program.to_string(), stderr.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every recorded invocation as "program arg1 arg2 ..."
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> Result<CommandOutput, CommandError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", program, args.join(" ")).trim().to_string());

        match &self.fail_on {
            Some((failing_program, stderr)) if failing_program == program => Ok(CommandOutput {
                status_code: Some(1),
                stdout: String::new(),
                stderr: stderr.clone(),
            }),
            _ => Ok(CommandOutput {
                status_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}

/// Site model for tests that never touches a database
pub fn test_site() -> sites::Model {
    sites::Model {
        id: 1,
        domain: "test.example.com".to_string(),
        title: "Test Site".to_string(),
        admin_email: "admin@test.example.com".to_string(),
        admin_user: "admin".to_string(),
        db_name: "cp_test_example_com".to_string(),
        db_user: "cp_test_example_com".to_string(),
        db_password: "testdbpass123".to_string(),
        status: SiteStatus::Pending,
        user_id: 1,
        installation_log: None,
        error_log: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Insert a user and a pending site for that user
pub async fn seed_pending_site(db: &DbConnection, domain: &str) -> sites::Model {
    let user = users::ActiveModel {
        email: Set(format!("owner@{}", domain)),
        username: Set(format!("owner-{}", domain)),
        password_hash: Set("x".to_string()),
        is_active: Set(true),
        ..Default::default()
    };
    let user = user.insert(db).await.unwrap();

    let site = sites::ActiveModel {
        domain: Set(domain.to_string()),
        title: Set("Test Site".to_string()),
        admin_email: Set(format!("admin@{}", domain)),
        admin_user: Set("admin".to_string()),
        db_name: Set(presshost_core::db_identifier(domain)),
        db_user: Set(presshost_core::db_identifier(domain)),
        db_password: Set("testdbpass123".to_string()),
        status: Set(SiteStatus::Pending),
        user_id: Set(user.id),
        ..Default::default()
    };
    site.insert(db).await.unwrap()
}

/// Lay down what unzip would have produced: a single release directory
/// wrapping the application files.
pub fn seed_extracted_archive(site_dir: &Path) {
    let release_dir = site_dir.join("temp").join("classicpress");
    std::fs::create_dir_all(&release_dir).unwrap();
    std::fs::write(release_dir.join("index.php"), "<?php\n").unwrap();
    std::fs::create_dir_all(release_dir.join("wp-admin")).unwrap();
    std::fs::write(release_dir.join("wp-admin").join("index.php"), "<?php\n").unwrap();
}
