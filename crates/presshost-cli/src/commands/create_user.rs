use clap::Args;
use tracing::info;

use presshost_auth::AuthService;

#[derive(Args)]
pub struct CreateUserCommand {
    /// Database connection URL
    #[arg(long, env = "PRESSHOST_DATABASE_URL")]
    pub database_url: String,

    /// Email address for the account
    #[arg(long)]
    pub email: String,

    /// Username for the account
    #[arg(long)]
    pub username: String,

    /// Password for the account
    #[arg(long, env = "PRESSHOST_NEW_USER_PASSWORD")]
    pub password: String,
}

impl CreateUserCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let db = presshost_database::establish_connection(&self.database_url).await?;
        let auth_service = AuthService::new(db);

        let user = auth_service
            .register(&self.email, &self.username, &self.password)
            .await?;

        info!("Created user {} with id {}", user.username, user.id);
        println!("Created user {} ({})", user.username, user.id);
        Ok(())
    }
}
