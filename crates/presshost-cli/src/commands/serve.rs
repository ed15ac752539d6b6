use std::sync::Arc;

use axum::{routing::get, Json, Router};
use clap::Args;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use presshost_auth::{auth_middleware, AuthApiDoc, AuthService, AuthState};
use presshost_core::JobQueue;
use presshost_provisioner::{
    CommandRunner, JobProcessorService, SiteProvisioner, SystemCommandRunner,
};
use presshost_queue::QueueService;
use presshost_sites::{AppState, SiteService, SitesApiDoc};

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "PRESSHOST_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "PRESSHOST_DATABASE_URL")]
    pub database_url: String,
}

impl ServeCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let config = Arc::new(presshost_config::ServerConfig::new(
            self.address.clone(),
            self.database_url.clone(),
        )?);

        info!("Initializing database connection...");
        let db = presshost_database::establish_connection(&config.database_url).await?;

        // Job channel: API handlers hold the sender, the worker the receiver
        let (queue_service, job_receiver) = QueueService::create_channel(config.queue_buffer);
        let queue: Arc<dyn JobQueue> = Arc::new(queue_service);

        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);
        let provisioner = Arc::new(SiteProvisioner::from_config(db.clone(), &config, runner));

        let mut processor =
            JobProcessorService::new(db.clone(), Box::new(job_receiver), provisioner);
        tokio::spawn(async move {
            if let Err(e) = processor.run().await {
                error!("Job processor stopped: {}", e);
            }
        });

        let auth_service = Arc::new(AuthService::new(db.clone()));
        let auth_state = Arc::new(AuthState { auth_service });

        let site_service = Arc::new(SiteService::new(
            db.clone(),
            queue,
            config.max_sites_per_user,
        ));
        let sites_state = Arc::new(AppState { site_service });

        let api = Router::new()
            .merge(presshost_auth::configure_routes().with_state(auth_state.clone()))
            .merge(presshost_sites::configure_routes().with_state(sites_state))
            .layer(axum::middleware::from_fn_with_state(
                auth_state.clone(),
                auth_middleware,
            ));

        let mut openapi = AuthApiDoc::openapi();
        openapi.merge(SitesApiDoc::openapi());

        let app = Router::new()
            .route("/", get(root))
            .nest("/api/v1", api)
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
            .layer(CorsLayer::permissive());

        let listener = tokio::net::TcpListener::bind(&config.address).await?;
        info!("Starting PressHost server on {}", config.address);
        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the PressHost API" }))
}
