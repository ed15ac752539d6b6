use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use tracing::{info, warn};

use presshost_core::{db_identifier, generate_db_password};
use presshost_core::{DeleteSiteJob, Job, JobQueue, ProvisionSiteJob};
use presshost_database::DbConnection;
use presshost_entities::{sites, SiteStatus};

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Maximum number of sites reached")]
    LimitReached,

    #[error("A site with this domain already exists")]
    DomainTaken,

    #[error("Site not found")]
    NotFound,

    #[error("Failed to dispatch job: {0}")]
    Dispatch(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

#[derive(Debug, Clone)]
pub struct CreateSiteParams {
    pub domain: String,
    pub title: String,
    pub admin_email: String,
    pub admin_user: String,
}

#[derive(Clone)]
pub struct SiteService {
    db: Arc<DbConnection>,
    queue: Arc<dyn JobQueue>,
    max_sites_per_user: u64,
}

impl SiteService {
    pub fn new(db: Arc<DbConnection>, queue: Arc<dyn JobQueue>, max_sites_per_user: u64) -> Self {
        Self {
            db,
            queue,
            max_sites_per_user,
        }
    }

    /// Persist a pending site for the user and dispatch provisioning.
    /// Returns immediately with the pending record; the caller observes
    /// progress by polling.
    ///
    /// The count check and the insert are separate statements, so two
    /// concurrent creates can both pass the check.
    pub async fn create_site(
        &self,
        user_id: i32,
        params: CreateSiteParams,
    ) -> Result<sites::Model, SiteError> {
        let owned = sites::Entity::find()
            .filter(sites::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        if owned >= self.max_sites_per_user {
            warn!(
                "User {} at site limit ({}/{})",
                user_id, owned, self.max_sites_per_user
            );
            return Err(SiteError::LimitReached);
        }

        let existing = sites::Entity::find()
            .filter(sites::Column::Domain.eq(&params.domain))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(SiteError::DomainTaken);
        }

        let identifier = db_identifier(&params.domain);
        let site = sites::ActiveModel {
            domain: Set(params.domain.clone()),
            title: Set(params.title),
            admin_email: Set(params.admin_email),
            admin_user: Set(params.admin_user),
            db_name: Set(identifier.clone()),
            db_user: Set(identifier),
            db_password: Set(generate_db_password()),
            status: Set(SiteStatus::Pending),
            user_id: Set(user_id),
            ..Default::default()
        };
        let site = site.insert(self.db.as_ref()).await?;

        self.queue
            .send(Job::ProvisionSite(ProvisionSiteJob { site_id: site.id }))
            .await
            .map_err(|e| SiteError::Dispatch(e.to_string()))?;

        info!("Created site {} ({}) for user {}", site.domain, site.id, user_id);
        Ok(site)
    }

    /// All sites owned by the user, oldest first
    pub async fn list_sites(&self, user_id: i32) -> Result<Vec<sites::Model>, SiteError> {
        Ok(sites::Entity::find()
            .filter(sites::Column::UserId.eq(user_id))
            .order_by_asc(sites::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// One site by id, scoped to its owner
    pub async fn get_site(&self, user_id: i32, site_id: i32) -> Result<sites::Model, SiteError> {
        sites::Entity::find()
            .filter(sites::Column::Id.eq(site_id))
            .filter(sites::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(SiteError::NotFound)
    }

    /// Dispatch deletion for an owned site. Returns once the job is queued;
    /// the status flips to deleted when the worker gets to it.
    pub async fn delete_site(&self, user_id: i32, site_id: i32) -> Result<(), SiteError> {
        let site = self.get_site(user_id, site_id).await?;

        self.queue
            .send(Job::DeleteSite(DeleteSiteJob { site_id: site.id }))
            .await
            .map_err(|e| SiteError::Dispatch(e.to_string()))?;

        info!("Queued deletion of site {} ({})", site.domain, site.id);
        Ok(())
    }
}
