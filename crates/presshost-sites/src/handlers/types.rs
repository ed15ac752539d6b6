use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use presshost_core::chrono::{DateTime, Utc};
use presshost_entities::{sites, SiteStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSiteRequest {
    #[schema(example = "blog.example.com")]
    pub domain: String,
    #[schema(example = "My Blog")]
    pub title: String,
    #[schema(example = "admin@example.com")]
    pub admin_email: String,
    #[schema(example = "admin")]
    pub admin_user: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteResponse {
    pub id: i32,
    pub domain: String,
    pub title: String,
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
    /// Populated once provisioning has run
    pub installation_log: Option<String>,
    /// Populated when provisioning failed
    pub error_log: Option<String>,
}

impl SiteResponse {
    pub fn map_from_site(site: sites::Model) -> Self {
        SiteResponse {
            id: site.id,
            domain: site.domain,
            title: site.title,
            status: site.status,
            created_at: site.created_at,
            installation_log: site.installation_log,
            error_log: site.error_log,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteSiteResponse {
    #[schema(example = "Site deletion started")]
    pub message: String,
}
