mod handlers;
mod types;

pub use handlers::{configure_routes, AppState, SitesApiDoc};
pub use types::{CreateSiteRequest, DeleteSiteResponse, SiteResponse};
