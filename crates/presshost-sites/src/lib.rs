//! Site management: CRUD HTTP surface and the service layer that persists
//! desired state and dispatches provisioning work.

pub mod handlers;
pub mod services;

pub use handlers::{configure_routes, AppState, SitesApiDoc};
pub use services::{CreateSiteParams, SiteError, SiteService};
