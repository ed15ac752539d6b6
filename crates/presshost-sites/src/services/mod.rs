mod site;

pub use site::{CreateSiteParams, SiteError, SiteService};
