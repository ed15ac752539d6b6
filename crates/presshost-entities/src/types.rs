use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use utoipa::ToSchema;

/// Attempted status change that the lifecycle does not allow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal site status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: SiteStatus,
    pub to: SiteStatus,
}

/// SiteStatus enum for site lifecycle tracking.
/// NOTE: Use db_type = "Text" for SQLite compatibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "installing")]
    Installing,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Pending => "pending",
            SiteStatus::Installing => "installing",
            SiteStatus::Active => "active",
            SiteStatus::Failed => "failed",
            SiteStatus::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SiteStatus::Pending),
            "installing" => Some(SiteStatus::Installing),
            "active" => Some(SiteStatus::Active),
            "failed" => Some(SiteStatus::Failed),
            "deleted" => Some(SiteStatus::Deleted),
            _ => None,
        }
    }

    /// Whether the lifecycle allows moving from this status to `next`.
    ///
    /// Forward edges only: `pending -> installing -> {active | failed}`,
    /// plus deletion from any settled state. A site mid-install cannot be
    /// deleted (the run owns the record), and `deleted` is terminal.
    pub fn can_transition_to(&self, next: SiteStatus) -> bool {
        matches!(
            (self, next),
            (SiteStatus::Pending, SiteStatus::Installing)
                | (SiteStatus::Installing, SiteStatus::Active)
                | (SiteStatus::Installing, SiteStatus::Failed)
                | (SiteStatus::Pending, SiteStatus::Deleted)
                | (SiteStatus::Active, SiteStatus::Deleted)
                | (SiteStatus::Failed, SiteStatus::Deleted)
        )
    }

    /// Validate a transition, returning the new status or an error.
    pub fn transition_to(self, next: SiteStatus) -> Result<SiteStatus, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}
