//! Site provisioning: the ordered side-effecting steps that turn a pending
//! site record into a running ClassicPress installation, and the worker
//! loop that feeds them from the job queue.
//!
//! External tooling (mysql, nginx, wget/unzip, wp-cli) is reached through
//! capability traits so each target environment can swap implementations,
//! and every process invocation goes through [`CommandRunner`] with argv
//! arrays rather than shell strings.

pub mod capabilities;
pub mod command;
pub mod error;
pub mod installer;
pub mod mysql;
pub mod nginx;
pub mod processor;
pub mod provisioner;

pub use capabilities::{AppInstaller, DatabaseProvisioner, WebServerConfigurer};
pub use command::{CommandError, CommandOutput, CommandRunner, SystemCommandRunner};
pub use error::ProvisionError;
pub use installer::ClassicPressInstaller;
pub use mysql::MysqlProvisioner;
pub use nginx::NginxConfigurer;
pub use processor::JobProcessorService;
pub use provisioner::SiteProvisioner;

#[cfg(test)]
pub(crate) mod test_support;
