pub mod audit;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod progress;
pub mod report;

pub use audit::SamlAudit;
pub use config::Config;
pub use error::{Error, Result};
pub use github::{GitHubClient, OrgDirectory};
pub use progress::{NoProgress, ProgressObserver, TerminalProgress};
pub use report::SamlReport;
