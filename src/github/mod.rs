pub mod client;
pub mod directory;
pub mod link;
pub mod paginator;
pub mod rate_limiter;

pub use client::GitHubClient;
pub use directory::OrgDirectory;
pub use paginator::{Fetched, Paginator};
pub use rate_limiter::RateLimiter;
