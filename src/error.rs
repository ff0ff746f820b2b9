use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("This tool requires a classic PAT with read:org scope but a fine-grained PAT was provided")]
    FineGrainedToken,

    #[error("No orgs found with provided token")]
    NoOrganizations,

    #[error("GitHub API error: {status} for {url}: {body}")]
    GitHubApi {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("Secondary rate limit still in effect for {url} after {attempts} retries")]
    RateLimitRetriesExhausted { url: String, attempts: u32 },

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;
