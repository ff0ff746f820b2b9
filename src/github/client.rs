use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::Config;
use crate::error::Result;
use crate::github::directory::OrgDirectory;
use crate::github::paginator::{Fetched, Paginator};
use crate::github::rate_limiter::RateLimiter;
use crate::models::{Organization, SamlAuthorization};
use crate::progress::{NoProgress, ProgressObserver};

pub const PAGE_SIZE: u32 = 100;

const USER_AGENT: &str = concat!("saml-pat-report/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    progress: Arc<dyn ProgressObserver>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut authorization =
            header::HeaderValue::from_str(&format!("Bearer {}", config.github_token))?;
        authorization.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.secondary_max_retries, config.secondary_backoff),
            progress: Arc::new(NoProgress),
            base_url: config.api_base.clone(),
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Fetches every item behind `endpoint` (a path such as `/user/orgs`).
    ///
    /// `extra_headers` win over the client's default headers on a key
    /// collision; `params` are only sent with the first page request.
    pub async fn fetch(
        &self,
        endpoint: &str,
        extra_headers: Option<header::HeaderMap>,
        params: &[(&str, String)],
    ) -> Result<Fetched> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = extra_headers.unwrap_or_default();
        let paginator = Paginator::new(&self.client, &self.rate_limiter, self.progress.as_ref());
        paginator.fetch_all(&url, &headers, params).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl OrgDirectory for GitHubClient {
    async fn list_user_orgs(&self) -> Result<Vec<Organization>> {
        tracing::info!("Discovering orgs visible to the token");
        self.fetch("/user/orgs", None, &[]).await?.into_items()
    }

    async fn list_credential_authorizations(&self, org: &str) -> Result<Vec<SamlAuthorization>> {
        let endpoint = format!("/orgs/{}/credential-authorizations", org);
        tracing::debug!("Fetching credential authorizations for: {}", org);
        self.fetch(&endpoint, None, &[("per_page", PAGE_SIZE.to_string())])
            .await?
            .into_items()
    }
}
