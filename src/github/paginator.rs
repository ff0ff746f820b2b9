use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::github::link::PageLinks;
use crate::github::rate_limiter::{RateLimiter, RetryDecision};
use crate::progress::{PageCursor, ProgressObserver};

/// Decoded body of a fetch: either every item across all pages, or the
/// single object an endpoint returned instead of a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Items(Vec<Value>),
    Object(Value),
}

impl Fetched {
    pub fn into_items<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        match self {
            Fetched::Items(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(Error::from))
                .collect(),
            Fetched::Object(_) => Err(Error::UnexpectedShape(
                "expected a list but the API returned a single object".to_string(),
            )),
        }
    }
}

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
    progress: &'a dyn ProgressObserver,
}

impl<'a> Paginator<'a> {
    pub fn new(
        client: &'a Client,
        rate_limiter: &'a RateLimiter,
        progress: &'a dyn ProgressObserver,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            progress,
        }
    }

    /// Fetches `url` and every page its `Link: rel="next"` headers point to.
    ///
    /// `params` only apply to the first request; next links are followed
    /// verbatim. A 404 yields an empty list.
    pub async fn fetch_all(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &[(&str, String)],
    ) -> Result<Fetched> {
        let mut url = parse_url(url)?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        self.progress.start(url.path());
        let result = self.collect_pages(url, headers).await;
        self.progress.finish();
        result
    }

    async fn collect_pages(&self, mut url: Url, headers: &HeaderMap) -> Result<Fetched> {
        let mut all_items = Vec::new();
        let mut fetched = 0u32;

        loop {
            let response = self.send(&url, headers).await?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                tracing::warn!(
                    "API returned a 404 for {}. Check that the provided token has the correct scope and SAML authorization. Check also that the org exists and has SAML SSO configured.",
                    url.path()
                );
                return Ok(Fetched::Items(Vec::new()));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::GitHubApi {
                    status,
                    url: url.to_string(),
                    body,
                });
            }

            let links = PageLinks::from_headers(response.headers());
            let items = match response.json::<Value>().await? {
                Value::Array(items) => items,
                object => return Ok(Fetched::Object(object)),
            };
            fetched += 1;
            all_items.extend(items);

            let Some(next) = links.next.as_deref() else {
                break;
            };

            let next_page = links.next_page();
            self.progress.page(PageCursor {
                fetched,
                next: next_page,
                last: links.last_page().or(next_page),
            });
            tracing::debug!("Following next page: {}", next);
            url = parse_url(next)?;
        }

        Ok(Fetched::Items(all_items))
    }

    /// Issues the GET, re-issuing the identical request while the response
    /// is rate limited.
    async fn send(&self, url: &Url, headers: &HeaderMap) -> Result<Response> {
        let mut attempt = 0;

        loop {
            tracing::debug!("Fetching: {}", url);
            let response = self
                .client
                .get(url.clone())
                .headers(headers.clone())
                .send()
                .await?;

            match self
                .rate_limiter
                .assess(response.status(), response.headers(), attempt)
            {
                RetryDecision::Proceed => return Ok(response),
                RetryDecision::WaitForReset { wait } => {
                    self.rate_limiter.wait_for_reset(wait).await;
                }
                RetryDecision::Backoff { wait } => {
                    self.rate_limiter.backoff(wait, attempt).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => {
                    return Err(Error::RateLimitRetriesExhausted {
                        url: url.to_string(),
                        attempts: self.rate_limiter.max_retries(),
                    });
                }
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
