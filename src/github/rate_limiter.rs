use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use tokio::time::sleep;

/// Floor for the primary-limit wait, so a reset that is missing or already
/// past does not turn into a busy loop.
const MIN_RESET_WAIT: Duration = Duration::from_secs(1);

/// What to do with a response before handing it to the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    Proceed,
    /// Primary limit exhausted: wait until the window resets, then retry.
    WaitForReset { wait: Duration },
    /// Secondary limit or abuse detection: bounded backoff.
    Backoff { wait: Duration },
    GiveUp,
}

pub struct RateLimiter {
    max_retries: u32,
    base_backoff: Duration,
}

impl RateLimiter {
    pub fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
        }
    }

    /// `attempt` counts secondary retries already spent on this request.
    pub fn assess(&self, status: StatusCode, headers: &HeaderMap, attempt: u32) -> RetryDecision {
        self.assess_at(status, headers, attempt, Utc::now())
    }

    fn assess_at(
        &self,
        status: StatusCode,
        headers: &HeaderMap,
        attempt: u32,
        now: DateTime<Utc>,
    ) -> RetryDecision {
        if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
            return RetryDecision::Proceed;
        }

        let exhausted = header_u64(headers, "x-ratelimit-remaining") == Some(0);
        if status == StatusCode::FORBIDDEN && exhausted {
            let reset = header_u64(headers, "x-ratelimit-reset").unwrap_or(0);
            return RetryDecision::WaitForReset {
                wait: until_reset(reset, now).max(MIN_RESET_WAIT),
            };
        }

        if attempt >= self.max_retries {
            return RetryDecision::GiveUp;
        }

        let wait = header_u64(headers, RETRY_AFTER.as_str())
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.base_backoff.saturating_mul(2u32.saturating_pow(attempt)));

        RetryDecision::Backoff { wait }
    }

    pub async fn wait_for_reset(&self, wait: Duration) {
        let now = Local::now();
        let resume = chrono::Duration::from_std(wait)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(now);
        tracing::warn!(
            "Rate limit exceeded at {}, sleeping for {} minutes until {}. Hit Ctrl-C to exit.",
            now.format("%Y-%m-%d %H:%M:%S"),
            wait.as_secs().div_ceil(60),
            resume.format("%Y-%m-%d %H:%M:%S")
        );
        sleep(wait).await;
    }

    pub async fn backoff(&self, wait: Duration, attempt: u32) {
        tracing::warn!(
            "Secondary rate limit hit, retry {}/{} in {:?}",
            attempt + 1,
            self.max_retries,
            wait
        );
        sleep(wait).await;
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn until_reset(reset_epoch: u64, now: DateTime<Utc>) -> Duration {
    let reset = i64::try_from(reset_epoch)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(now);
    (reset - now).to_std().unwrap_or(Duration::ZERO)
}
