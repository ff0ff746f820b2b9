use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Position within a paginated fetch, reported after each page that
/// advertises a follow-up page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub fetched: u32,
    /// `page=` of the next link, when present.
    pub next: Option<u32>,
    /// `page=` of the last link, or `next` when there is no last link.
    pub last: Option<u32>,
}

pub trait ProgressObserver: Send + Sync {
    fn start(&self, _endpoint: &str) {}
    fn page(&self, cursor: PageCursor);
    fn finish(&self) {}
}

pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn page(&self, _cursor: PageCursor) {}
}

/// Progress line on stderr, overwritten page by page.
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for TerminalProgress {
    fn start(&self, endpoint: &str) {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("  {prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(endpoint.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn page(&self, cursor: PageCursor) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_message(describe(cursor));
            }
        }
    }

    fn finish(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

pub fn describe(cursor: PageCursor) -> String {
    let current = cursor.next.unwrap_or(cursor.fetched + 1);
    match cursor.last {
        Some(last) => format!("{}/{} pages parsed...", current, last),
        None => format!("{}/? pages parsed...", current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_total() {
        let cursor = PageCursor {
            fetched: 1,
            next: Some(2),
            last: Some(5),
        };
        assert_eq!(describe(cursor), "2/5 pages parsed...");
    }

    #[test]
    fn test_describe_unknown_total() {
        let cursor = PageCursor {
            fetched: 3,
            next: None,
            last: None,
        };
        assert_eq!(describe(cursor), "4/? pages parsed...");
    }

    #[test]
    fn test_terminal_progress_without_start_is_noop() {
        let progress = TerminalProgress::new();
        progress.page(PageCursor {
            fetched: 1,
            next: Some(2),
            last: Some(2),
        });
        progress.finish();
    }
}
