//! RFC 5988 `Link` header handling for GitHub list endpoints.
//!
//! GitHub advertises follow-up pages as
//! `<https://api.github.com/...&page=2>; rel="next", <...&page=5>; rel="last"`.

use reqwest::header::{HeaderMap, LINK};
use reqwest::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub last: Option<String>,
}

impl PageLinks {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .fold(Self::default(), |mut links, value| {
                let parsed = Self::parse(value);
                links.next = links.next.or(parsed.next);
                links.last = links.last.or(parsed.last);
                links
            })
    }

    pub fn parse(value: &str) -> Self {
        let mut links = Self::default();

        for entry in value.split(',') {
            let mut parts = entry.split(';').map(str::trim);
            let Some(target) = parts
                .next()
                .and_then(|t| t.strip_prefix('<'))
                .and_then(|t| t.strip_suffix('>'))
            else {
                continue;
            };

            for param in parts {
                let Some(rel) = param.strip_prefix("rel=") else {
                    continue;
                };
                for name in rel.trim_matches('"').split_whitespace() {
                    match name {
                        "next" if links.next.is_none() => links.next = Some(target.to_string()),
                        "last" if links.last.is_none() => links.last = Some(target.to_string()),
                        _ => {}
                    }
                }
            }
        }

        links
    }

    pub fn next_page(&self) -> Option<u32> {
        self.next.as_deref().and_then(page_number)
    }

    pub fn last_page(&self) -> Option<u32> {
        self.last.as_deref().and_then(page_number)
    }
}

/// Value of the `page` query parameter, if the URL carries a numeric one.
pub fn page_number(url: &str) -> Option<u32> {
    let url = Url::parse(url).ok()?;
    let (_, value) = url.query_pairs().find(|(key, _)| key == "page")?;
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const GITHUB_LINK: &str = r#"<https://api.github.com/organizations/1/credential-authorizations?per_page=100&page=2>; rel="next", <https://api.github.com/organizations/1/credential-authorizations?per_page=100&page=4>; rel="last""#;

    #[test]
    fn test_parse_next_and_last() {
        let links = PageLinks::parse(GITHUB_LINK);
        assert_eq!(
            links.next.as_deref(),
            Some("https://api.github.com/organizations/1/credential-authorizations?per_page=100&page=2")
        );
        assert_eq!(links.next_page(), Some(2));
        assert_eq!(links.last_page(), Some(4));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let links = PageLinks::parse(
            r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=1>; rel="first""#,
        );
        assert_eq!(links, PageLinks::default());
    }

    #[test]
    fn test_page_number_ignores_per_page() {
        assert_eq!(page_number("https://api.github.com/x?page=3&per_page=100"), Some(3));
        assert_eq!(page_number("https://api.github.com/x?per_page=100"), None);
        assert_eq!(page_number("https://api.github.com/x?page=abc"), None);
        assert_eq!(page_number("not a url"), None);
    }

    #[test]
    fn test_cursor_links_degrade_to_unknown_page() {
        let links = PageLinks::parse(r#"<https://api.github.com/x?after=Y3Vyc29y>; rel="next""#);
        assert!(links.next.is_some());
        assert_eq!(links.next_page(), None);
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_static(GITHUB_LINK));
        assert_eq!(PageLinks::from_headers(&headers).next_page(), Some(2));
        assert_eq!(PageLinks::from_headers(&HeaderMap::new()), PageLinks::default());
    }
}
