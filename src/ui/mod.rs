//! Server-rendered pages.
//!
//! Plain HTML forms with HTMX attributes layered on top. Without HTMX every
//! form posts normally and gets the full page back; with it, only the result
//! slot is swapped.
//!
//! - [`shell`]: page layout and the three input-mode tabs
//! - [`result_view`]: rendering of a [`TransFatResult`](crate::analysis::TransFatResult)
//! - [`routes`]: the handlers

pub mod result_view;
pub mod routes;
pub mod shell;

use axum::http::HeaderMap;

/// Escape text for use in HTML content and double-quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether the request came from HTMX and wants a fragment.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// The input-mode tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Search,
    Scan,
    Upload,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Search, Tab::Scan, Tab::Upload];

    /// Parse a `?tab=` value; anything unknown selects Search.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("scan") => Self::Scan,
            Some("upload") => Self::Upload,
            _ => Self::Search,
        }
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Scan => "scan",
            Self::Upload => "upload",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Scan => "Scan",
            Self::Upload => "Upload",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("HX-Request", "true".parse().unwrap());
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_tab_from_query() {
        assert_eq!(Tab::from_query(Some("scan")), Tab::Scan);
        assert_eq!(Tab::from_query(Some("upload")), Tab::Upload);
        assert_eq!(Tab::from_query(Some("bogus")), Tab::Search);
        assert_eq!(Tab::from_query(None), Tab::Search);
    }
}
