//! HTTP client for the analysis endpoint.
//!
//! This is the search view's side of the boundary. It never lets a failure
//! escape: every outcome becomes a [`TransFatResult`], failures as a
//! placeholder with `isError` set.

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::analysis::{AnalysisReply, AnalysisRequest, TransFatResult};

/// Path of the analysis endpoint.
pub const ANALYZE_PATH: &str = "/api/analyze-product";

/// Client-side failure while fetching or decoding an analysis.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The success body was not an analysis reply.
    #[error("Unreadable analysis reply: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint returned a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
}

/// HTTP client for `POST /api/analyze-product`.
///
/// # Example
///
/// ```rust,no_run
/// use trans_fat_detector::client::AnalysisClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AnalysisClient::new("http://localhost:3000")?;
/// if let Some(result) = client.analyze("Oreos").await {
///     println!("{}: {}", result.product_name, result.has_trans_fat);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: Url,
    http: reqwest::Client,
}

impl AnalysisClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the server (e.g., "http://localhost:3000")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Analyse user text.
    ///
    /// Returns `None` without any network call when the text is empty or
    /// whitespace-only. Otherwise exactly one request is made and the result
    /// is named after the trimmed text.
    pub async fn analyze(&self, text: &str) -> Option<TransFatResult> {
        let product_name = text.trim();
        if product_name.is_empty() {
            tracing::debug!("Ignoring blank search");
            return None;
        }

        let result = match self.fetch_reply(product_name).await {
            Ok(reply) => TransFatResult::from_reply(product_name, reply),
            Err(e) => {
                tracing::warn!(error = %e, product = %product_name, "Analysis failed");
                TransFatResult::failure(product_name, e.to_string())
            }
        };
        Some(result)
    }

    /// Analyse user text and hand the result to `on_result`.
    ///
    /// `on_result` runs exactly once for non-blank text and never for blank
    /// text. Returns whether it ran.
    pub async fn search<F>(&self, text: &str, on_result: F) -> bool
    where
        F: FnOnce(TransFatResult),
    {
        match self.analyze(text).await {
            Some(result) => {
                on_result(result);
                true
            }
            None => false,
        }
    }

    async fn fetch_reply(&self, product_text: &str) -> Result<AnalysisReply, ClientError> {
        let url = self.base_url.join(ANALYZE_PATH)?;
        let request = AnalysisRequest {
            product_text: product_text.to_string(),
        };

        let response = self.http.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: failure_message(status.as_u16(), &body),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(AnalysisReply::from_value(&value))
    }
}

/// Pick the most useful message from a failed response body.
///
/// Prefers a JSON `details` field, then `error`, then the raw body, then a
/// generic message naming the status.
#[must_use]
pub fn failure_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["details", "error"] {
            if let Some(Value::String(message)) = map.get(key)
                && !message.is_empty()
            {
                return message.clone();
            }
        }
    }

    let raw = body.trim();
    if raw.is_empty() {
        format!("Request failed ({status})")
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_preferred_over_error() {
        let msg = failure_message(500, r#"{"error":"Failed","details":"quota exceeded"}"#);
        assert_eq!(msg, "quota exceeded");
    }

    #[test]
    fn test_error_field() {
        assert_eq!(failure_message(400, r#"{"error":"X"}"#), "X");
    }

    #[test]
    fn test_raw_text_fallback() {
        assert_eq!(failure_message(502, "Bad Gateway\n"), "Bad Gateway");
        assert_eq!(
            failure_message(500, r#"{"message":"nope"}"#),
            r#"{"message":"nope"}"#
        );
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(failure_message(503, "   "), "Request failed (503)");
    }

    #[tokio::test]
    async fn test_blank_text_is_a_no_op() {
        // Port 9 (discard) is never contacted: blank input short-circuits.
        let client = AnalysisClient::new("http://127.0.0.1:9").unwrap();
        let mut called = false;

        let ran = client.search("   \t", |_| called = true).await;

        assert!(!ran);
        assert!(!called);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            AnalysisClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
