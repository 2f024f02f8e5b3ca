//! Server-side analysis: validate, prompt, call the provider, parse.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use crate::llm::{CompletionProvider, ProviderError, join_text};

use super::contract::{AnalysisRequest, inspect};
use super::prompt::build_prompt;

/// Default output budget for one analysis.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Why an analysis request failed.
///
/// The display strings are exactly what callers see in the `error` field.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No provider credential was configured at startup.
    #[error("Missing ANTHROPIC_API_KEY")]
    Configuration,

    /// Body is not JSON or lacks a non-empty textual `productText`.
    #[error("Product text is required")]
    BadRequest,

    /// The provider's text did not parse as the agreed JSON.
    #[error("Invalid response from AI model")]
    UpstreamFormat,

    /// The provider call itself failed.
    #[error("Failed to analyze product")]
    UpstreamCall(#[source] ProviderError),
}

impl AnalysisError {
    /// HTTP status for this failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Configuration | Self::UpstreamFormat | Self::UpstreamCall(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Tunables for [`AnalysisService`].
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Output token budget passed to the provider.
    pub max_tokens: u32,
    /// Reject replies that parse but do not match the reply shape.
    pub strict_schema: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            strict_schema: false,
        }
    }
}

/// Stateless per-request analysis handler.
///
/// Holds the provider built once at startup. `None` means no credential was
/// configured and every call fails with [`AnalysisError::Configuration`].
#[derive(Clone)]
pub struct AnalysisService {
    provider: Option<Arc<dyn CompletionProvider>>,
    options: AnalysisOptions,
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("configured", &self.is_configured())
            .field("options", &self.options)
            .finish()
    }
}

impl AnalysisService {
    /// Create a service around an optional provider.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, options: AnalysisOptions) -> Self {
        Self { provider, options }
    }

    /// Whether a provider is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Handle a raw request body.
    ///
    /// The configuration check runs before the body is looked at.
    pub async fn analyze_body(&self, body: &[u8]) -> Result<Value, AnalysisError> {
        let provider = self.provider()?;
        let request = parse_request(body)?;
        self.run(provider, &request.product_text).await
    }

    /// Analyse already-extracted product text.
    pub async fn analyze(&self, product_text: &str) -> Result<Value, AnalysisError> {
        let provider = self.provider()?;
        if product_text.is_empty() {
            return Err(AnalysisError::BadRequest);
        }
        self.run(provider, product_text).await
    }

    fn provider(&self) -> Result<&Arc<dyn CompletionProvider>, AnalysisError> {
        self.provider.as_ref().ok_or_else(|| {
            tracing::error!("Analysis requested but no provider credential is configured");
            AnalysisError::Configuration
        })
    }

    async fn run(
        &self,
        provider: &Arc<dyn CompletionProvider>,
        product_text: &str,
    ) -> Result<Value, AnalysisError> {
        let request_id = Uuid::new_v4().to_string();
        tracing::info!(
            request_id = %request_id,
            text_length = product_text.len(),
            "Analyzing product"
        );

        let prompt = build_prompt(product_text);
        let blocks = provider
            .complete(&prompt, self.options.max_tokens)
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Provider call failed");
                AnalysisError::UpstreamCall(e)
            })?;

        let text = join_text(&blocks);
        let text = text.trim();

        let analysis: Value = serde_json::from_str(text).map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                raw = %text,
                "Provider reply is not valid JSON"
            );
            AnalysisError::UpstreamFormat
        })?;

        let issues = inspect(&analysis);
        if !issues.is_empty() {
            let summary = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            if self.options.strict_schema {
                tracing::error!(
                    request_id = %request_id,
                    issues = %summary,
                    raw = %text,
                    "Provider reply rejected by schema check"
                );
                return Err(AnalysisError::UpstreamFormat);
            }
            tracing::warn!(
                request_id = %request_id,
                issues = %summary,
                "Provider reply deviates from the expected shape"
            );
        }

        tracing::info!(
            request_id = %request_id,
            has_trans_fat = ?analysis.get("hasTransFat"),
            "Analysis complete"
        );

        Ok(analysis)
    }
}

fn parse_request(body: &[u8]) -> Result<AnalysisRequest, AnalysisError> {
    let request: AnalysisRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected analysis request body");
        AnalysisError::BadRequest
    })?;

    // Only the empty string is refused; whitespace is forwarded as given.
    if request.product_text.is_empty() {
        return Err(AnalysisError::BadRequest);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ContentBlock;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Mutex<Option<Result<Vec<ContentBlock>, ProviderError>>>,
        prompts: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedProvider {
        fn replying(reply: Result<Vec<ContentBlock>, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(
            &self,
            prompt: &str,
            max_tokens: u32,
        ) -> Result<Vec<ContentBlock>, ProviderError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), max_tokens));
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("provider called more than once")
        }
    }

    fn service(provider: &Arc<ScriptedProvider>, strict_schema: bool) -> AnalysisService {
        let provider: Arc<dyn CompletionProvider> = Arc::<ScriptedProvider>::clone(provider);
        AnalysisService::new(
            Some(provider),
            AnalysisOptions {
                max_tokens: 1024,
                strict_schema,
            },
        )
    }

    #[tokio::test]
    async fn test_configuration_checked_before_body() {
        let svc = AnalysisService::new(None, AnalysisOptions::default());
        let err = svc.analyze_body(b"not even json").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration));
        assert_eq!(err.to_string(), "Missing ANTHROPIC_API_KEY");
    }

    #[tokio::test]
    async fn test_bad_bodies() {
        let provider = ScriptedProvider::replying(Ok(vec![]));
        let svc = service(&provider, false);

        for body in [
            &b"{}"[..],
            b"{\"productText\": 42}",
            b"{\"productText\": \"\"}",
            b"garbage",
            b"",
        ] {
            let err = svc.analyze_body(body).await.unwrap_err();
            assert!(matches!(err, AnalysisError::BadRequest));
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_product_text_is_forwarded() {
        let provider =
            ScriptedProvider::replying(Ok(vec![ContentBlock::text("{\"hasTransFat\": false}")]));
        let svc = service(&provider, false);

        let value = svc
            .analyze_body(br#"{"productText":"   "}"#)
            .await
            .unwrap();

        assert_eq!(value, json!({ "hasTransFat": false }));
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("Product/Ingredients:    \n"));
    }

    #[tokio::test]
    async fn test_passes_parsed_json_through() {
        let provider = ScriptedProvider::replying(Ok(vec![
            ContentBlock::text("  {\"hasTransFat\": true, "),
            ContentBlock::Other {
                kind: "tool_use".to_string(),
            },
            ContentBlock::text("\"extra\": 1}\n"),
        ]));
        let svc = service(&provider, false);

        let value = svc
            .analyze_body(br#"{"productText":"Crisco"}"#)
            .await
            .unwrap();

        assert_eq!(value, json!({ "hasTransFat": true, "extra": 1 }));
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("Product/Ingredients: Crisco"));
        assert_eq!(prompts[0].1, 1024);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_upstream_format() {
        let provider = ScriptedProvider::replying(Ok(vec![ContentBlock::text("not json")]));
        let svc = service(&provider, false);

        let err = svc.analyze("Oreos").await.unwrap_err();
        assert!(matches!(err, AnalysisError::UpstreamFormat));
        assert_eq!(err.to_string(), "Invalid response from AI model");
    }

    #[tokio::test]
    async fn test_provider_failure_is_upstream_call() {
        let provider = ScriptedProvider::replying(Err(ProviderError::Status {
            status: 529,
            body: "overloaded".to_string(),
        }));
        let svc = service(&provider, false);

        let err = svc.analyze("Oreos").await.unwrap_err();
        assert!(matches!(err, AnalysisError::UpstreamCall(_)));
        assert_eq!(err.to_string(), "Failed to analyze product");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_strict_schema_rejects_partial_reply() {
        let provider =
            ScriptedProvider::replying(Ok(vec![ContentBlock::text("{\"hasTransFat\": false}")]));
        let svc = service(&provider, true);

        let err = svc.analyze("Apple").await.unwrap_err();
        assert!(matches!(err, AnalysisError::UpstreamFormat));
    }

    #[tokio::test]
    async fn test_lenient_schema_keeps_partial_reply() {
        let provider =
            ScriptedProvider::replying(Ok(vec![ContentBlock::text("{\"hasTransFat\": false}")]));
        let svc = service(&provider, false);

        let value = svc.analyze("Apple").await.unwrap();
        assert_eq!(value, json!({ "hasTransFat": false }));
    }
}
