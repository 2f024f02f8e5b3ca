//! Anthropic Messages API driver.
//!
//! Implements [`CompletionProvider`] for `/v1/messages`: one user turn in,
//! the reply's content blocks out.

use serde::{Deserialize, Serialize};

use super::{CompletionProvider, ContentBlock, LlmProtocol, LlmSettings, Provider, ProviderError};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserTurn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl From<RawBlock> for ContentBlock {
    fn from(raw: RawBlock) -> Self {
        if raw.kind == "text" {
            ContentBlock::Text {
                text: raw.text.unwrap_or_default(),
            }
        } else {
            ContentBlock::Other { kind: raw.kind }
        }
    }
}

/// Driver for the Anthropic Messages API.
#[derive(Clone)]
pub struct MessagesDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for MessagesDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagesDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl MessagesDriver {
    /// Create a new Messages driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MessagesDriver {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<Vec<ContentBlock>, ProviderError> {
        let url = Provider::build_url(&self.settings.base_url, LlmProtocol::Messages);

        let body = MessagesRequest {
            model: &self.settings.model,
            max_tokens,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = %status, "Messages API returned an error status");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        tracing::debug!(blocks = parsed.content.len(), "Messages API reply received");

        Ok(parsed.content.into_iter().map(ContentBlock::from).collect())
    }
}
