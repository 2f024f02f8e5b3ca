//! Inference provider drivers.
//!
//! This module abstracts the external text-completion service that judges
//! whether a product contains trans fats. The analysis layer only ever sees
//! the [`CompletionProvider`] trait; the concrete driver is chosen once at
//! startup from [`LlmSettings`].
//!
//! # Drivers
//!
//! - [`MessagesDriver`]: Anthropic Messages API (`/v1/messages`)
//! - [`ChatCompletionsDriver`]: OpenAI-compatible Chat Completions (`/v1/chat/completions`)
//!
//! # Example
//!
//! ```rust,ignore
//! use trans_fat_detector::llm::{build_provider, LlmProtocol, LlmSettings, Provider};
//!
//! let settings = LlmSettings {
//!     base_url: "https://api.anthropic.com".to_string(),
//!     api_key: "sk-ant-...".to_string(),
//!     model: "claude-3-5-sonnet-20241022".to_string(),
//!     api_version: "2023-06-01".to_string(),
//!     protocol: LlmProtocol::Auto,
//!     provider: Provider::Anthropic,
//! };
//! let provider = build_provider(settings);
//! ```

pub mod chat_completions;
pub mod messages;
pub mod provider;

pub use chat_completions::ChatCompletionsDriver;
pub use messages::MessagesDriver;
pub use provider::Provider;

use std::sync::Arc;

use thiserror::Error;

/// Provider connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the provider API (e.g., `https://api.anthropic.com`).
    pub base_url: String,
    /// Credential sent with every request.
    pub api_key: String,
    /// Model identifier (e.g., `claude-3-5-sonnet-20241022`).
    pub model: String,
    /// Value of the `anthropic-version` header (Messages protocol only).
    pub api_version: String,
    /// Protocol to use for communication.
    pub protocol: LlmProtocol,
    /// Provider type (auto-detected from `base_url`).
    pub provider: Provider,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("protocol", &self.protocol)
            .field("provider", &self.provider)
            .finish()
    }
}

impl LlmSettings {
    /// The wire protocol actually used, resolving [`LlmProtocol::Auto`].
    #[must_use]
    pub fn effective_protocol(&self) -> LlmProtocol {
        match self.protocol {
            LlmProtocol::Auto => self.provider.default_protocol(),
            explicit => explicit,
        }
    }
}

/// Provider wire protocols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LlmProtocol {
    /// Pick the protocol from the detected provider.
    #[default]
    Auto,
    /// Anthropic Messages API (`/v1/messages`).
    Messages,
    /// OpenAI-compatible Chat Completions API (`/v1/chat/completions`).
    Chat,
}

impl LlmProtocol {
    /// Parse a protocol name; unknown names fall back to `Auto`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "messages" | "anthropic" => Self::Messages,
            "chat" | "openai" => Self::Chat,
            _ => Self::Auto,
        }
    }
}

/// One segment of a provider reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Model-generated text.
    Text {
        /// The text content.
        text: String,
    },
    /// Any non-text block (tool use, thinking, ...). Carries only its type tag.
    Other {
        /// Block type as reported by the provider.
        kind: String,
    },
}

impl ContentBlock {
    /// Create a text block.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }

    /// Get the text of this block, if it is a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other { .. } => None,
        }
    }
}

/// Concatenate every text block in order, skipping non-text blocks.
#[must_use]
pub fn join_text(blocks: &[ContentBlock]) -> String {
    blocks.iter().filter_map(ContentBlock::as_text).collect()
}

/// Failure talking to the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or protocol failure before a reply was received.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The provider envelope could not be decoded.
    #[error("provider reply could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope decoded but carried no usable content.
    #[error("provider reply was empty: {0}")]
    Empty(String),
}

/// A text-completion inference provider.
///
/// Implementations send a single user prompt and return the reply's content
/// blocks. They never retry and impose no timeout beyond the transport
/// defaults.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete `prompt`, generating at most `max_tokens` output tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider rejects it, or the
    /// reply cannot be decoded.
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<Vec<ContentBlock>, ProviderError>;
}

/// Build the driver matching the settings' effective protocol.
#[must_use]
pub fn build_provider(settings: LlmSettings) -> Arc<dyn CompletionProvider> {
    match settings.effective_protocol() {
        LlmProtocol::Chat => Arc::new(ChatCompletionsDriver::new(settings)),
        LlmProtocol::Messages | LlmProtocol::Auto => Arc::new(MessagesDriver::new(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str, protocol: LlmProtocol) -> LlmSettings {
        LlmSettings {
            base_url: base_url.to_string(),
            api_key: "secret".to_string(),
            model: "m".to_string(),
            api_version: "2023-06-01".to_string(),
            protocol,
            provider: Provider::detect_from_url(base_url),
        }
    }

    #[test]
    fn test_join_text_skips_other_blocks() {
        let blocks = vec![
            ContentBlock::text("{\"a\":"),
            ContentBlock::Other {
                kind: "thinking".to_string(),
            },
            ContentBlock::text("1}"),
        ];
        assert_eq!(join_text(&blocks), "{\"a\":1}");
    }

    #[test]
    fn test_auto_protocol_follows_provider() {
        let s = settings("https://api.anthropic.com", LlmProtocol::Auto);
        assert_eq!(s.effective_protocol(), LlmProtocol::Messages);

        let s = settings("https://api.groq.com/openai", LlmProtocol::Auto);
        assert_eq!(s.effective_protocol(), LlmProtocol::Chat);
    }

    #[test]
    fn test_explicit_protocol_wins() {
        let s = settings("https://api.anthropic.com", LlmProtocol::Chat);
        assert_eq!(s.effective_protocol(), LlmProtocol::Chat);
    }

    #[test]
    fn test_debug_redacts_key() {
        let s = settings("https://api.anthropic.com", LlmProtocol::Auto);
        let printed = format!("{s:?}");
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_protocol_parse() {
        assert_eq!(LlmProtocol::parse("Messages"), LlmProtocol::Messages);
        assert_eq!(LlmProtocol::parse("chat"), LlmProtocol::Chat);
        assert_eq!(LlmProtocol::parse("whatever"), LlmProtocol::Auto);
    }
}
