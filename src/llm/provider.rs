//! Provider detection and endpoint construction.
//!
//! This module handles differences between inference providers: which wire
//! protocol they speak by default and where their completion endpoint lives.

use super::LlmProtocol;

/// Supported inference providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Anthropic (api.anthropic.com)
    Anthropic,
    /// `OpenAI` (api.openai.com)
    OpenAI,
    /// `OpenRouter` (openrouter.ai)
    OpenRouter,
    /// Groq (groq.com)
    Groq,
    /// Generic OpenAI-compatible provider
    Generic,
}

impl Provider {
    /// Detect provider from base URL.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let provider = Provider::detect_from_url("https://api.anthropic.com");
    /// assert_eq!(provider, Provider::Anthropic);
    /// ```
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();

        if lower.contains("anthropic.com") {
            Self::Anthropic
        } else if lower.contains("openrouter.ai") {
            Self::OpenRouter
        } else if lower.contains("groq.com") {
            Self::Groq
        } else if lower.contains("openai.com") {
            Self::OpenAI
        } else {
            Self::Generic
        }
    }

    /// Protocol spoken when the settings leave it on `Auto`.
    #[must_use]
    pub fn default_protocol(self) -> LlmProtocol {
        match self {
            Self::Anthropic => LlmProtocol::Messages,
            Self::OpenAI | Self::OpenRouter | Self::Groq | Self::Generic => LlmProtocol::Chat,
        }
    }

    /// Build the completion URL for a protocol.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL (trailing slash tolerated)
    /// * `protocol` - The resolved wire protocol
    #[must_use]
    pub fn build_url(base_url: &str, protocol: LlmProtocol) -> String {
        let base = base_url.trim_end_matches('/');

        match protocol {
            LlmProtocol::Chat => format!("{base}/v1/chat/completions"),
            LlmProtocol::Messages | LlmProtocol::Auto => format!("{base}/v1/messages"),
        }
    }
}
