//! OpenAI-compatible Chat Completions driver.
//!
//! Non-streaming: the whole reply arrives in one response and the assistant
//! message becomes a single text block.

use serde::{Deserialize, Serialize};

use super::{CompletionProvider, ContentBlock, LlmProtocol, LlmSettings, Provider, ProviderError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    stream: bool,
    messages: [ChatTurn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Driver for OpenAI-compatible Chat Completions endpoints.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a new Chat Completions driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ChatCompletionsDriver {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<Vec<ContentBlock>, ProviderError> {
        let url = Provider::build_url(&self.settings.base_url, LlmProtocol::Chat);

        let body = ChatRequest {
            model: &self.settings.model,
            max_tokens,
            stream: false,
            messages: [ChatTurn {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = %status, "Chat Completions API returned an error status");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Empty("no choices in reply".to_string()))?
            .message
            .content
            .unwrap_or_default();

        Ok(vec![ContentBlock::Text { text: content }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, routing::post};
    use serde_json::{Value, json};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn settings(base_url: String) -> LlmSettings {
        LlmSettings {
            provider: Provider::detect_from_url(&base_url),
            base_url,
            api_key: "test-key".to_string(),
            model: "gpt-test".to_string(),
            api_version: "2023-06-01".to_string(),
            protocol: LlmProtocol::Chat,
        }
    }

    #[tokio::test]
    async fn test_bearer_auth_and_single_text_block() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(body["stream"], false);
                assert_eq!(body["messages"][0]["content"], "prompt text");
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "{\"hasTransFat\":false}" } }]
                }))
            }),
        );
        let driver = ChatCompletionsDriver::new(settings(spawn_stub(router).await));

        let blocks = driver.complete("prompt text", 256).await.unwrap();
        assert_eq!(blocks, vec![ContentBlock::text("{\"hasTransFat\":false}")]);
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let driver = ChatCompletionsDriver::new(settings(spawn_stub(router).await));

        let err = driver.complete("prompt", 16).await.unwrap_err();
        assert!(matches!(err, ProviderError::Empty(_)));
    }
}
