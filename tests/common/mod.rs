#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use trans_fat_detector::config::AppConfig;
use trans_fat_detector::llm::{CompletionProvider, ContentBlock, ProviderError};
use trans_fat_detector::server::{build_router, build_state};

/// What a [`FakeProvider`] answers with.
enum Script {
    Blocks(Vec<ContentBlock>),
    Status(u16, String),
}

/// Scripted provider that records every prompt it receives.
pub struct FakeProvider {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn text(reply: &str) -> Arc<Self> {
        Self::blocks(vec![ContentBlock::text(reply)])
    }

    pub fn blocks(blocks: Vec<ContentBlock>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Blocks(blocks),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Status(status, body.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(
        &self,
        prompt: &str,
        _max_tokens: u32,
    ) -> Result<Vec<ContentBlock>, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Blocks(blocks) => Ok(blocks.clone()),
            Script::Status(status, body) => Err(ProviderError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// Defaults with the placeholder delay switched off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::defaults().expect("default config");
    config.ui.simulated_delay_ms = 0;
    config
}

pub fn as_provider(fake: &Arc<FakeProvider>) -> Arc<dyn CompletionProvider> {
    Arc::clone(fake) as Arc<dyn CompletionProvider>
}

/// In-process server without a network listener.
pub fn test_server(config: AppConfig, provider: Option<Arc<dyn CompletionProvider>>) -> TestServer {
    let state = build_state(Arc::new(config), provider).expect("state");
    TestServer::new(build_router(state)).expect("test server")
}

/// Serve the full app on an ephemeral port and return its base URL.
///
/// The listener is bound first so the search view's client can be pointed
/// back at the same server.
pub async fn spawn_app(provider: Option<Arc<dyn CompletionProvider>>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));

    let mut config = test_config();
    config.ui.api_base_url = Some(base_url.clone());
    let state = build_state(Arc::new(config), provider).expect("state");
    let app = build_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    base_url
}
