use crate::analysis::AnalysisOptions;
use crate::llm::{LlmProtocol, LlmSettings, Provider};
use clap::Parser;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the provider credential.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Provider model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Reject provider replies that do not match the reply shape
    #[arg(long)]
    pub strict_schema: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub analysis: AnalysisConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
    pub protocol: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub strict_schema: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Where the search view sends analysis requests. Defaults to this server.
    #[serde(default)]
    pub api_base_url: Option<String>,
    pub simulated_delay_ms: u64,
}

fn default_builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    Config::builder()
        .set_default("server.port", 3000)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.body_limit_bytes", 10 * 1024 * 1024)?
        .set_default("provider.base_url", "https://api.anthropic.com")?
        .set_default("provider.model", "claude-3-5-sonnet-20241022")?
        .set_default("provider.max_tokens", 1024)?
        .set_default("provider.api_version", "2023-06-01")?
        .set_default("provider.protocol", "auto")?
        .set_default("analysis.strict_schema", false)?
        .set_default("ui.simulated_delay_ms", 1500)
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Built-in defaults only: no file, environment, or CLI.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        default_builder()?.build()?.try_deserialize()
    }

    /// Layer sources in priority order: CLI > `TFD_*` env > file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = default_builder()?;

        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::with_name(path).required(true));
            }
            None if Path::new("config.yaml").exists() => {
                builder = builder.add_source(File::with_name("config.yaml").required(false));
            }
            None => {}
        }

        // E.g. TFD_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("TFD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(model) = cli.model {
            builder = builder.set_override("provider.model", model)?;
        }
        if let Some(strict) = cli.strict_schema {
            builder = builder.set_override("analysis.strict_schema", strict)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Base URL the search view's client talks to.
    ///
    /// Without an explicit `ui.api_base_url` this is the server itself: the
    /// bound host, or loopback when bound to every interface.
    #[must_use]
    pub fn ui_api_base_url(&self) -> String {
        if let Some(url) = self
            .ui
            .api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        {
            return url.to_string();
        }

        let host = match self.server.host.trim() {
            "" | "0.0.0.0" | "::" | "[::]" => "127.0.0.1".to_string(),
            host if host.contains(':') && !host.starts_with('[') => format!("[{host}]"),
            host => host.to_string(),
        };
        format!("http://{host}:{}", self.server.port)
    }

    /// Artificial delay of the placeholder capture modes.
    #[must_use]
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.ui.simulated_delay_ms)
    }

    #[must_use]
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            max_tokens: self.provider.max_tokens,
            strict_schema: self.analysis.strict_schema,
        }
    }
}

/// Provider settings, or `None` when no credential is configured.
///
/// Reads the credential from `ANTHROPIC_API_KEY`; blank counts as absent.
#[must_use]
pub fn load_llm_settings(provider: &ProviderConfig) -> Option<LlmSettings> {
    let api_key = std::env::var(API_KEY_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())?;

    Some(llm_settings(provider, api_key))
}

/// Provider settings for an explicit credential.
#[must_use]
pub fn llm_settings(provider: &ProviderConfig, api_key: String) -> LlmSettings {
    LlmSettings {
        base_url: provider.base_url.clone(),
        api_key,
        model: provider.model.clone(),
        api_version: provider.api_version.clone(),
        protocol: LlmProtocol::parse(&provider.protocol),
        provider: Provider::detect_from_url(&provider.base_url),
    }
}
