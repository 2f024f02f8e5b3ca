use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::{info, warn};

use crate::AppState;
use crate::analysis::{AnalysisError, AnalysisService};
use crate::capture::{PlaceholderBarcodeLookup, PlaceholderLabelReader};
use crate::client::{ANALYZE_PATH, AnalysisClient, ClientError};
use crate::config::{API_KEY_VAR, AppConfig};
use crate::llm::{CompletionProvider, LlmSettings, build_provider};
use crate::ui;

/// Assemble shared state. `provider` is `None` when no credential is set.
pub fn build_state(
    config: Arc<AppConfig>,
    provider: Option<Arc<dyn CompletionProvider>>,
) -> Result<AppState, ClientError> {
    let analysis = Arc::new(AnalysisService::new(provider, config.analysis_options()));
    let client = Arc::new(AnalysisClient::new(config.ui_api_base_url())?);
    let delay = config.simulated_delay();

    Ok(AppState {
        analysis,
        client,
        barcode: Arc::new(PlaceholderBarcodeLookup::new(delay)),
        label_reader: Arc::new(PlaceholderLabelReader::new(delay)),
        config,
    })
}

/// All routes with their layers applied.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route(ANALYZE_PATH, post(api_analyze_product))
        .route("/health", get(health))
        .merge(ui::routes::build_router())
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(
    config: Arc<AppConfig>,
    settings: Option<LlmSettings>,
) -> anyhow::Result<()> {
    let provider = match settings {
        Some(settings) => {
            info!(
                name: "provider.config.loaded",
                base_url = %settings.base_url,
                model = %settings.model,
                protocol = ?settings.effective_protocol(),
                "Provider configuration loaded"
            );
            Some(build_provider(settings))
        }
        None => {
            warn!(
                name: "provider.config.missing",
                variable = API_KEY_VAR,
                "No provider credential; analysis requests will fail"
            );
            None
        }
    };

    let state = build_state(Arc::clone(&config), provider)?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-product - Analyse product text with the model.
///
/// The body is taken raw so a missing credential is reported before the
/// body is parsed.
async fn api_analyze_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AnalysisError> {
    state.analysis.analyze_body(&body).await.map(Json)
}

/// GET /health - Liveness plus whether a provider is configured.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider_configured": state.analysis.is_configured(),
    }))
}
