//! Trans Fat Detector
//!
//! Checks food products for trans fats. Users search by name or ingredient
//! text, scan a barcode, or upload a label photo; free text is analysed by a
//! hosted language model behind a single JSON endpoint.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server exposing `POST /api/analyze-product`
//! - **Analysis**: prompt construction, provider call, reply parsing
//! - **LLM**: provider drivers for the Messages and Chat Completions protocols
//! - **UI**: server-rendered HTML with HTMX progressive enhancement
//!
//! # Modules
//!
//! - [`analysis`]: request/reply contract and the analysis service
//! - [`capture`]: barcode and label-photo input modes
//! - [`client`]: HTTP client the search view uses to reach the endpoint
//! - [`config`]: layered configuration
//! - [`llm`]: provider drivers
//! - [`server`]: router and startup
//! - [`ui`]: pages and their handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::assigning_clones)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::unused_async)]

pub mod analysis;
pub mod capture;
pub mod client;
pub mod config;
pub mod llm;
pub mod server;
pub mod ui;

use std::sync::Arc;

use crate::analysis::AnalysisService;
use crate::capture::{BarcodeLookup, LabelReader};
use crate::client::AnalysisClient;
use crate::config::AppConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server-side analysis behind `POST /api/analyze-product`.
    pub analysis: Arc<AnalysisService>,
    /// Client the search view uses to call the analysis endpoint.
    pub client: Arc<AnalysisClient>,
    /// Barcode scan mode.
    pub barcode: Arc<dyn BarcodeLookup>,
    /// Label photo mode.
    pub label_reader: Arc<dyn LabelReader>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analysis", &self.analysis)
            .field("client", &self.client)
            .field("config", &self.config)
            .finish()
    }
}
