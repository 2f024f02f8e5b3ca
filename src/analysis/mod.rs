//! Product analysis.
//!
//! - [`model`]: the [`TransFatResult`] every input mode produces
//! - [`contract`]: request/reply shapes of `POST /api/analyze-product`
//! - [`prompt`]: the fixed provider prompt
//! - [`service`]: the server-side [`AnalysisService`]

pub mod contract;
pub mod model;
pub mod prompt;
pub mod service;

pub use contract::{AnalysisReply, AnalysisRequest, Confidence, SchemaIssue};
pub use model::TransFatResult;
pub use service::{AnalysisError, AnalysisOptions, AnalysisService};
