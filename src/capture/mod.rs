//! Barcode and label-photo input modes.
//!
//! Neither mode is integrated with a real data source yet. Each sits behind
//! a trait so a barcode database or an OCR pipeline can replace the
//! placeholder without touching the routes:
//!
//! - [`BarcodeLookup`]: decoded barcode text → [`TransFatResult`]
//! - [`LabelReader`]: uploaded label image → [`TransFatResult`]
//!
//! The placeholders wait a configurable delay and then synthesize a
//! plausible-looking randomized result.

mod barcode;
mod label;

pub use barcode::PlaceholderBarcodeLookup;
pub use label::{LabelImage, PlaceholderLabelReader};

use thiserror::Error;

use crate::analysis::TransFatResult;

/// Why a capture could not be turned into a result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// The decoder produced no text.
    #[error("No barcode was scanned")]
    EmptyBarcode,

    /// The upload is not an image.
    #[error("Please upload an image file (got {0})")]
    NotAnImage(String),

    /// The upload has no bytes.
    #[error("The uploaded image is empty")]
    EmptyImage,
}

/// Resolves a decoded barcode to a result.
#[async_trait::async_trait]
pub trait BarcodeLookup: Send + Sync {
    /// Look up the product behind `code`.
    async fn lookup(&self, code: &str) -> Result<TransFatResult, CaptureError>;
}

/// Reads a product label photo into a result.
#[async_trait::async_trait]
pub trait LabelReader: Send + Sync {
    /// Analyse the label in `image`.
    async fn read_label(&self, image: &LabelImage) -> Result<TransFatResult, CaptureError>;
}

/// Format a random amount in `[0, max)` grams with one decimal.
fn random_grams(rng: &mut impl rand::Rng, max: f64) -> String {
    format!("{:.1}g", rng.gen_range(0.0..max))
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
