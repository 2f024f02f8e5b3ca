use std::time::Duration;

use rand::Rng;

use super::{BarcodeLookup, CaptureError, owned, random_grams};
use crate::analysis::TransFatResult;

const TYPES: &[&str] = &["Partially Hydrogenated Oils", "Shortening"];

const INGREDIENTS: &[&str] = &[
    "Enriched Flour",
    "Sugar",
    "Partially Hydrogenated Oil",
    "Salt",
    "Natural Flavors",
];

/// Stand-in for a barcode database. Not yet integrated: results are random.
#[derive(Debug, Clone)]
pub struct PlaceholderBarcodeLookup {
    delay: Duration,
}

impl PlaceholderBarcodeLookup {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

fn synthesize(code: &str, rng: &mut impl Rng) -> TransFatResult {
    TransFatResult {
        product_name: format!("Product (Barcode: {code})"),
        has_trans_fat: rng.gen_bool(0.4),
        trans_fat_types: owned(TYPES),
        total_trans_fat: random_grams(rng, 1.5),
        ingredients: owned(INGREDIENTS),
        warnings: vec!["Contains trans fats from hydrogenated oils".to_string()],
        is_error: None,
    }
}

#[async_trait::async_trait]
impl BarcodeLookup for PlaceholderBarcodeLookup {
    async fn lookup(&self, code: &str) -> Result<TransFatResult, CaptureError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CaptureError::EmptyBarcode);
        }

        tokio::time::sleep(self.delay).await;
        tracing::debug!(code = %code, "Synthesized placeholder barcode result");
        Ok(synthesize(code, &mut rand::thread_rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_names_product_after_code() {
        let lookup = PlaceholderBarcodeLookup::new(Duration::ZERO);

        let result = lookup.lookup(" 0123456789012 ").await.unwrap();

        assert_eq!(result.product_name, "Product (Barcode: 0123456789012)");
        assert_eq!(result.trans_fat_types, TYPES);
        assert_eq!(result.ingredients.len(), INGREDIENTS.len());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.total_trans_fat.ends_with('g'));
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_blank_code_rejected() {
        let lookup = PlaceholderBarcodeLookup::new(Duration::ZERO);
        assert_eq!(
            lookup.lookup("  ").await.unwrap_err(),
            CaptureError::EmptyBarcode
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_simulated_delay() {
        let lookup = PlaceholderBarcodeLookup::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();

        lookup.lookup("42").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
