//! The verdict shape shared by every input mode and the result view.

use serde::{Deserialize, Serialize};

use super::contract::AnalysisReply;

/// `totalTransFat` when the provider reports trans fat.
pub const TOTAL_PRESENT: &str = "Present";
/// `totalTransFat` when the provider reports none.
pub const TOTAL_NONE: &str = "0g";
/// `totalTransFat` of a failure placeholder.
pub const TOTAL_UNKNOWN: &str = "Unknown";

/// Warning used when a failure carries no message of its own.
pub const GENERIC_FAILURE: &str = "Failed to analyze product";

/// Outcome of analysing one product.
///
/// Always fully formed before it reaches the result view; it is replaced
/// wholesale on the next analysis and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransFatResult {
    /// Display label for the analysed item.
    pub product_name: String,
    /// The verdict.
    pub has_trans_fat: bool,
    /// Trans-fat-bearing ingredient classes, most relevant first.
    pub trans_fat_types: Vec<String>,
    /// Free-form display amount ("1.5g", "Present", "0g", "Unknown").
    pub total_trans_fat: String,
    /// Ingredient names in label order.
    pub ingredients: Vec<String>,
    /// Human-readable cautions.
    pub warnings: Vec<String>,
    /// Set when this result is a failure placeholder rather than a verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl TransFatResult {
    /// Map a provider reply relayed by the analysis endpoint.
    ///
    /// The reply's `ingredients` feed both `transFatTypes` and `ingredients`,
    /// its `reasons` become `warnings`; absent lists become empty.
    #[must_use]
    pub fn from_reply(product_name: impl Into<String>, reply: AnalysisReply) -> Self {
        let ingredients = reply.ingredients.unwrap_or_default();
        let total = if reply.has_trans_fat {
            TOTAL_PRESENT
        } else {
            TOTAL_NONE
        };

        Self {
            product_name: product_name.into(),
            has_trans_fat: reply.has_trans_fat,
            trans_fat_types: ingredients.clone(),
            total_trans_fat: total.to_string(),
            ingredients,
            warnings: reply.reasons.unwrap_or_default(),
            is_error: None,
        }
    }

    /// A failure placeholder carrying `message` as its only warning.
    #[must_use]
    pub fn failure(product_name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        };

        Self {
            product_name: product_name.into(),
            has_trans_fat: false,
            trans_fat_types: Vec::new(),
            total_trans_fat: TOTAL_UNKNOWN.to_string(),
            ingredients: Vec::new(),
            warnings: vec![message],
            is_error: Some(true),
        }
    }

    /// Whether this is a failure placeholder.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}
