//! The fixed prompt sent to the provider.

/// Guidance listed in the prompt. Classification is left to the provider;
/// this is not a lookup table.
pub const TRANS_FAT_INDICATORS: &[&str] = &[
    "Partially hydrogenated oils (vegetable oil, soybean oil, etc.)",
    "Hydrogenated oils",
    "Shortening",
    "Margarine (some types)",
    "Fried foods (especially from restaurants)",
    "Baked goods (cookies, crackers, pastries, pie crusts)",
    "Microwave popcorn",
    "Frozen pizza",
    "Non-dairy creamers",
    "Stick margarine",
];

const REPLY_SHAPE: &str = r#"{
  "hasTransFat": boolean,
  "confidence": "high" | "medium" | "low",
  "reasons": ["reason 1", "reason 2", ...],
  "ingredients": ["ingredient 1", "ingredient 2", ...] (list any trans-fat-containing ingredients found),
  "recommendation": "a brief recommendation for the user"
}"#;

/// Build the analysis prompt around the user's text.
///
/// `product_text` is embedded verbatim.
#[must_use]
pub fn build_prompt(product_text: &str) -> String {
    let indicators = TRANS_FAT_INDICATORS
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a nutrition expert analyzing food products for trans fats. \
         Analyze the following product name or ingredient list and determine if it likely contains trans fats.\n\
         \n\
         Product/Ingredients: {product_text}\n\
         \n\
         Provide your response in the following JSON format:\n\
         {REPLY_SHAPE}\n\
         \n\
         Trans fat indicators include:\n\
         {indicators}\n\
         \n\
         Respond ONLY with valid JSON, no additional text."
    )
}
