use std::time::Duration;

use rand::Rng;

use super::{CaptureError, LabelReader, owned, random_grams};
use crate::analysis::TransFatResult;

const TYPES: &[&str] = &["Partially Hydrogenated Vegetable Oil", "Shortening"];

const INGREDIENTS: &[&str] = &[
    "Wheat Flour",
    "Sugar",
    "Partially Hydrogenated Soybean Oil",
    "Corn Syrup",
    "Salt",
    "Leavening Agents",
    "Artificial Flavors",
];

const WARNINGS: &[&str] = &[
    "Contains partially hydrogenated oils",
    "Trans fats may increase heart disease risk",
];

/// An uploaded label photo.
#[derive(Debug, Clone)]
pub struct LabelImage {
    file_name: Option<String>,
    content_type: String,
    bytes: Vec<u8>,
}

impl LabelImage {
    /// Accept an upload if it is a non-empty `image/*`.
    pub fn new(
        file_name: Option<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return Err(CaptureError::NotAnImage(content_type));
        }
        if bytes.is_empty() {
            return Err(CaptureError::EmptyImage);
        }
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Stand-in for label OCR. Not yet integrated: the image is not read.
#[derive(Debug, Clone)]
pub struct PlaceholderLabelReader {
    delay: Duration,
}

impl PlaceholderLabelReader {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

fn synthesize(rng: &mut impl Rng) -> TransFatResult {
    TransFatResult {
        product_name: "Detected Food Product".to_string(),
        has_trans_fat: rng.gen_bool(0.5),
        trans_fat_types: owned(TYPES),
        total_trans_fat: random_grams(rng, 2.0),
        ingredients: owned(INGREDIENTS),
        warnings: owned(WARNINGS),
        is_error: None,
    }
}

#[async_trait::async_trait]
impl LabelReader for PlaceholderLabelReader {
    async fn read_label(&self, image: &LabelImage) -> Result<TransFatResult, CaptureError> {
        tokio::time::sleep(self.delay).await;
        tracing::debug!(
            file_name = ?image.file_name(),
            content_type = %image.content_type(),
            size = image.len(),
            "Synthesized placeholder label result"
        );
        Ok(synthesize(&mut rand::thread_rng()))
    }
}
