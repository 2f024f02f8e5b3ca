//! Rendering of an analysis outcome.

use super::escape_html;
use crate::analysis::TransFatResult;

/// Ingredient substrings (lowercase) that get an ingredient flagged.
pub const FLAGGED_TERMS: [&str; 3] = ["hydrogenated", "shortening", "margarine"];

/// Whether an ingredient name suggests trans fat.
#[must_use]
pub fn is_flagged_ingredient(name: &str) -> bool {
    let lower = name.to_lowercase();
    FLAGGED_TERMS.iter().any(|term| lower.contains(term))
}

/// Contents of the result slot: an optional notice, then the result.
#[must_use]
pub fn render_slot(result: Option<&TransFatResult>, notice: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(notice) = notice {
        out.push_str(&format!(
            r#"<div class="notice" role="alert">{}</div>"#,
            escape_html(notice)
        ));
    }
    if let Some(result) = result {
        out.push_str(&render_result(result));
    }
    out
}

/// Render a result as categorized sections.
#[must_use]
pub fn render_result(result: &TransFatResult) -> String {
    let mut sections = vec![status_banner(result)];

    if result.has_trans_fat && !result.trans_fat_types.is_empty() {
        let badges: String = result
            .trans_fat_types
            .iter()
            .map(|t| format!(r#"<span class="badge badge-danger">{}</span>"#, escape_html(t)))
            .collect();
        sections.push(format!(
            r#"<section class="card card-types"><h3>Types of Trans Fats Found</h3><div class="badges">{badges}</div></section>"#
        ));
    }

    if !result.ingredients.is_empty() {
        let badges: String = result
            .ingredients
            .iter()
            .map(|name| {
                let class = if is_flagged_ingredient(name) {
                    "badge badge-danger flagged"
                } else {
                    "badge badge-muted"
                };
                format!(r#"<span class="{class}">{}</span>"#, escape_html(name))
            })
            .collect();
        sections.push(format!(
            r#"<section class="card card-ingredients"><h3>Ingredients</h3><div class="badges">{badges}</div></section>"#
        ));
    }

    if !result.warnings.is_empty() {
        let items: String = result
            .warnings
            .iter()
            .map(|w| format!("<li>{}</li>", escape_html(w)))
            .collect();
        let heading = if result.is_error() {
            "What Went Wrong"
        } else {
            "Health Warnings"
        };
        sections.push(format!(
            r#"<section class="card card-warnings"><h3>{heading}</h3><ul>{items}</ul></section>"#
        ));
    }

    sections.push(EDUCATION.to_string());

    format!(
        r#"<div class="result" data-has-trans-fat="{}" data-error="{}">{}</div>"#,
        result.has_trans_fat,
        result.is_error(),
        sections.concat()
    )
}

fn status_banner(result: &TransFatResult) -> String {
    let (class, message) = if result.is_error() {
        ("status status-error", "Analysis Failed")
    } else if result.has_trans_fat {
        ("status status-positive", "⚠️ Trans Fats Detected!")
    } else {
        ("status status-negative", "✓ No Trans Fats Found!")
    };

    let total = if result.has_trans_fat {
        format!(
            r#"<p class="total">Total Trans Fat: {}</p>"#,
            escape_html(&result.total_trans_fat)
        )
    } else {
        String::new()
    };

    format!(
        r#"<section class="card {class}"><h2>{message}</h2><p class="product">{}</p>{total}</section>"#,
        escape_html(&result.product_name)
    )
}

const EDUCATION: &str = r#"<section class="card card-education"><h3>📚 Did You Know?</h3>
<p><strong>Artificial trans fats</strong> are created through hydrogenation, which adds hydrogen to liquid vegetable oils to make them solid.</p>
<p>The FDA has determined that partially hydrogenated oils (PHOs) are <strong>not Generally Recognized as Safe</strong> for use in food.</p>
<p>Even products labeled as having "0g trans fat" may contain up to <strong>0.5g per serving</strong>.</p>
</section>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn result(has_trans_fat: bool) -> TransFatResult {
        TransFatResult {
            product_name: "Oreos".to_string(),
            has_trans_fat,
            trans_fat_types: vec!["Shortening".to_string()],
            total_trans_fat: "1.5g".to_string(),
            ingredients: vec![
                "Sugar".to_string(),
                "Partially HYDROGENATED Soybean Oil".to_string(),
            ],
            warnings: vec!["May increase LDL cholesterol".to_string()],
            is_error: None,
        }
    }

    #[test]
    fn test_flagged_ingredients() {
        assert!(is_flagged_ingredient("Partially Hydrogenated Oil"));
        assert!(is_flagged_ingredient("Vegetable SHORTENING"));
        assert!(is_flagged_ingredient("stick margarine"));
        assert!(!is_flagged_ingredient("Sugar"));
    }

    #[test]
    fn test_positive_result_sections() {
        let html = render_result(&result(true));

        assert!(html.contains("Trans Fats Detected!"));
        assert!(html.contains("Total Trans Fat: 1.5g"));
        assert!(html.contains("Types of Trans Fats Found"));
        assert!(html.contains(
            r#"<span class="badge badge-danger flagged">Partially HYDROGENATED Soybean Oil</span>"#
        ));
        assert!(html.contains(r#"<span class="badge badge-muted">Sugar</span>"#));
        assert!(html.contains("Health Warnings"));
        assert!(html.contains("Did You Know?"));
    }

    #[test]
    fn test_negative_result_hides_types_and_total() {
        let html = render_result(&result(false));

        assert!(html.contains("No Trans Fats Found!"));
        assert!(!html.contains("Total Trans Fat"));
        assert!(!html.contains("Types of Trans Fats Found"));
        assert!(html.contains("Ingredients"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut r = result(true);
        r.trans_fat_types.clear();
        r.ingredients.clear();
        r.warnings.clear();

        let html = render_result(&r);

        assert!(!html.contains("Types of Trans Fats Found"));
        assert!(!html.contains("<h3>Ingredients</h3>"));
        assert!(!html.contains("Health Warnings"));
        assert!(html.contains("Did You Know?"));
    }

    #[test]
    fn test_error_result_uses_same_path() {
        let html = render_result(&TransFatResult::failure("Oreos", "Missing ANTHROPIC_API_KEY"));

        assert!(html.contains("Analysis Failed"));
        assert!(html.contains("<li>Missing ANTHROPIC_API_KEY</li>"));
        assert!(html.contains(r#"data-error="true""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut r = result(true);
        r.product_name = "<script>alert(1)</script>".to_string();

        let html = render_result(&r);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_slot_with_notice_only() {
        let html = render_slot(None, Some("No barcode was scanned"));
        assert_eq!(
            html,
            r#"<div class="notice" role="alert">No barcode was scanned</div>"#
        );
    }
}
