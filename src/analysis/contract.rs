//! Request and reply contracts of the analysis endpoint.
//!
//! [`AnalysisRequest`] is what the client posts. [`AnalysisReply`] is the
//! shape the provider is asked to answer with; it is deserialized leniently
//! on the client side, and [`inspect`] reports how far a parsed reply
//! strays from it on the server side.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/analyze-product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Product name or pasted ingredient text.
    pub product_text: String,
}

/// Provider confidence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// The provider's verdict as relayed by the endpoint.
///
/// Every field tolerates absence: a missing `hasTransFat` reads as `false`,
/// missing or `null` lists as `None`. See [`AnalysisReply::from_value`] for
/// reading replies whose fields have the wrong types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReply {
    #[serde(default)]
    pub has_trans_fat: bool,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub reasons: Option<Vec<String>>,
    /// Ingredients found that contain trans fat (not the full list).
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl AnalysisReply {
    /// Read a relayed reply without rejecting it.
    ///
    /// The endpoint may forward replies that stray from the agreed shape, so
    /// each field is taken only when it has the expected type: a non-boolean
    /// `hasTransFat` reads as `false`, non-string list items are dropped, and
    /// anything else unexpected reads as absent.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let text = |field: &str| value.get(field).and_then(Value::as_str).map(str::to_string);
        let list = |field: &str| {
            value.get(field).and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
        };

        Self {
            has_trans_fat: value
                .get("hasTransFat")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            confidence: text("confidence"),
            reasons: list("reasons"),
            ingredients: list("ingredients"),
            recommendation: text("recommendation"),
        }
    }

    /// The confidence as a known level, if it is one.
    #[must_use]
    pub fn confidence_level(&self) -> Option<Confidence> {
        self.confidence.as_deref().and_then(Confidence::parse)
    }
}

/// What is wrong with one field of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Missing,
    WrongType(&'static str),
    UnknownValue,
    NotAnObject,
}

/// A deviation of a parsed reply from [`AnalysisReply`]'s shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub field: &'static str,
    pub problem: Problem,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            Problem::Missing => write!(f, "{} is missing", self.field),
            Problem::WrongType(expected) => write!(f, "{} should be {expected}", self.field),
            Problem::UnknownValue => write!(f, "{} has an unexpected value", self.field),
            Problem::NotAnObject => write!(f, "reply is not a JSON object"),
        }
    }
}

/// Check a parsed provider reply against the expected shape.
///
/// Returns every issue found; an empty list means the reply conforms.
#[must_use]
pub fn inspect(value: &Value) -> Vec<SchemaIssue> {
    let Some(obj) = value.as_object() else {
        return vec![SchemaIssue {
            field: "$",
            problem: Problem::NotAnObject,
        }];
    };

    let mut issues = Vec::new();
    let mut report = |field: &'static str, problem: Problem| {
        issues.push(SchemaIssue { field, problem });
    };

    match obj.get("hasTransFat") {
        None => report("hasTransFat", Problem::Missing),
        Some(v) if !v.is_boolean() => report("hasTransFat", Problem::WrongType("a boolean")),
        Some(_) => {}
    }

    match obj.get("confidence") {
        None => report("confidence", Problem::Missing),
        Some(Value::String(s)) if Confidence::parse(s).is_none() => {
            report("confidence", Problem::UnknownValue);
        }
        Some(Value::String(_)) => {}
        Some(_) => report("confidence", Problem::WrongType("a string")),
    }

    for field in ["reasons", "ingredients"] {
        match obj.get(field) {
            None => report(field, Problem::Missing),
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
            Some(_) => report(field, Problem::WrongType("an array of strings")),
        }
    }

    match obj.get("recommendation") {
        None => report("recommendation", Problem::Missing),
        Some(v) if !v.is_string() => report("recommendation", Problem::WrongType("a string")),
        Some(_) => {}
    }

    issues
}
