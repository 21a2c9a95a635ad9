//! Structured filter expressions
//!
//! The filter language mirrors the storage backend's native filter JSON:
//! conjunctive `must` / `must_not` clause lists over per-key match and
//! range conditions. The expression is forwarded to the backend as-is;
//! local evaluation exists so the in-memory adapter and tests apply the
//! same predicate the remote store applies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Document;

/// A conjunctive filter over document tags and text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Conditions every document must satisfy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Condition>,

    /// Conditions no document may satisfy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Condition>,
}

impl FilterExpr {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty()
    }

    /// Evaluate the expression against a single document.
    ///
    /// An empty expression matches every document.
    pub fn matches(&self, doc: &Document) -> bool {
        self.must.iter().all(|c| c.eval(doc)) && !self.must_not.iter().any(|c| c.eval(doc))
    }
}

/// A single per-key condition; exactly one predicate is expected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Tag key, or `"text"` for the document's text content
    pub key: String,

    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub r#match: Option<MatchValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeSpec>,
}

impl Condition {
    /// Equality condition on a key
    pub fn matches(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            r#match: Some(MatchValue { value: value.into() }),
            range: None,
        }
    }

    /// Numeric range condition on a key
    pub fn range(key: impl Into<String>, range: RangeSpec) -> Self {
        Self {
            key: key.into(),
            r#match: None,
            range: Some(range),
        }
    }

    fn eval(&self, doc: &Document) -> bool {
        let value = if self.key == "text" {
            doc.text.clone().map(Value::String)
        } else {
            doc.tags.get(&self.key).cloned()
        };

        let Some(value) = value else {
            return false;
        };

        if let Some(m) = &self.r#match {
            return values_equal(&value, &m.value);
        }
        if let Some(r) = &self.range {
            return value.as_f64().is_some_and(|v| r.contains(v));
        }

        // A condition with no predicate constrains nothing
        true
    }
}

/// Equality predicate payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchValue {
    pub value: Value,
}

/// Numeric range predicate; unset bounds are unconstrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

impl RangeSpec {
    pub fn contains(&self, v: f64) -> bool {
        self.gt.is_none_or(|b| v > b)
            && self.gte.is_none_or(|b| v >= b)
            && self.lt.is_none_or(|b| v < b)
            && self.lte.is_none_or(|b| v <= b)
    }
}

/// Compare tag values, treating all JSON numbers as f64
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use proptest::prelude::*;

    fn priced(id: &str, price: f64) -> Document {
        Document::new(id).with_tag("price", price)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = FilterExpr::default();
        assert!(filter.matches(&Document::new("a")));
    }

    #[test]
    fn test_match_on_text() {
        let filter = FilterExpr {
            must: vec![Condition::matches("text", "hello")],
            must_not: vec![],
        };
        assert!(filter.matches(&Document::new("a").with_text("hello")));
        assert!(!filter.matches(&Document::new("b").with_text("world")));
        assert!(!filter.matches(&Document::new("c")));
    }

    #[test]
    fn test_match_numeric_coercion() {
        let filter = FilterExpr {
            must: vec![Condition::matches("price", 3)],
            must_not: vec![],
        };
        // integer condition matches float tag of equal value
        assert!(filter.matches(&priced("a", 3.0)));
        assert!(!filter.matches(&priced("b", 4.0)));
    }

    #[test]
    fn test_range_condition() {
        let filter = FilterExpr {
            must: vec![Condition::range(
                "price",
                RangeSpec { gte: Some(0.5), ..Default::default() },
            )],
            must_not: vec![],
        };
        assert!(filter.matches(&priced("a", 0.8)));
        assert!(filter.matches(&priced("b", 0.5)));
        assert!(!filter.matches(&priced("c", 0.3)));
    }

    #[test]
    fn test_range_on_non_numeric_tag_fails() {
        let filter = FilterExpr {
            must: vec![Condition::range(
                "price",
                RangeSpec { gte: Some(0.0), ..Default::default() },
            )],
            must_not: vec![],
        };
        let doc = Document::new("a").with_tag("price", "cheap");
        assert!(!filter.matches(&doc));
    }

    #[test]
    fn test_missing_key_fails_must_passes_must_not() {
        let must = FilterExpr {
            must: vec![Condition::matches("color", "red")],
            must_not: vec![],
        };
        let must_not = FilterExpr {
            must: vec![],
            must_not: vec![Condition::matches("color", "red")],
        };
        let doc = Document::new("a");
        assert!(!must.matches(&doc));
        assert!(must_not.matches(&doc));
    }

    #[test]
    fn test_deserialize_backend_filter_shape() {
        let json = r#"{"must":[{"key":"price","range":{"gte":10}}]}"#;
        let filter: FilterExpr = serde_json::from_str(json).unwrap();
        assert_eq!(filter.must.len(), 1);
        assert_eq!(filter.must[0].key, "price");
        assert_eq!(filter.must[0].range.unwrap().gte, Some(10.0));
    }

    proptest! {
        #[test]
        fn prop_range_bounds_respected(a in -1e3..1e3f64, b in -1e3..1e3f64, x in -1e3..1e3f64) {
            let (lo, hi) = (a.min(b), a.max(b));
            let range = RangeSpec { gte: Some(lo), lte: Some(hi), ..Default::default() };
            prop_assert_eq!(range.contains(x), x >= lo && x <= hi);
        }

        #[test]
        fn prop_strict_bounds_exclude_endpoints(bound in -1e3..1e3f64) {
            let gt = RangeSpec { gt: Some(bound), ..Default::default() };
            let lt = RangeSpec { lt: Some(bound), ..Default::default() };
            prop_assert!(!gt.contains(bound));
            prop_assert!(!lt.contains(bound));
        }
    }
}
