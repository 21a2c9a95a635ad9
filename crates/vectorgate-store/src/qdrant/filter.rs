//! Filter expression translation
//!
//! Forwards the connector's filter language to the client library's filter
//! type. The `text` key maps to the reserved `_text` payload key.

use qdrant_client::qdrant::{Condition as QdrantCondition, Filter, Range};
use serde_json::Value;

use vectorgate_core::filter::{Condition, FilterExpr};

use super::convert::TEXT_KEY;

pub(crate) fn to_qdrant_filter(expr: &FilterExpr) -> Filter {
    Filter {
        must: expr.must.iter().filter_map(to_condition).collect(),
        must_not: expr.must_not.iter().filter_map(to_condition).collect(),
        ..Default::default()
    }
}

fn payload_key(key: &str) -> String {
    if key == "text" {
        TEXT_KEY.to_string()
    } else {
        key.to_string()
    }
}

fn to_condition(cond: &Condition) -> Option<QdrantCondition> {
    let key = payload_key(&cond.key);

    if let Some(m) = &cond.r#match {
        return match &m.value {
            Value::String(s) => Some(QdrantCondition::matches(key, s.clone())),
            Value::Bool(b) => Some(QdrantCondition::matches(key, *b)),
            // float equality has no match condition on the backend;
            // a degenerate range expresses it
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => QdrantCondition::matches(key, i),
                None => QdrantCondition::range(
                    key,
                    Range { gte: n.as_f64(), lte: n.as_f64(), ..Default::default() },
                ),
            }),
            other => {
                tracing::warn!(key = %cond.key, value = %other, "Unsupported match value in filter, skipping condition");
                None
            }
        };
    }

    if let Some(r) = &cond.range {
        return Some(QdrantCondition::range(
            key,
            Range { gt: r.gt, gte: r.gte, lt: r.lt, lte: r.lte },
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorgate_core::filter::RangeSpec;

    #[test]
    fn test_translates_must_and_must_not() {
        let expr = FilterExpr {
            must: vec![
                Condition::matches("text", "hello"),
                Condition::range("price", RangeSpec { gte: Some(10.0), ..Default::default() }),
            ],
            must_not: vec![Condition::matches("archived", true)],
        };

        let filter = to_qdrant_filter(&expr);
        assert_eq!(filter.must.len(), 2);
        assert_eq!(filter.must_not.len(), 1);
        assert!(filter.should.is_empty());
    }

    #[test]
    fn test_unsupported_match_value_is_skipped() {
        let expr = FilterExpr {
            must: vec![Condition::matches("tags", serde_json::json!(["a", "b"]))],
            must_not: vec![],
        };

        let filter = to_qdrant_filter(&expr);
        assert!(filter.must.is_empty());
    }

    #[test]
    fn test_empty_condition_is_skipped() {
        let expr = FilterExpr {
            must: vec![Condition { key: "price".to_string(), r#match: None, range: None }],
            must_not: vec![],
        };

        let filter = to_qdrant_filter(&expr);
        assert!(filter.must.is_empty());
    }
}
