//! fql multiquery resolution

use serde_json::Value;
use std::collections::BTreeMap;

/// rows of each named query, keyed by query name
pub type MultiqueryResult = BTreeMap<String, Vec<Value>>;

/// reshape `[{name, fql_result_set}, ...]` into `name -> rows`
///
/// returns `None` when the payload is not a multiquery batch, so the caller
/// can pass it through untouched. row order is preserved; if a name repeats,
/// the last entry wins.
pub fn resolve(batch: &Value) -> Option<MultiqueryResult> {
    let entries = batch.as_array()?;
    let mut resolved = MultiqueryResult::new();
    for entry in entries {
        let name = entry.get("name")?.as_str()?;
        let rows = entry.get("fql_result_set")?.as_array()?;
        resolved.insert(name.to_string(), rows.clone());
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_named_sets() {
        let batch = json!([
            {"name": "query1", "fql_result_set": [{"id": 123}]},
            {"name": "query2", "fql_result_set": [{"id": 456}]}
        ]);
        let resolved = resolve(&batch).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["query1"], vec![json!({"id": 123})]);
        assert_eq!(resolved["query2"], vec![json!({"id": 456})]);
    }

    #[test]
    fn test_resolve_keeps_row_order() {
        let batch = json!([{"name": "q", "fql_result_set": [3, 1, 2]}]);
        assert_eq!(resolve(&batch).unwrap()["q"], vec![json!(3), json!(1), json!(2)]);
    }

    #[test]
    fn test_resolve_last_write_wins() {
        let batch = json!([
            {"name": "q", "fql_result_set": [1]},
            {"name": "q", "fql_result_set": [2]}
        ]);
        assert_eq!(resolve(&batch).unwrap()["q"], vec![json!(2)]);
    }

    #[test]
    fn test_resolve_empty_batch() {
        assert!(resolve(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_rejects_other_shapes() {
        assert!(resolve(&json!({"name": "q"})).is_none());
        assert!(resolve(&json!([1, 2])).is_none());
        assert!(resolve(&json!([{"name": "q"}])).is_none());
        assert!(resolve(&json!([{"name": 1, "fql_result_set": []}])).is_none());
        assert!(resolve(&json!([{"name": "q", "fql_result_set": {}}])).is_none());
    }
}
