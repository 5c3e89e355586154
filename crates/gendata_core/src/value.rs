//! Member discovery for traversed values.
//!
//! Objects and arrays are containers: their own members are enumerated in
//! natural order (object insertion order, then ascending array index).
//! Everything else is a leaf.

use serde_json::Value;

/// Returns true if the value has enumerable members.
#[inline]
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Lists the own members of a value as `(name, value)` pairs.
///
/// Array members are named by their index. Leaves yield nothing.
pub fn members(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Looks up a member by the name [`members`] gives it.
pub fn member<'v>(value: &'v Value, name: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(name),
        Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Counts the members of a value, recursively.
pub fn count_members(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(|v| 1 + count_members(v)).sum(),
        Value::Array(items) => items.iter().map(|v| 1 + count_members(v)).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::object(json!({"a": 1}), true)]
    #[case::empty_object(json!({}), true)]
    #[case::array(json!([1]), true)]
    #[case::string(json!("abc"), false)]
    #[case::number(json!(1.5), false)]
    #[case::boolean(json!(false), false)]
    #[case::null(json!(null), false)]
    fn test_is_container(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_container(&value), expected);
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let value = json!({"zeta": 1, "alpha": 2, "mid": 3});
        let names: Vec<_> = members(&value).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_array_members_are_indexed() {
        let value = json!(["a", "b"]);
        assert_eq!(
            members(&value),
            vec![("0".to_string(), &json!("a")), ("1".to_string(), &json!("b"))]
        );
    }

    #[test]
    fn test_leaf_has_no_members() {
        assert!(members(&json!("hello world")).is_empty());
    }

    #[rstest]
    #[case::key(json!({"a": 1, "": 2}), "", Some(json!(2)))]
    #[case::index(json!([1, [2]]), "1", Some(json!([2])))]
    #[case::index_out_of_range(json!([1]), "3", None)]
    #[case::not_an_index(json!([1]), "x", None)]
    #[case::leaf(json!("abc"), "0", None)]
    fn test_member_lookup(#[case] value: Value, #[case] name: &str, #[case] expected: Option<Value>) {
        assert_eq!(member(&value, name), expected.as_ref());
    }

    #[test]
    fn test_count_members() {
        let value = json!({"foo": {"bop": 10, "echo": {"lucky": 20}}, "loop": 60});
        assert_eq!(count_members(&value), 5);
        assert_eq!(count_members(&json!(1)), 0);
    }
}
