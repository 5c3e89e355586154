//! Built-in parsers.
//!
//! These cover the common flattening options and back
//! [`FlattenConfig`](crate::FlattenConfig). Any of them can be curried into a generator like a
//! hand-written parser:
//!
//! ```rust
//! use gendata_core::{Arg, GenData};
//! use gendata_core::parsers::{LeavesOnly, WithPath};
//! use serde_json::json;
//!
//! let paths = GenData::new().spawn([Arg::parser(WithPath::new("/")), Arg::parser(LeavesOnly)]);
//! let dataset = paths.call(json!({"a": {"b": 1}, "c": [true]}))?;
//!
//! let found: Vec<_> = dataset.records().filter_map(|r| r.field("path")).collect();
//! assert_eq!(found, vec!["a/b", "c/0"]);
//! # Ok::<(), gendata_core::GenDataError>(())
//! ```

use crate::value::is_container;
use crate::{ParseResult, Parser, Record, Visit};

/// Field set by [`WithPath`].
pub const PATH_FIELD: &str = "path";

/// Field set by [`WithDepth`].
pub const DEPTH_FIELD: &str = "depth";

/// Annotates each record with the names leading to it from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithPath {
    separator: String,
}

impl WithPath {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for WithPath {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Parser for WithPath {
    fn name(&self) -> &str {
        "with-path"
    }

    fn parse(&self, record: &mut Record, _visit: &mut Visit<'_>) -> ParseResult {
        let path = record.path(&self.separator);
        record.set(PATH_FIELD, path);
        Ok(None)
    }
}

/// Annotates each record with its depth. The root has depth 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithDepth;

impl Parser for WithDepth {
    fn name(&self) -> &str {
        "with-depth"
    }

    fn parse(&self, record: &mut Record, _visit: &mut Visit<'_>) -> ParseResult {
        let depth = record.depth();
        record.set(DEPTH_FIELD, depth);
        Ok(None)
    }
}

/// Keeps nodes at `max` depth but does not scan their members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxDepth(pub usize);

impl Parser for MaxDepth {
    fn name(&self) -> &str {
        "max-depth"
    }

    fn parse(&self, record: &mut Record, visit: &mut Visit<'_>) -> ParseResult {
        if record.depth() >= self.0 {
            visit.flags.scan = false;
        }
        Ok(None)
    }
}

/// Omits container records. Their members are still visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeavesOnly;

impl Parser for LeavesOnly {
    fn name(&self) -> &str {
        "leaves-only"
    }

    fn parse(&self, record: &mut Record, visit: &mut Visit<'_>) -> ParseResult {
        if is_container(&record.value) {
            visit.flags.omit = true;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arg, GenData};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn sample() -> Value {
        json!({"a": {"b": 1, "c": [2, 3]}, "d": 4})
    }

    fn field_values(dataset: &crate::Dataset, key: &str) -> Vec<Value> {
        dataset
            .records()
            .map(|record| record.field(key).cloned().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn test_with_path() {
        let dataset = GenData::new()
            .spawn([Arg::parser(WithPath::default())])
            .call(sample())
            .unwrap();

        assert_eq!(
            field_values(&dataset, PATH_FIELD),
            vec![
                json!(""),
                json!("a"),
                json!("a.b"),
                json!("a.c"),
                json!("a.c.0"),
                json!("a.c.1"),
                json!("d")
            ]
        );
    }

    #[test]
    fn test_with_path_custom_separator() {
        let parser = WithPath::new("/");
        assert_eq!(parser.separator(), "/");

        let dataset = GenData::new()
            .spawn([Arg::parser(parser)])
            .call(json!([[1]]))
            .unwrap();
        assert_eq!(
            field_values(&dataset, PATH_FIELD),
            vec![json!(""), json!("0"), json!("0/0")]
        );
    }

    #[test]
    fn test_with_path_empty_member_name() {
        let dataset = GenData::new()
            .spawn([Arg::parser(WithPath::default())])
            .call(json!({"": {"a": 1}, "a": 2}))
            .unwrap();

        assert_eq!(dataset.names(), vec!["", "", "a", "a"]);
        assert_eq!(
            field_values(&dataset, PATH_FIELD),
            vec![json!(""), json!(""), json!(".a"), json!("a")]
        );
    }

    #[test]
    fn test_with_depth() {
        let dataset = GenData::new()
            .spawn([Arg::parser(WithDepth)])
            .call(sample())
            .unwrap();

        assert_eq!(
            field_values(&dataset, DEPTH_FIELD),
            vec![json!(0), json!(1), json!(2), json!(2), json!(3), json!(3), json!(1)]
        );
    }

    #[rstest]
    #[case::root_only(0, vec![""])]
    #[case::first_level(1, vec!["", "a", "d"])]
    #[case::second_level(2, vec!["", "a", "b", "c", "d"])]
    #[case::unbounded(10, vec!["", "a", "b", "c", "0", "1", "d"])]
    fn test_max_depth(#[case] max: usize, #[case] expected: Vec<&str>) {
        let dataset = GenData::new()
            .spawn([Arg::parser(MaxDepth(max))])
            .call(sample())
            .unwrap();
        assert_eq!(dataset.names(), expected);
    }

    #[test]
    fn test_leaves_only() {
        let dataset = GenData::new()
            .spawn([Arg::parser(LeavesOnly)])
            .call(sample())
            .unwrap();

        assert_eq!(dataset.names(), vec!["b", "0", "1", "d"]);
        let parent = dataset.records().next().unwrap().parent().unwrap();
        assert!(parent.is_omitted());
    }

    #[test]
    fn test_leaves_only_keeps_scalar_root() {
        let dataset = GenData::new()
            .spawn([Arg::parser(LeavesOnly)])
            .call(json!("x"))
            .unwrap();
        assert_eq!(dataset.names(), vec![""]);
    }

    #[test]
    fn test_parser_names() {
        assert_eq!(WithPath::default().name(), "with-path");
        assert_eq!(WithDepth.name(), "with-depth");
        assert_eq!(MaxDepth(1).name(), "max-depth");
        assert_eq!(LeavesOnly.name(), "leaves-only");
    }
}
