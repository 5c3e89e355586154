//! Record definition.
//!
//! A [`Record`] is materialized for every visited node. Parsers receive it
//! mutably while the pipeline runs; afterwards the engine freezes it behind an
//! `Arc` so it can be shared between the dataset and the children that name
//! it as their parent.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Model;

/// Key under which omitted records are tagged when serialized.
pub const OMITTED_KEY: &str = "_OMITTED";

/// A visited node.
#[derive(Debug, Clone)]
pub struct Record {
    /// Member name of the node. Empty for the root.
    pub name: String,

    /// Value of the node. Its members are scanned once the pipeline is done.
    pub value: Value,

    parent: Option<Arc<Record>>,
    fields: Map<String, Value>,
    omitted: bool,
    model: Model,
}

impl Record {
    pub(crate) fn new(
        name: impl Into<String>,
        value: Value,
        parent: Option<Arc<Record>>,
        model: Model,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            parent,
            fields: Map::new(),
            omitted: false,
            model,
        }
    }

    /// Returns the record whose value sourced this one.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<Record>> {
        self.parent.as_ref()
    }

    /// Returns true if the record was left out of the dataset.
    #[inline]
    pub fn is_omitted(&self) -> bool {
        self.omitted
    }

    pub(crate) fn mark_omitted(&mut self) {
        self.omitted = true;
    }

    /// Returns the capability descriptor this record was produced with.
    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns true if the record's model is `model` or descends from it.
    #[inline]
    pub fn is_a(&self, model: &Model) -> bool {
        self.model.is_a(model)
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Removes a field added by a parser.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Returns a field set on this record.
    #[inline]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a mutable reference to a field set on this record.
    #[inline]
    pub fn field_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Looks up a key on the record, then along its model chain.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).or_else(|| self.model.property(key))
    }

    /// Returns all fields set on this record.
    #[inline]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Iterates over the ancestors of this record, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Arc<Record>> {
        std::iter::successors(self.parent.as_ref(), |record| record.parent.as_ref())
    }

    /// Number of ancestors. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Returns true for the record the traversal started from.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Joins the names from the root down to this record.
    ///
    /// The root itself contributes no segment, so the root's path is empty.
    /// Empty member names are kept as empty segments.
    pub fn path(&self, separator: &str) -> String {
        let mut names: Vec<&str> = std::iter::once(self)
            .chain(self.ancestors().map(|record| &**record))
            .filter(|record| !record.is_root())
            .map(|record| record.name.as_str())
            .collect();
        names.reverse();
        names.join(separator)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let extra = self
            .fields
            .iter()
            .filter(|(key, _)| !is_reserved(key));

        let mut state = serializer.serialize_map(None)?;
        state.serialize_entry("name", &self.name)?;
        state.serialize_entry("value", &self.value)?;
        for (key, value) in extra {
            state.serialize_entry(key, value)?;
        }
        if self.omitted {
            state.serialize_entry(OMITTED_KEY, &true)?;
        }
        state.end()
    }
}

fn is_reserved(key: &str) -> bool {
    matches!(key, "name" | "value" | OMITTED_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn model() -> Model {
        Model::new("test")
    }

    fn chain() -> Record {
        let root = Arc::new(Record::new("", json!({"a": {"b": 1}}), None, model()));
        let a = Arc::new(Record::new("a", json!({"b": 1}), Some(root), model()));
        Record::new("b", json!(1), Some(a), model())
    }

    #[test]
    fn test_new_record_has_no_fields() {
        let record = Record::new("", json!(1), None, model());
        assert!(record.fields().is_empty());
        assert!(record.parent().is_none());
        assert!(!record.is_omitted());
    }

    #[test]
    fn test_depth_and_path() {
        let record = chain();
        assert_eq!(record.depth(), 2);
        assert_eq!(record.path("."), "a.b");
        assert_eq!(record.path("/"), "a/b");

        let root = Record::new("", json!(null), None, model());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.path("."), "");
        assert!(root.is_root());
        assert!(!record.is_root());
    }

    #[test]
    fn test_path_keeps_empty_member_names() {
        let root = Arc::new(Record::new("", json!({"": {"a": 1}}), None, model()));
        let empty = Arc::new(Record::new("", json!({"a": 1}), Some(root), model()));
        let a = Record::new("a", json!(1), Some(Arc::clone(&empty)), model());

        assert!(!empty.is_root());
        assert_eq!(a.path("."), ".a");
        assert_eq!(a.path("/"), "/a");
    }

    #[test]
    fn test_fields() {
        let mut record = Record::new("x", json!(1), None, model());
        assert_eq!(record.set("id", "foo"), None);
        assert_eq!(record.set("id", "FOO"), Some(json!("foo")));
        assert_eq!(record.field("id"), Some(&json!("FOO")));

        if let Some(Value::String(id)) = record.field_mut("id") {
            id.push('!');
        }
        assert_eq!(record.field("id"), Some(&json!("FOO!")));
        assert_eq!(record.remove("id"), Some(json!("FOO!")));
        assert_eq!(record.field("id"), None);
    }

    #[test]
    fn test_get_falls_back_to_model() {
        let mut properties = Map::new();
        properties.insert("kind".to_string(), json!("base"));
        let mut record = Record::new("x", json!(1), None, Model::with_properties("m", properties));

        assert_eq!(record.get("kind"), Some(&json!("base")));
        record.set("kind", "own");
        assert_eq!(record.get("kind"), Some(&json!("own")));
    }

    #[test]
    fn test_serialization() {
        let mut record = chain();
        record.set("id", 7);
        record.mark_omitted();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({"name": "b", "value": 1, "id": 7, "_OMITTED": true})
        );
    }

    #[test]
    fn test_serialization_skips_reserved_fields() {
        let mut record = Record::new("x", json!(1), None, model());
        record.set("name", "shadow");
        record.set(OMITTED_KEY, false);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({"name": "x", "value": 1}));
    }
}
