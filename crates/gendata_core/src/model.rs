//! Capability descriptors.
//!
//! Every generator owns a [`Model`], and every record it produces carries that
//! model. Spawning a generator extends the spawning generator's model, so a
//! model records the ordered lineage of every model it descends from.
//! Membership checks are lookups in that lineage.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A capability descriptor shared by the records of one generator.
///
/// Models are immutable once created and cheap to clone.
#[derive(Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

struct ModelInner {
    id: ModelId,
    name: String,
    parent: Option<Model>,
    /// This model's id followed by every ancestor id, nearest first.
    lineage: Vec<ModelId>,
    properties: Map<String, Value>,
}

impl Model {
    /// Creates a root model with no ancestors.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None, Map::new())
    }

    /// Creates a root model carrying the given properties.
    pub fn with_properties(name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self::build(name.into(), None, properties)
    }

    /// Creates a descendant of this model.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self::build(name.into(), Some(self.clone()), Map::new())
    }

    /// Creates a descendant of this model carrying the given properties.
    pub fn extend_with(&self, name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self::build(name.into(), Some(self.clone()), properties)
    }

    fn build(name: String, parent: Option<Model>, properties: Map<String, Value>) -> Self {
        let id = ModelId::next();
        let mut lineage = vec![id];
        if let Some(parent) = &parent {
            lineage.extend_from_slice(&parent.inner.lineage);
        }
        Self {
            inner: Arc::new(ModelInner {
                id,
                name,
                parent,
                lineage,
                properties,
            }),
        }
    }

    /// Returns the unique id of this model.
    #[inline]
    pub fn id(&self) -> ModelId {
        self.inner.id
    }

    /// Returns the name given at creation.
    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the model this one was extended from.
    #[inline]
    pub fn parent(&self) -> Option<&Model> {
        self.inner.parent.as_ref()
    }

    /// Returns this model's id followed by its ancestors' ids, nearest first.
    #[inline]
    pub fn lineage(&self) -> &[ModelId] {
        &self.inner.lineage
    }

    /// Iterates over this model and its ancestors, nearest first.
    pub fn chain(&self) -> impl Iterator<Item = &Model> {
        std::iter::successors(Some(self), |model| model.parent())
    }

    /// Returns true if `other` is this model or one of its ancestors.
    #[inline]
    pub fn is_a(&self, other: &Model) -> bool {
        self.inner.lineage.contains(&other.id())
    }

    /// Returns the properties defined directly on this model.
    #[inline]
    pub fn own_properties(&self) -> &Map<String, Value> {
        &self.inner.properties
    }

    /// Looks up a property along the chain, nearest definition first.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.chain().find_map(|model| model.inner.properties.get(key))
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Model {}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("lineage", &self.inner.lineage)
            .finish()
    }
}
