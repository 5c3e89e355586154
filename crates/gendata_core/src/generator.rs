//! Generators.
//!
//! A [`GenData`] bundles curried parsers with a [`Model`]. The base engine is
//! a generator with no parsers; every generator can spawn descendants that
//! run its parsers first and whose model extends its own.
//!
//! # Example
//!
//! ```rust
//! use gendata_core::{GenData, parser_fn};
//! use serde_json::json;
//!
//! let with_id = GenData::new().spawn([parser_fn(|record, _| {
//!     record.set("id", "foo");
//!     Ok(None)
//! })]);
//! let upper = with_id.spawn([parser_fn(|record, _| {
//!     let id = record.field("id").and_then(|id| id.as_str()).unwrap_or_default();
//!     let id = id.to_uppercase();
//!     record.set("id", id);
//!     Ok(None)
//! })]);
//!
//! let dataset = upper.call(json!(1))?;
//! let record = dataset.records().next().unwrap();
//! assert_eq!(record.field("id"), Some(&json!("FOO")));
//! assert!(upper.owns(record));
//! assert!(with_id.owns(record));
//! # Ok::<(), gendata_core::GenDataError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::dataset::{Collect, Dataset};
use crate::engine::traverse;
use crate::{Arg, GenDataError, Model, Parser, Pipeline, Record};

/// Name of the base engine's model.
pub const BASE_MODEL_NAME: &str = "genData";

/// A reusable traversal configuration: curried parsers plus a model.
///
/// Cloning is cheap; clones share the same parsers and model.
#[derive(Clone)]
pub struct GenData {
    inner: Arc<Inner>,
}

struct Inner {
    parsers: Arc<[Arc<dyn Parser>]>,
    model: Model,
    collect: Collect,
}

/// Explicit call shapes accepted by [`GenData::dispatch`].
#[derive(Debug, Clone)]
pub enum Call {
    /// Produce an inert instance of the generator's model, for extension only.
    Construct,
    /// Traverse a value.
    Invoke {
        /// Value to flatten.
        value: Value,
        /// Call-site parsers and passthrough values.
        args: Vec<Arg>,
        /// Model replacing the generator's own for the produced records.
        model: Option<Model>,
    },
    /// Spawn a descendant generator.
    Spawn {
        /// Parsers to curry after the generator's own.
        args: Vec<Arg>,
    },
}

/// Result of [`GenData::dispatch`], one variant per call shape.
#[derive(Debug)]
pub enum Outcome {
    /// Inert model instance.
    Instance(Model),
    /// Dataset of a traversal.
    Dataset(Dataset),
    /// Spawned generator.
    Generator(GenData),
}

impl Outcome {
    /// Returns the dataset, if the call was an invocation.
    pub fn into_dataset(self) -> Option<Dataset> {
        match self {
            Outcome::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Returns the generator, if the call was a spawn.
    pub fn into_generator(self) -> Option<GenData> {
        match self {
            Outcome::Generator(generator) => Some(generator),
            _ => None,
        }
    }

    /// Returns the instance, if the call was a construction.
    pub fn into_instance(self) -> Option<Model> {
        match self {
            Outcome::Instance(model) => Some(model),
            _ => None,
        }
    }
}

impl GenData {
    /// Creates the base engine: no parsers and its own root model.
    pub fn new() -> Self {
        Self::from_parts(Arc::from(Vec::new()), Model::new(BASE_MODEL_NAME), Collect::Records)
    }

    /// Creates a base engine that collects with the given policy.
    pub fn with_collect(collect: Collect) -> Self {
        Self::from_parts(Arc::from(Vec::new()), Model::new(BASE_MODEL_NAME), collect)
    }

    fn from_parts(parsers: Arc<[Arc<dyn Parser>]>, model: Model, collect: Collect) -> Self {
        Self {
            inner: Arc::new(Inner {
                parsers,
                model,
                collect,
            }),
        }
    }

    /// Returns the model given to produced records by default.
    #[inline]
    pub fn model(&self) -> &Model {
        &self.inner.model
    }

    /// Returns the generator's name.
    #[inline]
    pub fn name(&self) -> &str {
        self.inner.model.name()
    }

    /// Returns the curried parsers, in running order.
    #[inline]
    pub fn parsers(&self) -> &[Arc<dyn Parser>] {
        &self.inner.parsers
    }

    /// Returns the collection policy.
    #[inline]
    pub fn collect(&self) -> Collect {
        self.inner.collect
    }

    /// Flattens a value with the curried parsers only.
    pub fn call(&self, value: impl Into<Value>) -> Result<Dataset, GenDataError> {
        self.call_with(value, [], None)
    }

    /// Flattens a value.
    ///
    /// `args` are appended to the curried parsers; passthrough values in it
    /// are exposed to parsers through [`Visit::args`](crate::Visit::args).
    /// `model` replaces the generator's model for the produced records.
    pub fn call_with(
        &self,
        value: impl Into<Value>,
        args: impl IntoIterator<Item = Arg>,
        model: Option<Model>,
    ) -> Result<Dataset, GenDataError> {
        let pipeline = Pipeline::curried(&self.inner.parsers, args);
        let model = model.as_ref().unwrap_or(&self.inner.model);
        traverse(value.into(), &pipeline, model, self.inner.collect)
    }

    /// Returns an inert instance of this generator's model.
    ///
    /// It runs no parser and produces no data; it only serves to extend the
    /// capability chain.
    pub fn construct(&self) -> Model {
        self.inner.model.clone()
    }

    /// Spawns a descendant that runs this generator's parsers, then `args`.
    ///
    /// Passthrough values are dropped; only parsers are curried.
    pub fn spawn(&self, args: impl IntoIterator<Item = Arg>) -> GenData {
        self.builder().args(args).build()
    }

    /// Starts configuring a descendant generator.
    pub fn builder(&self) -> GeneratorBuilder {
        GeneratorBuilder::new(self.clone())
    }

    /// Runs an explicit call shape.
    pub fn dispatch(&self, call: Call) -> Result<Outcome, GenDataError> {
        match call {
            Call::Construct => Ok(Outcome::Instance(self.construct())),
            Call::Invoke { value, args, model } => {
                self.call_with(value, args, model).map(Outcome::Dataset)
            }
            Call::Spawn { args } => Ok(Outcome::Generator(self.spawn(args))),
        }
    }

    /// Returns true if the record's model is this generator's model or a
    /// descendant of it.
    #[inline]
    pub fn owns(&self, record: &Record) -> bool {
        record.is_a(&self.inner.model)
    }

    /// Returns true if this generator was spawned from `other`, directly or not,
    /// or is `other`.
    #[inline]
    pub fn descends_from(&self, other: &GenData) -> bool {
        self.inner.model.is_a(&other.inner.model)
    }
}

impl Default for GenData {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenData")
            .field("model", &self.inner.model)
            .field(
                "parsers",
                &self.inner.parsers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("collect", &self.inner.collect)
            .finish()
    }
}

/// Builder for descendant generators.
#[must_use]
pub struct GeneratorBuilder {
    parent: GenData,
    name: Option<String>,
    parsers: Vec<Arc<dyn Parser>>,
    properties: Map<String, Value>,
    collect: Option<Collect>,
}

impl GeneratorBuilder {
    fn new(parent: GenData) -> Self {
        Self {
            parent,
            name: None,
            parsers: Vec::new(),
            properties: Map::new(),
            collect: None,
        }
    }

    /// Names the descendant's model.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a parser.
    pub fn parser<P>(mut self, parser: P) -> Self
    where
        P: Parser + 'static,
    {
        self.parsers.push(Arc::new(parser));
        self
    }

    /// Adds the parsers found in `args`, dropping passthrough values.
    pub fn args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.parsers.extend(args.into_iter().filter_map(|arg| match arg {
            Arg::Parser(parser) => Some(parser),
            Arg::Extra(_) => None,
        }));
        self
    }

    /// Defines a property inherited by the descendant's records.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Overrides the collection policy inherited from the parent.
    pub fn collect(mut self, collect: Collect) -> Self {
        self.collect = Some(collect);
        self
    }

    /// Builds the descendant.
    pub fn build(self) -> GenData {
        let name = self
            .name
            .unwrap_or_else(|| format!("{}.spawn", self.parent.name()));
        let model = self.parent.construct().extend_with(name, self.properties);

        let parsers: Vec<Arc<dyn Parser>> = self
            .parent
            .parsers()
            .iter()
            .cloned()
            .chain(self.parsers)
            .collect();
        let collect = self.collect.unwrap_or(self.parent.collect());

        debug!(
            "Spawned generator {} ({} parsers, lineage depth {})",
            model.name(),
            parsers.len(),
            model.lineage().len()
        );

        GenData::from_parts(Arc::from(parsers), model, collect)
    }
}

impl Record {
    /// Returns true if the record was produced by `generator` or one of its
    /// descendants.
    pub fn is_from(&self, generator: &GenData) -> bool {
        generator.owns(self)
    }
}

/// Flattens a value with the base engine.
pub fn flatten(value: impl Into<Value>) -> Result<Dataset, GenDataError> {
    GenData::new().call(value)
}
