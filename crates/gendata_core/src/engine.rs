//! Traversal engine.
//!
//! The engine turns one value into a [`Dataset`]. It keeps a double-ended
//! queue of pending items, each holding only what is needed to materialize a
//! record: a name and the parent record whose value holds the member. Member
//! values are looked up in the parent when the item is visited.
//!
//! For every dequeued item the engine:
//!
//! 1. materializes a [`Record`]
//! 2. runs the pipeline over it
//! 3. applies the `omit` and `exit` flags and accumulates the result
//! 4. when scanning is allowed, lists the members of the (possibly replaced)
//!    value and puts them in front of the queue
//!
//! Putting a node's members in front of its siblings yields a depth-first,
//! pre-order traversal.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::dataset::{Collect, Dataset, Entry};
use crate::value::{is_container, member, members};
use crate::visit::{SharedState, Visit};
use crate::{Flags, GenDataError, Model, Pipeline, Record};

/// An item waiting to be visited.
#[derive(Debug)]
struct Pending {
    name: String,
    source: Source,
}

/// Where the value of a pending item lives.
#[derive(Debug)]
enum Source {
    /// The traversed value itself.
    Root(Value),
    /// The member of the parent record's value named like the item.
    Member(Arc<Record>),
}

static NULL: Value = Value::Null;

impl Pending {
    fn root(value: Value) -> Self {
        Self {
            name: String::new(),
            source: Source::Root(value),
        }
    }

    fn member(name: String, parent: &Arc<Record>) -> Self {
        Self {
            name,
            source: Source::Member(Arc::clone(parent)),
        }
    }

    fn parent(&self) -> Option<&Arc<Record>> {
        match &self.source {
            Source::Root(_) => None,
            Source::Member(parent) => Some(parent),
        }
    }

    /// Value the item was queued with.
    fn value(&self) -> &Value {
        match &self.source {
            Source::Root(value) => value,
            // Parents are frozen once queued, so the member is always there.
            Source::Member(parent) => member(&parent.value, &self.name).unwrap_or(&NULL),
        }
    }
}

/// What the pipeline produced for one node.
struct PipelineOutcome {
    flags: Flags,
    /// Last defined return; `Some(None)` is an allowed undefined return.
    returned: Option<Option<Value>>,
}

/// A single traversal. Owns the queue, the dataset and the shared state.
pub(crate) struct Traversal<'p> {
    pipeline: &'p Pipeline,
    model: &'p Model,
    collect: Collect,
    queue: VecDeque<Pending>,
    dataset: Dataset,
    shared: SharedState,
    visits: usize,
}

impl<'p> Traversal<'p> {
    pub(crate) fn new(root: Value, pipeline: &'p Pipeline, model: &'p Model, collect: Collect) -> Self {
        Self {
            pipeline,
            model,
            collect,
            queue: VecDeque::from([Pending::root(root)]),
            dataset: Dataset::new(),
            shared: SharedState::new(),
            visits: 0,
        }
    }

    /// Runs the traversal to completion, or until a parser asks to exit.
    pub(crate) fn run(mut self) -> Result<Dataset, GenDataError> {
        while let Some(item) = self.queue.pop_front() {
            if self.visit(item)? {
                debug!(
                    "Traversal halted after {} visits ({} pending items dropped)",
                    self.visits,
                    self.queue.len()
                );
                break;
            }
        }

        debug!(
            "Traversal complete: {} visits, {} entries",
            self.visits,
            self.dataset.len()
        );
        Ok(self.dataset)
    }

    /// Visits one node. Returns true if the traversal must halt.
    fn visit(&mut self, item: Pending) -> Result<bool, GenDataError> {
        let value = item.value();
        let parent = item.parent();

        trace!(name = %item.name, index = self.visits, queued = self.queue.len(), "visit");

        let mut record = Record::new(
            item.name.clone(),
            value.clone(),
            parent.cloned(),
            self.model.clone(),
        );
        let PipelineOutcome {
            mut flags,
            returned,
        } = self.run_pipeline(&mut record, &item.name, value, parent)?;
        self.visits += 1;

        if flags.omit {
            record.mark_omitted();
        }

        // Late binding: members are read from whatever the pipeline left.
        let redirect = flags.take_parent_container();
        let record = Arc::new(record);

        if !flags.omit {
            match self.collect {
                Collect::Records => self.dataset.push(Entry::Record(Arc::clone(&record))),
                Collect::Returns => match returned {
                    Some(Some(value)) => self.dataset.push(Entry::Value(value)),
                    Some(None) => self.dataset.push(Entry::Undefined),
                    None => {}
                },
            }
        }

        if flags.exit {
            return Ok(true);
        }

        if flags.scan {
            match redirect {
                Some(source) => {
                    let substitute = substitute_parent(&record, source);
                    self.enqueue_members(&substitute);
                }
                None => {
                    if is_container(&record.value) {
                        self.enqueue_members(&record);
                    }
                }
            }
        }

        Ok(false)
    }

    fn run_pipeline(
        &mut self,
        record: &mut Record,
        name: &str,
        value: &Value,
        parent: Option<&Arc<Record>>,
    ) -> Result<PipelineOutcome, GenDataError> {
        let mut visit = Visit::new(
            name,
            value,
            parent,
            self.pipeline.args(),
            self.visits,
            self.queue.len(),
            &mut self.dataset,
            &mut self.shared,
        );
        let mut returned = None;

        for (index, parser) in self.pipeline.parsers().iter().enumerate() {
            if visit.flags.halts_pipeline() {
                trace!(name = %name, skipped = self.pipeline.len() - index, "pipeline stopped");
                break;
            }
            visit.flags.allow_undefined = false;

            let result = parser
                .parse(record, &mut visit)
                .map_err(|source| GenDataError::parser(name, index, source))?;

            match result {
                Some(value) => returned = Some(Some(value)),
                None if visit.flags.allow_undefined => returned = Some(None),
                None => {}
            }
        }

        Ok(PipelineOutcome {
            flags: visit.into_flags(),
            returned,
        })
    }

    fn enqueue_members(&mut self, parent: &Arc<Record>) {
        let batch = members(&parent.value);
        trace!(name = %parent.name, members = batch.len(), "scan");

        for (name, _) in batch.into_iter().rev() {
            self.queue.push_front(Pending::member(name, parent));
        }
    }
}

/// Wraps a redirected scan source into an omitted record standing in for the
/// current node as parent of the queued members.
fn substitute_parent(record: &Arc<Record>, source: Value) -> Arc<Record> {
    let mut substitute = Record::new(
        record.name.clone(),
        source,
        record.parent().cloned(),
        record.model().clone(),
    );
    substitute.mark_omitted();
    Arc::new(substitute)
}

/// Runs a pipeline over a value with the given model.
pub(crate) fn traverse(
    root: Value,
    pipeline: &Pipeline,
    model: &Model,
    collect: Collect,
) -> Result<Dataset, GenDataError> {
    Traversal::new(root, pipeline, model, collect).run()
}
