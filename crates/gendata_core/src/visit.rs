//! Per-node parser context.
//!
//! A [`Visit`] carries everything a parser may look at or change for the node
//! being processed, apart from the record itself:
//!
//! - the name and value the node was queued with
//! - the parent record
//! - the [`Dataset`] being built
//! - the node's [`Flags`]
//! - the [`SharedState`] of the traversal
//! - the extra arguments passed at the call site
//!
//! # Example
//!
//! ```rust
//! use gendata_core::{GenData, parser_fn};
//! use serde_json::json;
//!
//! let numbers = GenData::new().call_with(
//!     json!({"a": 1, "b": [2, 3]}),
//!     [parser_fn(|record, visit| {
//!         // keep leaves only
//!         visit.flags.omit = record.value.is_object() || record.value.is_array();
//!         Ok(None)
//!     })],
//!     None,
//! )?;
//! assert_eq!(numbers.names(), vec!["a", "0", "1"]);
//! # Ok::<(), gendata_core::GenDataError>(())
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Dataset, Flags, Record};

/// Mutable map shared by every parser call of one traversal.
///
/// Each top-level call starts with an empty state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SharedState(Map<String, Value>);

impl SharedState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments an integer counter stored under `key`, returning the new value.
    ///
    /// Missing or non-integer entries start over from zero.
    pub fn increment(&mut self, key: &str) -> i64 {
        let next = self.0.get(key).and_then(Value::as_i64).unwrap_or(-1) + 1;
        self.0.insert(key.to_string(), Value::from(next));
        next
    }

    /// Consumes the state, returning the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for SharedState {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SharedState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Context handed to parsers for the node being processed.
pub struct Visit<'a> {
    name: &'a str,
    value: &'a Value,
    parent: Option<&'a Arc<Record>>,
    args: &'a [Value],
    index: usize,
    queued: usize,

    /// Loop control flags of this node.
    pub flags: Flags,

    /// The dataset being built. Parsers may rewrite it.
    pub dataset: &'a mut Dataset,

    /// State shared by every parser call of the traversal.
    pub shared: &'a mut SharedState,
}

impl<'a> Visit<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: &'a str,
        value: &'a Value,
        parent: Option<&'a Arc<Record>>,
        args: &'a [Value],
        index: usize,
        queued: usize,
        dataset: &'a mut Dataset,
        shared: &'a mut SharedState,
    ) -> Self {
        Self {
            name,
            value,
            parent,
            args,
            index,
            queued,
            flags: Flags::default(),
            dataset,
            shared,
        }
    }

    /// Name the node was queued with.
    ///
    /// Unaffected by parsers renaming the record.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Value the node was queued with.
    ///
    /// Unaffected by parsers replacing the record value.
    #[inline]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Record whose value sourced this node. `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<&'a Arc<Record>> {
        self.parent
    }

    /// Extra, non-parser arguments given at the call site, in order.
    #[inline]
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Zero-based position of this node in visiting order.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of nodes still waiting to be visited.
    #[inline]
    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Returns true when processing the root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Consumes the context, returning the flags set by the parsers.
    pub(crate) fn into_flags(self) -> Flags {
        self.flags
    }
}
