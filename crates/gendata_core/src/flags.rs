//! Per-node control flags.
//!
//! A fresh [`Flags`] value is handed to the pipeline for every visited node.
//! Parsers set the flags to steer the engine; the engine reads them once the
//! pipeline pass is over and then discards them.

use serde_json::Value;

/// Loop control directives for a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct Flags {
    /// Excludes the record from the dataset. The record is tagged as omitted
    /// and still serves as the parent of its children.
    pub omit: bool,

    /// Queues the members of the node. Default: true.
    pub scan: bool,

    /// Stops the remaining parsers and halts the whole traversal once the
    /// node has been accumulated.
    pub exit: bool,

    /// Stops the remaining parsers for this node only.
    pub stop: bool,

    /// Substitute container whose members are queued instead of the record
    /// value. Scalars are ignored.
    pub parent: Option<Value>,

    /// Counts a `None` return of the current parser as a defined result when
    /// collecting returns. Reset before each parser call.
    pub allow_undefined: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            omit: false,
            scan: true,
            exit: false,
            stop: false,
            parent: None,
            allow_undefined: false,
        }
    }
}

impl Flags {
    /// Creates flags with their per-node defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no further parser should run for the node.
    #[inline]
    pub fn halts_pipeline(&self) -> bool {
        self.exit || self.stop
    }

    /// Takes the substitute scan source, if it is a container.
    pub(crate) fn take_parent_container(&mut self) -> Option<Value> {
        self.parent.take().filter(crate::value::is_container)
    }
}
