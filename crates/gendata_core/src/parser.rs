//! Parser pipeline.
//!
//! Parsers are the stages run for every visited node. They implement the
//! [`Parser`] trait; plain closures do so through a blanket implementation and
//! are usually wrapped with [`parser_fn`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{ParserError, Record, Visit};

/// Result of a parser call.
///
/// `Ok(Some(value))` is a defined return, collected when the generator gathers
/// returns instead of records.
pub type ParseResult = Result<Option<Value>, ParserError>;

/// A pipeline stage.
///
/// The record is the receiver of the call: parsers may rename it, replace its
/// value, or attach fields. The [`Visit`] gives access to the node's flags,
/// the dataset, and the shared state.
pub trait Parser: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Processes one node.
    fn parse(&self, record: &mut Record, visit: &mut Visit<'_>) -> ParseResult;
}

impl<F> Parser for F
where
    F: Fn(&mut Record, &mut Visit<'_>) -> ParseResult + Send + Sync,
{
    fn name(&self) -> &str {
        "fn"
    }

    fn parse(&self, record: &mut Record, visit: &mut Visit<'_>) -> ParseResult {
        self(record, visit)
    }
}

/// An argument given to a generator call or spawn.
///
/// Only parsers enter the pipeline. Extra values are kept aside and exposed to
/// parsers through [`Visit::args`].
#[derive(Clone)]
pub enum Arg {
    /// A pipeline stage.
    Parser(Arc<dyn Parser>),
    /// A passthrough value.
    Extra(Value),
}

impl Arg {
    /// Wraps a parser.
    pub fn parser<P>(parser: P) -> Self
    where
        P: Parser + 'static,
    {
        Arg::Parser(Arc::new(parser))
    }

    /// Wraps a passthrough value.
    pub fn extra(value: impl Into<Value>) -> Self {
        Arg::Extra(value.into())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Extra(value)
    }
}

impl From<Arc<dyn Parser>> for Arg {
    fn from(parser: Arc<dyn Parser>) -> Self {
        Arg::Parser(parser)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Parser(parser) => f.debug_tuple("Parser").field(&parser.name()).finish(),
            Arg::Extra(value) => f.debug_tuple("Extra").field(value).finish(),
        }
    }
}

/// Wraps a closure into a parser argument.
pub fn parser_fn<F>(f: F) -> Arg
where
    F: Fn(&mut Record, &mut Visit<'_>) -> ParseResult + Send + Sync + 'static,
{
    Arg::Parser(Arc::new(f))
}

/// The stages and passthrough values of one call.
#[derive(Clone, Default)]
pub struct Pipeline {
    parsers: Vec<Arc<dyn Parser>>,
    args: Vec<Value>,
}

impl Pipeline {
    /// Builds a pipeline from call arguments, keeping their order.
    pub fn from_args(args: impl IntoIterator<Item = Arg>) -> Self {
        Self::curried(&[], args)
    }

    /// Builds a pipeline whose curried parsers run before the call-site ones.
    pub fn curried(curried: &[Arc<dyn Parser>], args: impl IntoIterator<Item = Arg>) -> Self {
        let mut pipeline = Self {
            parsers: curried.to_vec(),
            args: Vec::new(),
        };
        for arg in args {
            match arg {
                Arg::Parser(parser) => pipeline.parsers.push(parser),
                Arg::Extra(value) => pipeline.args.push(value),
            }
        }
        pipeline
    }

    /// Returns the stages in running order.
    #[inline]
    pub fn parsers(&self) -> &[Arc<dyn Parser>] {
        &self.parsers
    }

    /// Returns the passthrough values.
    #[inline]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Number of stages.
    #[inline]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Returns true if the pipeline has no stage.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "parsers",
                &self.parsers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("args", &self.args)
            .finish()
    }
}
