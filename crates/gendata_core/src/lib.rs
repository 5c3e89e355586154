//! # gendata_core
//!
//! Tree-flattening engine for `serde_json` values.
//!
//! This crate provides:
//! - The traversal engine turning a value into an ordered [`Dataset`]
//! - Composable parser pipelines run for every visited node
//! - Generators ([`GenData`]) that curry parsers and extend a capability chain
//! - Built-in parsers and configuration loading
//!
//! ## Example
//!
//! ```rust
//! use gendata_core::{GenData, parser_fn};
//! use serde_json::json;
//!
//! let tagged = GenData::new().spawn([parser_fn(|record, visit| {
//!     record.set("seen", visit.shared.increment("seen"));
//!     Ok(None)
//! })]);
//!
//! let dataset = tagged.call(json!({"a": [1, 2]}))?;
//! assert_eq!(dataset.names(), vec!["", "a", "0", "1"]);
//! assert!(dataset.records().all(|record| tagged.owns(record)));
//! # Ok::<(), gendata_core::GenDataError>(())
//! ```

mod config;
mod dataset;
mod engine;
mod error;
mod flags;
mod generator;
mod model;
mod parser;
pub mod parsers;
mod record;
pub mod value;
mod visit;

pub use config::{CONFIG_FILES, FlattenConfig};
pub use dataset::{Collect, Dataset, Entry};
pub use error::{GenDataError, ParserError};
pub use flags::Flags;
pub use generator::{BASE_MODEL_NAME, Call, GenData, GeneratorBuilder, Outcome, flatten};
pub use model::{Model, ModelId};
pub use parser::{Arg, ParseResult, Parser, Pipeline, parser_fn};
pub use record::{OMITTED_KEY, Record};
pub use visit::{SharedState, Visit};
