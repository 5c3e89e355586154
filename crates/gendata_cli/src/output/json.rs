//! JSON output formatter

use gendata_core::Dataset;
use miette::{IntoDiagnostic, Result};

pub fn output_json(dataset: &Dataset) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(dataset).into_diagnostic()?
    );
    Ok(())
}
