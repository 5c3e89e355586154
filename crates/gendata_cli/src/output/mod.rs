//! Output formatting module

mod json;
mod text;

use gendata_core::Dataset;
use miette::Result;

use crate::cli::OutputFormat;

pub fn output_dataset(dataset: &Dataset, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(dataset)?,
        OutputFormat::Text => text::output_text(dataset),
    }

    Ok(())
}
