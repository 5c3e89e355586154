//! Flatten command implementation

use std::io::Read;
use std::path::Path;

use gendata_core::FlattenConfig;
use jsonc_parser::ParseOptions;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::{Cli, OutputFormat};
use crate::output::output_dataset;

/// Command-line options layered over the loaded configuration.
#[derive(Debug, Default)]
pub struct FlattenOverrides<'a> {
    pub paths: bool,
    pub separator: Option<&'a str>,
    pub max_depth: Option<usize>,
    pub leaves_only: bool,
    pub depth: bool,
}

impl FlattenOverrides<'_> {
    /// Flags only ever switch options on; they never turn off what the
    /// configuration file enables.
    fn apply(&self, config: &mut FlattenConfig) {
        config.paths |= self.paths;
        config.leaves_only |= self.leaves_only;
        config.depth |= self.depth;
        if let Some(separator) = self.separator {
            config.separator = separator.to_string();
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
    }
}

pub fn run_flatten(
    cli: &Cli,
    file: Option<&Path>,
    format: OutputFormat,
    overrides: &FlattenOverrides<'_>,
) -> Result<()> {
    let mut config = if let Some(ref path) = cli.config {
        FlattenConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };
    overrides.apply(&mut config);
    debug!("Effective config: {:?}", config);

    let value = parse_input(&read_input(file)?)?;
    let dataset = config.generator().call(value).into_diagnostic()?;
    debug!("Flattened into {} entries", dataset.len());

    output_dataset(&dataset, format)
}

pub fn find_config() -> Result<FlattenConfig> {
    if let Some(path) = FlattenConfig::discover(".") {
        info!("Using config: {}", path.display());
        return FlattenConfig::from_file(&path).into_diagnostic();
    }

    debug!("No config file found, using defaults");
    Ok(FlattenConfig::new())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .into_diagnostic()
                .wrap_err("Failed to read standard input")?;
            Ok(content)
        }
    }
}

/// Parses a JSON or JSONC document. An empty document is `null`.
fn parse_input(content: &str) -> Result<Value> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| miette::miette!("Failed to parse input: {}", e))?;
    Ok(value.unwrap_or(Value::Null))
}
