//! Flattening configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::parsers::{LeavesOnly, MaxDepth, WithDepth, WithPath};
use crate::{Arg, Collect, GenData, GenDataError, parser_fn};

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration file names looked up by [`FlattenConfig::discover`], in
/// priority order.
pub const CONFIG_FILES: &[&str] = &[".gendata.jsonc", ".gendata.json"];

/// Options for flattening a document with the built-in parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// What each visited node contributes to the output.
    #[serde(default)]
    pub collect: Collect,

    /// Annotate records with a `path` field.
    #[serde(default)]
    pub paths: bool,

    /// Separator used to join path segments.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Do not scan the members of nodes at this depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Omit container records.
    #[serde(default)]
    pub leaves_only: bool,

    /// Annotate records with a `depth` field.
    #[serde(default)]
    pub depth: bool,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_separator() -> String {
    ".".to_string()
}

impl FlattenConfig {
    /// Creates the default configuration: plain records, no annotation.
    pub fn new() -> Self {
        Self {
            schema: None,
            collect: Collect::Records,
            paths: false,
            separator: default_separator(),
            max_depth: None,
            leaves_only: false,
            depth: false,
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.gendata.jsonc`, `.gendata.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenDataError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GenDataError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from a JSON or JSONC string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, GenDataError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| GenDataError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| Value::Object(Default::default()));

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: Value =
                    serde_json::from_str(SCHEMA_JSON).map_err(|e| e.to_string())?;
                Validator::new(&schema_json).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| GenDataError::config(format!("Invalid config schema: {}", e)))?;

        if let Err(e) = schema.validate(&value) {
            return Err(GenDataError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| GenDataError::config(format!("Invalid config: {}", e)))
    }

    /// Looks for a configuration file in `dir`, in [`CONFIG_FILES`] order.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Builds a generator running the built-in parsers this configuration
    /// enables.
    ///
    /// When collecting returns, every visited node returns its value.
    pub fn generator(&self) -> GenData {
        let mut args = Vec::new();
        if let Some(max) = self.max_depth {
            args.push(Arg::parser(MaxDepth(max)));
        }
        if self.leaves_only {
            args.push(Arg::parser(LeavesOnly));
        }
        if self.depth {
            args.push(Arg::parser(WithDepth));
        }
        if self.paths {
            args.push(Arg::parser(WithPath::new(self.separator.as_str())));
        }
        if self.collect == Collect::Returns {
            args.push(parser_fn(|record, _| Ok(Some(record.value.clone()))));
        }

        GenData::with_collect(self.collect)
            .builder()
            .name("flatten")
            .args(args)
            .build()
    }
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_config_default() {
        let config = FlattenConfig::default();
        assert_eq!(config.collect, Collect::Records);
        assert_eq!(config.separator, ".");
        assert!(!config.paths);
        assert!(config.max_depth.is_none());
        assert!(!config.leaves_only);
        assert!(!config.depth);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "collect": "returns",
            "paths": true,
            "separator": "/",
            "maxDepth": 3,
            "leavesOnly": true,
            "depth": true
        }"#;

        let config = FlattenConfig::from_json(json).unwrap();
        assert_eq!(config.collect, Collect::Returns);
        assert!(config.paths);
        assert_eq!(config.separator, "/");
        assert_eq!(config.max_depth, Some(3));
        assert!(config.leaves_only);
        assert!(config.depth);
    }

    #[test]
    fn test_config_from_jsonc() {
        let json = r#"{
            // annotate
            "paths": true, /* trailing */
        }"#;

        let config = FlattenConfig::from_json(json).unwrap();
        assert!(config.paths);
    }

    #[test]
    fn test_config_empty_document() {
        let config = FlattenConfig::from_json("").unwrap();
        assert_eq!(config, FlattenConfig::new());
    }

    #[test]
    fn test_config_accepts_schema_key() {
        let config = FlattenConfig::from_json(r#"{ "$schema": "./config.json" }"#).unwrap();
        assert_eq!(config.schema.as_deref(), Some("./config.json"));
    }

    #[rstest]
    #[case::unknown_property(r#"{ "pahts": true }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "paths": "yes" }"#, "Config validation failed")]
    #[case::invalid_enum_value(r#"{ "collect": "nodes" }"#, "Config validation failed")]
    #[case::negative_depth(r#"{ "maxDepth": -1 }"#, "Config validation failed")]
    #[case::malformed(r#"{ "paths": "#, "Invalid JSON")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let err = FlattenConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_config_from_file_sets_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gendata.json");
        fs::write(&path, r#"{ "depth": true }"#).unwrap();

        let config = FlattenConfig::from_file(&path).unwrap();
        assert!(config.depth);
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlattenConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GenDataError::Config(_)));
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gendata.json"), r#"{ "paths": true }"#).unwrap();
        fs::write(dir.path().join(".gendata.jsonc"), r#"{ "depth": true }"#).unwrap();

        let path = FlattenConfig::discover(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(".gendata.jsonc"));

        let config = FlattenConfig::from_file(path).unwrap();
        assert!(config.depth);
        assert!(!config.paths);
    }

    #[test]
    fn test_discover_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FlattenConfig::discover(dir.path()).is_none());
    }

    #[test]
    fn test_generator_default_is_plain_flatten() {
        let generator = FlattenConfig::new().generator();
        assert_eq!(generator.name(), "flatten");
        assert!(generator.parsers().is_empty());

        let dataset = generator.call(json!(["a", "b"])).unwrap();
        assert_eq!(dataset.names(), vec!["", "0", "1"]);
    }

    #[test]
    fn test_generator_with_options() {
        let config = FlattenConfig {
            paths: true,
            separator: "/".to_string(),
            leaves_only: true,
            depth: true,
            max_depth: Some(2),
            ..FlattenConfig::new()
        };

        let dataset = config
            .generator()
            .call(json!({"a": {"b": {"c": 1}, "e": 3}, "d": 2}))
            .unwrap();
        let rows: Vec<_> = dataset
            .records()
            .map(|r| (r.field("path").cloned(), r.field("depth").cloned()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (Some(json!("a/e")), Some(json!(2))),
                (Some(json!("d")), Some(json!(1))),
            ]
        );
    }

    #[test]
    fn test_generator_collect_returns() {
        let config = FlattenConfig {
            collect: Collect::Returns,
            leaves_only: true,
            ..FlattenConfig::new()
        };

        let dataset = config.generator().call(json!([1, [2]])).unwrap();
        assert_eq!(dataset.to_json().unwrap(), json!([1, 2]));
    }
}
