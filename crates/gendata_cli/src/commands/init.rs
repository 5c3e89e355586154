//! Init command implementation

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use gendata_core::CONFIG_FILES;
use miette::{IntoDiagnostic, Result};
use tracing::info;

const DEFAULT_CONFIG: &str = r#"{
  "$schema": "https://raw.githubusercontent.com/simorgh3196/gendata/main/schemas/v1/config.json",
  // "records" or "returns"
  "collect": "records",
  "paths": false,
  "separator": ".",
  "leavesOnly": false,
  "depth": false
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILES[0]);
    write_config(&config_path, force)?;
    info!("Created {}", config_path.display());
    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    loop {
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(mut file) => {
                file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gendata_core::FlattenConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = FlattenConfig::from_json(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.separator, ".");
        assert!(config.schema.is_some());
    }

    #[test]
    fn test_write_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILES[0]);
        std::fs::write(&path, "{}").unwrap();

        let err = write_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_write_config_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILES[0]);
        std::fs::write(&path, "{}").unwrap();

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
