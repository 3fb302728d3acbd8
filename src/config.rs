use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sankey::{ColumnNames, RenderParams};

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV: &str = "SEQCLUST_CONFIG";

/// Start-up configuration. Every section falls back to its default, so a
/// config file only needs the keys it changes:
///
/// ```json
/// { "sankey": { "width": 1600, "height": 1000 }, "catalog_path": "data.csv" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub columns: ColumnNames,
    pub sankey: RenderParams,
    /// Catalogue opened at start-up, if any.
    pub catalog_path: Option<PathBuf>,
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load the file named by [`CONFIG_ENV`], or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let config = Self::load(Path::new(&path))?;
                log::info!("Loaded config from {}", Path::new(&path).display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Tests touching the process environment hold this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sankey": {{"width": 1600}}, "columns": {{"family": "Family"}}}}"#
        )
        .unwrap();

        let config = ExplorerConfig::load(file.path()).unwrap();
        assert_eq!(config.sankey.width, 1600);
        assert_eq!(config.sankey.height, RenderParams::default().height);
        assert_eq!(config.columns.family, "Family");
        assert_eq!(config.columns.subfamily, ColumnNames::default().subfamily);
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = ExplorerConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ExplorerConfig::load(Path::new("/nonexistent/seqclust.json")).is_err());
    }

    #[test]
    fn env_variable_selects_the_config_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::remove_var(CONFIG_ENV);
        assert_eq!(ExplorerConfig::from_env().unwrap(), ExplorerConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"catalog_path": "methods.csv"}}"#).unwrap();
        std::env::set_var(CONFIG_ENV, file.path());
        let config = ExplorerConfig::from_env();
        std::env::remove_var(CONFIG_ENV);

        let config = config.unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("methods.csv")));
        assert_eq!(config.sankey, RenderParams::default());
    }
}
