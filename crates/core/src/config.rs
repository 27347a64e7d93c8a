//! User configuration loaded from `~/.config/handtally/config.toml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ::config::{Config, File, FileFormat};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

/// Log directory name under the platform state or data dir.
const LOG_DIR: &str = "logs";

/// Directory under the user's config dir holding handtally files.
pub const CONFIG_DIR: &str = "handtally";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# handtally configuration

# Number of combinations listed by the analysis view.
analysis_rows = 5

# Pre-filled target score on the start prompt.
# default_target = 3000

# Directory for handtally.log (defaults to the platform state dir).
# log_dir = "/tmp/handtally"
"#;

/// Settings that shape the terminal shell. Game rules are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum rows shown by the analysis overlay.
    pub analysis_rows: usize,
    /// Value pre-filled into the target prompt.
    pub default_target: Option<u32>,
    /// Where the log file is written.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis_rows: 5,
            default_target: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Write the default file if needed and load `path`, never failing.
    ///
    /// Problems are returned as messages so they can be logged once logging is
    /// up; the defaults are used when the file cannot be read or is invalid.
    pub fn load_or_default(path: &Path) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        if let Err(err) = ensure_default_config_at(path) {
            warnings.push(format!("could not write default config: {err:#}"));
        }
        let config = match Self::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                warnings.push(format!("using default settings: {err:#}"));
                Self::default()
            }
        };
        (config, warnings)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Directory for log output.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => dir.clone(),
            None => default_log_dir(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.analysis_rows == 0 {
            bail!("analysis_rows must be at least 1");
        }
        if self.default_target == Some(0) {
            bail!("default_target must be greater than 0");
        }
        Ok(())
    }
}

/// Default config file path under the platform config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Default log directory, e.g. `~/.local/state/handtally/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(CONFIG_DIR)
        .join(LOG_DIR)
}

/// Write the commented default config to `path` unless it already exists.
pub fn ensure_default_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}
