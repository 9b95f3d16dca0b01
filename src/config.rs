use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::utils::constants::{DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE, DEFAULT_TIMEOUT_SECS, ENV_PREFIX};

/// Runtime settings, layered: built-in defaults, then the TOML file, then
/// `STATION_OBS_*` environment variables (`__` separates nested keys, e.g.
/// `STATION_OBS_SUBMISSION__BASE_URL`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tables: TableSettings,
    pub submission: SubmissionSettings,
}

/// Override files for the embedded reference tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSettings {
    pub hygrometric: Option<PathBuf>,
    pub station_pressure: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl SubmissionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise
    /// `station-obs.toml` in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings = Config::builder()
            .set_default("submission.base_url", DEFAULT_BASE_URL)?
            .set_default("submission.timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(?settings, "Loaded settings");
        Ok(settings)
    }
}

/// `STATION_OBS_` prefix, `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
