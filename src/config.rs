use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};
use crate::pruning::filter::DEFAULT_SAMPLE_RATE;
use crate::storage::tables::DEFAULT_TABLE_PREFIX;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub prune: PruneConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    /// Built-in defaults, then the global file (or the explicit one, which
    /// replaces it), then `PRUNE_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("PRUNE_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(PruneError::MissingConfig(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("prune/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)?;
        let patch = toml::from_str(&raw)
            .map_err(|err| PruneError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.prune {
            self.prune.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("PRUNE_DB") {
            self.database.path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_string("PRUNE_TABLE_PREFIX") {
            self.database.table_prefix = value;
        }

        if let Some(value) = env_string("PRUNE_DEFAULT_BEFORE") {
            self.prune.default_before = Some(value);
        }
        if let Some(value) = env_f64("PRUNE_DEFAULT_SAMPLE_RATE")? {
            self.prune.default_sample_rate = value;
        }

        if let Some(value) = env_bool("PRUNE_ROBOT") {
            self.robot.enabled = value;
        }
        if let Some(value) = env_bool("PRUNE_ROBOT_PRETTY") {
            self.robot.pretty = value;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the content database.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Prefix of the content tables, e.g. `wp_` for `wp_posts`.
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
}

fn default_table_prefix() -> String {
    DEFAULT_TABLE_PREFIX.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            table_prefix: default_table_prefix(),
        }
    }
}

impl DatabaseConfig {
    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
        if let Some(value) = patch.table_prefix {
            self.table_prefix = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Cutoff used when `--before` is not given. Unset means six months ago.
    #[serde(default)]
    pub default_before: Option<String>,
    #[serde(default = "default_sample_rate")]
    pub default_sample_rate: f64,
}

const fn default_sample_rate() -> f64 {
    DEFAULT_SAMPLE_RATE
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            default_before: None,
            default_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl PruneConfig {
    fn merge(&mut self, patch: PrunePatch) {
        if let Some(value) = patch.default_before {
            self.default_before = Some(value);
        }
        if let Some(value) = patch.default_sample_rate {
            self.default_sample_rate = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Emit JSON even without `--robot`.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

const fn default_pretty() -> bool {
    true
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pretty: true,
        }
    }
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.pretty {
            self.pretty = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    prune: Option<PrunePatch>,
    robot: Option<RobotPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    path: Option<PathBuf>,
    table_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PrunePatch {
    default_before: Option<String>,
    default_sample_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RobotPatch {
    enabled: Option<bool>,
    pretty: Option<bool>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|err| PruneError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
