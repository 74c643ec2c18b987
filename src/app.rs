use std::path::PathBuf;

use tracing::debug;

use crate::cli::output::Reporter;
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::{PruneError, Result};
use crate::pruning::Pruner;
use crate::storage::{Database, TargetTables};

pub struct AppContext {
    pub config: Config,
    pub tables: TargetTables,
    pub reporter: Reporter,
}

impl AppContext {
    /// Command-line flags win over the environment, which wins over files.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::load(cli.config.as_deref())?;
        if let Some(path) = &cli.db {
            config.database.path = Some(path.clone());
        }
        if let Some(prefix) = &cli.table_prefix {
            config.database.table_prefix.clone_from(prefix);
        }

        let tables = TargetTables::with_prefix(&config.database.table_prefix)?;
        let output_format = if cli.robot || config.robot.enabled {
            OutputFormat::Robot
        } else {
            OutputFormat::Human
        };

        Ok(Self {
            reporter: Reporter::new(output_format, config.robot.pretty),
            config,
            tables,
        })
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        self.config.database.path.clone().ok_or_else(|| {
            PruneError::MissingConfig(
                "no content database given (use --db, PRUNE_DB or [database] path)".to_string(),
            )
        })
    }

    /// Open the content database and wrap it for pruning.
    pub fn open_pruner(&self) -> Result<Pruner<Database>> {
        let path = self.database_path()?;
        debug!(target: "prune", db = %path.display(), tables = ?self.tables, "opening pruner");
        Ok(Pruner::new(Database::open(path)?, self.tables.clone()))
    }
}
