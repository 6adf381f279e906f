//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use turbo_catalog::search::SearchEngine;
use turbo_catalog::store::MemoryStore;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// The file `config` was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Catalog path given on the command line.
    pub catalog_override: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, catalog: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            output.debug(&format!("Using config: {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            catalog_override: catalog.map(|c| resolve(&cwd, c)),
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// The catalog snapshot to load: `--catalog`, else the configured path
    /// relative to the config file.
    pub fn catalog_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.catalog_override {
            return Ok(path.clone());
        }

        match (&self.config.catalog.path, &self.config_path) {
            (Some(path), Some(config_path)) => {
                let base = config_path.parent().unwrap_or(&self.cwd);
                Ok(resolve(base, path))
            }
            (Some(path), None) => Ok(resolve(&self.cwd, path)),
            (None, _) => bail!(
                "No catalog configured. Pass --catalog <file> or set [catalog].path in catalog.toml"
            ),
        }
    }

    /// Load the catalog and build a search engine over it.
    pub async fn open_engine(&self) -> Result<SearchEngine<MemoryStore>> {
        let path = self.catalog_path()?;
        let store = MemoryStore::load_json(&path)
            .await
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
        self.output
            .debug(&format!("Loaded {} products from {}", store.len().await, path.display()));

        Ok(SearchEngine::with_config(store, self.config.search.clone())?)
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
