use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::grid::{DateRangeExpander, FieldAliases, GridQuery, SortEntry, SortList};
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Grid field name -> storage field name
    pub aliases: Option<FieldAliases>,
    /// Storage fields whose date equality is widened to a whole day
    pub date_fields: Option<Vec<String>>,
    /// Sort entries appended when the grid does not already sort by them
    pub default_sort: Option<Vec<SortEntry>>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    ///
    /// Aliases merge key by key; lists replace wholesale.
    fn merge(&mut self, other: FileConfig) {
        if let Some(aliases) = other.aliases {
            tracing::trace!(count = aliases.len(), "Merging aliases");
            let current = self.aliases.get_or_insert_with(FieldAliases::default);
            current.merge(aliases);
        }
        if other.date_fields.is_some() {
            tracing::trace!(date_fields = ?other.date_fields, "Merging date_fields");
            self.date_fields = other.date_fields;
        }
        if other.default_sort.is_some() {
            tracing::trace!(default_sort = ?other.default_sort, "Merging default_sort");
            self.default_sort = other.default_sort;
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub aliases: FieldAliases,
    pub date_fields: Vec<String>,
    pub default_sort: SortList,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.gridquery/gridquery.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_with_profile(cli, get_profile_config_path())
    }

    fn load_with_profile(cli: &CliConfig, profile_path: Option<PathBuf>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir, skipped when absent
        if let Some(profile_path) = profile_path
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Layer: file config -> CLI overrides
        let mut aliases = file_config.aliases.unwrap_or_default();
        for (grid_field, storage_field) in &cli.aliases {
            aliases.insert(grid_field.clone(), storage_field.clone());
        }

        let date_fields = if cli.date_fields.is_empty() {
            file_config.date_fields.unwrap_or_default()
        } else {
            cli.date_fields.clone()
        };

        let default_sort = if cli.default_sort.is_empty() {
            SortList::from(file_config.default_sort.unwrap_or_default())
        } else {
            SortList::from(cli.default_sort.clone())
        };

        let config = Self {
            aliases,
            date_fields,
            default_sort,
        };
        config.validate()?;

        tracing::debug!(
            aliases = config.aliases.len(),
            date_fields = ?config.date_fields,
            default_sort = ?config.default_sort.to_query_order(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some((grid, storage)) = self
            .aliases
            .iter()
            .find(|(grid, storage)| grid.trim().is_empty() || storage.trim().is_empty())
        {
            anyhow::bail!(
                "aliases: grid and storage field names must be non-empty (got '{}' -> '{}')",
                grid,
                storage
            );
        }

        if self.date_fields.iter().any(|f| f.trim().is_empty()) {
            anyhow::bail!("date_fields: field names must be non-empty");
        }

        for entry in self.default_sort.entries() {
            if entry.field.trim().is_empty() {
                anyhow::bail!("default_sort: field names must be non-empty");
            }
            if !entry.dir.is_valid() {
                anyhow::bail!(
                    "default_sort: invalid direction for '{}'. Use 'asc' or 'desc'",
                    entry.field
                );
            }
        }

        Ok(())
    }

    /// Rewrite a parsed grid query with the configured aliases, date
    /// widening and default sort, in that order
    ///
    /// Date fields are matched against storage names, after aliasing.
    pub fn prepare(&self, query: &mut GridQuery) {
        query.apply_aliases(&self.aliases);

        if !self.date_fields.is_empty() {
            query.expand_dates(&DateRangeExpander::new(self.date_fields.iter().cloned()));
        }

        for entry in self.default_sort.entries() {
            if query.sort.ensure_sorted_by(entry.clone()) {
                tracing::debug!(field = %entry.field, dir = %entry.dir, "Appended default sort");
            }
        }
    }
}

/// Get the profile config path (~/.gridquery/gridquery.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
