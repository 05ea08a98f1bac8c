use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_INPUT};
use crate::grid::{SortDirection, SortEntry};

#[derive(Parser)]
#[command(name = "gridquery")]
#[command(
    version,
    about = "Translate data-grid filter and sort queries into document-store queries",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Grid query JSON file ("-" or absent reads standard input)
    #[arg(long, short = 'i', global = true, env = ENV_INPUT)]
    pub input: Option<PathBuf>,

    /// Rename a grid field to a storage field (GRID=STORAGE, repeatable)
    #[arg(long = "alias", global = true, value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// Field whose date equality is widened to a whole day (repeatable)
    #[arg(long = "date-field", global = true)]
    pub date_fields: Vec<String>,

    /// Sort appended when the grid does not sort by that field (FIELD:asc|desc)
    #[arg(long, global = true, value_parser = parse_sort_entry)]
    pub default_sort: Vec<SortEntry>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Parse a GRID=STORAGE alias from CLI string
fn parse_alias(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((grid, storage)) if !grid.trim().is_empty() && !storage.trim().is_empty() => {
            Ok((grid.trim().to_string(), storage.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid alias '{}'. Expected GRID=STORAGE, e.g. ID=_id",
            s
        )),
    }
}

/// Parse a FIELD:DIR sort entry from CLI string
fn parse_sort_entry(s: &str) -> Result<SortEntry, String> {
    let (field, dir) = s.rsplit_once(':').unwrap_or((s, "asc"));
    let entry = SortEntry::new(field.trim(), dir.trim());
    if entry.field.is_empty() || entry.dir == SortDirection::Invalid {
        return Err(format!(
            "Invalid sort '{}'. Use 'field', 'field:asc' or 'field:desc'",
            s
        ));
    }
    Ok(entry)
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the generic filter expression and order tokens
    Query,
    /// Print the aggregation pipeline stages ($match, $sort)
    Pipeline,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub aliases: Vec<(String, String)>,
    pub date_fields: Vec<String>,
    pub default_sort: Vec<SortEntry>,
    pub pretty: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        input: cli.input,
        aliases: cli.aliases,
        date_fields: cli.date_fields,
        default_sort: cli.default_sort,
        pretty: cli.pretty,
    };
    (config, cli.command)
}
