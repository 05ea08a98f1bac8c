//! Core application

use anyhow::{Context, Result};
use bson::Bson;
use serde_json::Value;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::grid::GridQuery;
use crate::utils::file::read_input;

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };

        let raw = read_input(cli_config.input.as_deref())?;
        let output = app.translate(&raw, command, cli_config.pretty)?;
        println!("{}", output);
        Ok(())
    }

    /// Parse, rewrite and translate one grid query into printable JSON
    pub fn translate(&self, raw: &str, command: Commands, pretty: bool) -> Result<String> {
        let mut query = GridQuery::parse(raw).context("Failed to parse grid query")?;
        self.config.prepare(&mut query);

        let value = match command {
            Commands::Query => serde_json::to_value(query.to_query())
                .context("Failed to serialize translated query")?,
            Commands::Pipeline => Value::Array(
                query
                    .to_pipeline()
                    .into_iter()
                    .map(|stage| Bson::Document(stage).into_relaxed_extjson())
                    .collect(),
            ),
        };

        let rendered = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        rendered.context("Failed to render output")
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}
