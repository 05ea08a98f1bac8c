//! Path and input helpers

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::constants::STDIN_PATH;

/// Expand `~` and make relative paths absolute against the current directory
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let expanded = match path.strip_prefix("~") {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Read the grid query text from a file, or from stdin when no path (or `-`) is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != STDIN_PATH => {
            let path = expand_path(&path.to_string_lossy());
            tracing::debug!(path = %path.display(), "Reading grid query file");
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        _ => {
            tracing::debug!("Reading grid query from stdin");
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read grid query from stdin")?;
            Ok(buf)
        }
    }
}
