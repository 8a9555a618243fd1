//! Transform options from the config file and command line.
//!
//! The config file is plain JSON:
//!
//! ```json
//! { "macroSource": "renderhook/macro", "jsx": true }
//! ```
//!
//! Missing keys take their defaults; unknown keys are an error. Flags given
//! on the command line override the file.

use anyhow::{Context, Result};
use std::path::Path;

use renderhook_transform::TransformOptions;

use crate::cli::args::CliArgs;

pub fn parse_config(source: &str) -> Result<TransformOptions> {
    let options: TransformOptions =
        serde_json::from_str(source).context("failed to parse config JSON")?;
    if options.macro_source.trim().is_empty() {
        anyhow::bail!("config key `macroSource` must not be empty");
    }
    Ok(options)
}

pub fn load_config(path: &Path) -> Result<TransformOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config: {}", path.display()))
}

/// Options for this run: defaults, then the config file, then flags.
pub fn resolve_options(args: &CliArgs, cwd: &Path) -> Result<TransformOptions> {
    let mut options = match &args.config {
        Some(path) => load_config(&cwd.join(path))?,
        None => TransformOptions::default(),
    };

    if let Some(source) = &args.macro_source {
        if source.trim().is_empty() {
            anyhow::bail!("--macro-source must not be empty");
        }
        options.macro_source = source.clone();
    }
    if args.jsx {
        options.jsx = true;
    }
    Ok(options)
}
