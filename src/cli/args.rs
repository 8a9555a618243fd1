use clap::Parser;
use std::path::PathBuf;

/// Expand renderhook/macro calls in JavaScript files.
#[derive(Parser, Debug, Clone)]
#[command(name = "renderhook", version, about)]
pub struct CliArgs {
    /// Files to transform.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write transformed files to this directory instead of stdout.
    #[arg(short = 'o', long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// JSON config file (`macroSource`, `jsx`). Flags override it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Module specifier that identifies the marker import.
    #[arg(long = "macro-source", alias = "macroSource")]
    pub macro_source: Option<String>,

    /// Parse JSX syntax.
    #[arg(long)]
    pub jsx: bool,

    /// Color diagnostics and show source snippets.
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Plain diagnostics.
    #[arg(long = "no-pretty", overrides_with = "pretty")]
    pub no_pretty: bool,
}

impl CliArgs {
    /// `Some` when `--pretty` or `--no-pretty` was given; the last one wins.
    pub fn pretty_override(&self) -> Option<bool> {
        if self.pretty {
            Some(true)
        } else if self.no_pretty {
            Some(false)
        } else {
            None
        }
    }
}
