#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use renderhook::cli::args::CliArgs;
use renderhook::cli::{driver, reporter::Reporter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if RENDERHOOK_LOG or RUST_LOG is set.
    // Supports RENDERHOOK_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    renderhook::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let result = driver::run(&args, &cwd)?;

    let stdout = result.stdout();
    if !stdout.is_empty() {
        let mut out = std::io::stdout().lock();
        out.write_all(stdout.as_bytes())
            .context("failed to write to stdout")?;
        out.flush().context("failed to write to stdout")?;
    }

    if !result.diagnostics.is_empty() {
        let pretty = args
            .pretty_override()
            .unwrap_or_else(|| std::io::stderr().is_terminal());
        let mut reporter = Reporter::new(pretty);
        eprintln!("{}", reporter.render(&result.diagnostics));
    }

    let code = if result.has_errors() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    };
    std::process::exit(code);
}
