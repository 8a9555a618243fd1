//! Runs the transform over the files named on the command line.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

use renderhook_common::Diagnostic;
use renderhook_transform::{TransformOptions, TransformSummary, transform_source};

use crate::cli::args::CliArgs;
use crate::cli::config::resolve_options;

/// One successfully transformed file.
#[derive(Debug, Clone)]
pub struct EmittedFile {
    pub source: PathBuf,
    /// Where the code was written; `None` when it goes to stdout.
    pub output: Option<PathBuf>,
    pub code: String,
    pub summary: TransformSummary,
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub diagnostics: Vec<Diagnostic>,
    pub emitted: Vec<EmittedFile>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Code destined for stdout, in input order.
    pub fn stdout(&self) -> String {
        self.emitted
            .iter()
            .filter(|file| file.output.is_none())
            .map(|file| file.code.as_str())
            .collect()
    }
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let options = resolve_options(args, cwd)?;
    let out_dir = args.out_dir.as_ref().map(|dir| cwd.join(dir));

    let mut result = RunResult::default();
    for file in &args.files {
        let path = cwd.join(file);
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path.display().to_string();

        match transform_file(&name, &source, &options) {
            Ok((code, summary)) => {
                let output = match &out_dir {
                    Some(dir) => {
                        let target = output_path(dir, cwd, &path);
                        write_output(&target, &code)?;
                        Some(target)
                    }
                    None => None,
                };
                result.emitted.push(EmittedFile {
                    source: path,
                    output,
                    code,
                    summary,
                });
            }
            Err(diagnostic) => {
                warn!(file = %name, code = diagnostic.code, "transform failed");
                result.diagnostics.push(diagnostic);
            }
        }
    }
    Ok(result)
}

fn transform_file(
    name: &str,
    source: &str,
    options: &TransformOptions,
) -> Result<(String, TransformSummary), Diagnostic> {
    let output = transform_source(name, source, options)?;
    info!(
        file = name,
        calls = output.summary.rewritten_calls,
        functions = output.summary.instrumented_functions,
        "transformed"
    );
    Ok((output.code, output.summary))
}

/// Path under `out_dir` for `file`, keeping its location relative to
/// `cwd` when it has one.
pub fn output_path(out_dir: &Path, cwd: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(cwd) {
        Ok(relative)
            if relative
                .components()
                .all(|component| matches!(component, Component::Normal(_))) =>
        {
            out_dir.join(relative)
        }
        _ => out_dir.join(file.file_name().unwrap_or(file.as_os_str())),
    }
}

fn write_output(target: &Path, code: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(target, code).with_context(|| format!("failed to write {}", target.display()))
}
