//! Source front end: parsing, printing, and diagnostics for one file.
//!
//! A `SourceText` owns the `SourceMap` the file was loaded into, so spans
//! produced while parsing can be turned back into file-relative offsets
//! when an error is reported.

use renderhook_common::Diagnostic;
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceFile, SourceMap, Span, Spanned};
use swc_core::ecma::ast::{EsVersion, Program};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter};
use swc_core::ecma::parser::{EsSyntax, Syntax, parse_file_as_program};

use crate::error::TransformError;
use crate::options::TransformOptions;

pub struct SourceText {
    name: String,
    cm: Lrc<SourceMap>,
    file: Lrc<SourceFile>,
}

impl SourceText {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        let cm: Lrc<SourceMap> = Default::default();
        let file = cm.new_source_file(FileName::Custom(name.clone()).into(), source.into());
        SourceText { name, cm, file }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse the file as a module or script, whichever its syntax implies.
    ///
    /// Errors the parser recovered from are still reported; the first one
    /// wins.
    pub fn parse(&self, options: &TransformOptions) -> Result<Program, TransformError> {
        let syntax = Syntax::Es(EsSyntax {
            jsx: options.jsx,
            ..Default::default()
        });
        let mut recovered = Vec::new();
        let program = parse_file_as_program(
            &self.file,
            syntax,
            EsVersion::latest(),
            None,
            &mut recovered,
        )
        .map_err(parse_error)?;

        if let Some(error) = recovered.into_iter().next() {
            return Err(parse_error(error));
        }
        Ok(program)
    }

    pub fn print(&self, program: &Program) -> Result<String, TransformError> {
        emit(self.cm.clone(), program)
    }

    /// Byte range of `span` relative to the start of this file.
    pub fn relative_range(&self, span: Span) -> (u32, u32) {
        if span.is_dummy() || span.lo < self.file.start_pos || span.hi > self.file.end_pos {
            return (0, 0);
        }
        let start = span.lo.0 - self.file.start_pos.0;
        (start, span.hi.0 - span.lo.0)
    }

    pub fn diagnostic(&self, error: &TransformError) -> Diagnostic {
        let (start, length) = error
            .span()
            .map(|span| self.relative_range(span))
            .unwrap_or((0, 0));
        Diagnostic::error(
            self.name.as_str(),
            start,
            length,
            error.to_string(),
            error.code(),
        )
    }
}

/// Print a program that was not loaded through a `SourceText`, such as one
/// built entirely from templates.
pub fn print_program(program: &Program) -> Result<String, TransformError> {
    emit(Default::default(), program)
}

fn emit(cm: Lrc<SourceMap>, program: &Program) -> Result<String, TransformError> {
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Config::default(),
            cm: cm.clone(),
            comments: None,
            wr: JsWriter::new(cm, "\n", &mut buf, None),
        };
        match program {
            Program::Module(module) => emitter.emit_module(module)?,
            Program::Script(script) => emitter.emit_script(script)?,
        }
    }
    String::from_utf8(buf)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
}

fn parse_error(error: swc_core::ecma::parser::error::Error) -> TransformError {
    TransformError::Parse {
        span: error.span(),
        message: error.kind().msg().into_owned(),
    }
}

#[cfg(test)]
#[path = "../tests/source.rs"]
mod tests;
