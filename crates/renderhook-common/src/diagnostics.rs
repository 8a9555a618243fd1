//! User-facing diagnostics.
//!
//! The transform engine reports failures as typed errors; at the file
//! boundary they are flattened into a `Diagnostic` carrying a byte range
//! relative to the start of the file so the reporter can render a snippet.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// Stable diagnostic codes, rendered as `RH<code>`.
pub mod diagnostic_codes {
    /// The marker was not used as a direct single-argument call.
    pub const INVALID_MACRO_USAGE: u32 = 1001;
    /// A marker call appears outside of any function.
    pub const NO_ENCLOSING_FUNCTION: u32 = 1002;
    /// A marker call appears in a function's parameter list.
    pub const MACRO_IN_PARAMETERS: u32 = 1003;
    /// The source text could not be parsed.
    pub const SYNTAX_ERROR: u32 = 1101;
    /// A code template could not be parsed or instantiated.
    pub const TEMPLATE_FAILURE: u32 = 9001;
    /// The rewritten program could not be printed.
    pub const EMIT_FAILURE: u32 = 9002;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    /// Byte offset from the start of `file`.
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        }
    }

    /// An error that is not tied to a location inside the file.
    pub fn file_error(file: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self::error(file, 0, 0, message, code)
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// The code as printed to users, e.g. `RH1001`.
    pub fn code_label(&self) -> String {
        if self.code == 0 {
            return String::new();
        }
        format!("RH{}", self.code)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_label(), self.message_text)
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
