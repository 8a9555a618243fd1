//! Common types and utilities for the renderhook crates.
//!
//! This crate provides the pieces shared between the transform engine and
//! the command-line driver:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, stable `RH` codes)
//! - Line/column positions for reporting (`LineMap`, `Position`)

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, diagnostic_codes};

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};
