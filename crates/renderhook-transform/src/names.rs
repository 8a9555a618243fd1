//! Collision-free identifier generation.
//!
//! Every identifier that occurs anywhere in the file is reserved up front,
//! which makes a generated name free in every scope of that file. Names
//! follow the `_hint`, `_hint2`, `_hint3`, ... sequence.

use rustc_hash::FxHashSet;
use swc_core::common::{DUMMY_SP, SyntaxContext};
use swc_core::ecma::ast::{Ident, Program};
use swc_core::ecma::visit::{Visit, VisitWith};

#[derive(Debug, Default)]
pub struct NameGenerator {
    taken: FxHashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve every identifier that appears in `program`.
    pub fn from_program(program: &Program) -> Self {
        let mut collector = IdentCollector::default();
        program.visit_with(&mut collector);
        NameGenerator {
            taken: collector.names,
        }
    }

    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Generate and reserve a fresh name derived from `hint`.
    pub fn generate_name(&mut self, hint: &str) -> String {
        let base = base_name(hint);
        let mut i = 1u32;
        loop {
            let candidate = if i > 1 {
                format!("_{base}{i}")
            } else {
                format!("_{base}")
            };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            i += 1;
        }
    }

    pub fn generate(&mut self, hint: &str) -> Ident {
        let name = self.generate_name(hint);
        Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
    }
}

/// Normalise a hint: invalid characters become `_`, then leading
/// underscores and trailing digits are dropped.
fn base_name(hint: &str) -> String {
    let sanitized: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = sanitized
        .trim_start_matches('_')
        .trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() {
        "temp".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Default)]
struct IdentCollector {
    names: FxHashSet<String>,
}

impl Visit for IdentCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        if !self.names.contains(&*ident.sym) {
            self.names.insert(ident.sym.to_string());
        }
    }
}

#[cfg(test)]
#[path = "../tests/names.rs"]
mod tests;
