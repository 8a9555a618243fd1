use serde::Deserialize;

/// Module specifier whose default export is the marker.
pub const DEFAULT_MACRO_SOURCE: &str = "renderhook/macro";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TransformOptions {
    /// Import source that identifies the marker binding.
    pub macro_source: String,
    /// Parse JSX syntax.
    pub jsx: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            macro_source: DEFAULT_MACRO_SOURCE.to_string(),
            jsx: false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
