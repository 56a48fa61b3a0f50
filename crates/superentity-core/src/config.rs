//! Registry configuration.

use serde::Deserialize;

use crate::options::HINT_NAMESPACE;

/// Registry builder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Log a warning when a build pass overwrites an entity name.
    pub warn_on_duplicates: bool,
    /// Key of the nested block presentation hints are read from.
    pub hint_namespace: String,
}

impl RegistryConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether duplicate names are logged at `warn`.
    pub fn with_warn_on_duplicates(mut self, warn: bool) -> Self {
        self.warn_on_duplicates = warn;
        self
    }

    /// Set the nested block presentation hints are read from.
    pub fn with_hint_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.hint_namespace = namespace.into();
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            warn_on_duplicates: true,
            hint_namespace: HINT_NAMESPACE.to_string(),
        }
    }
}
