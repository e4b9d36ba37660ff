//! Populator configuration

/// Configuration for [`super::TemplatePopulator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatorConfig {
    /// Key of the metadata child that receives unmatched bare keys
    pub metadata_key: String,

    /// Create the metadata child when missing and route unmatched bare keys
    /// to it. When off, unmatched bare keys are skipped.
    pub metadata_fallback: bool,
}

impl Default for PopulatorConfig {
    fn default() -> Self {
        Self {
            metadata_key: "__metadata".to_string(),
            metadata_fallback: true,
        }
    }
}

impl PopulatorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata_key(mut self, key: impl Into<String>) -> Self {
        self.metadata_key = key.into();
        self
    }

    pub fn with_metadata_fallback(mut self, enabled: bool) -> Self {
        self.metadata_fallback = enabled;
        self
    }
}
